pub mod station_reader;
pub mod weather_reader;

pub use station_reader::StationReader;
pub use weather_reader::{CsvTable, WeatherReader};
