pub mod aggregate;
pub mod coordinate;
pub mod schema;
pub mod station;
pub mod weather;

pub use aggregate::HeatDayCount;
pub use coordinate::Coordinate;
pub use schema::{ColumnKind, ColumnSpec, WeatherSchema};
pub use station::StationRecord;
pub use weather::WeatherRow;
