pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::geodesic_distance_km;
pub use filename::generate_default_output_filename;
pub use progress::ProgressReporter;
