pub mod aggregator;
pub mod reconciliation;
pub mod schema_checker;
pub mod station_locator;

pub use aggregator::{Aggregator, YearWindow};
pub use reconciliation::{
    ReconciliationChecker, ReconciliationPolicy, ReconciliationReport, ReconciliationStatus,
};
pub use schema_checker::SchemaChecker;
pub use station_locator::{discover_csv_files, StationLocator, StationMatch};
