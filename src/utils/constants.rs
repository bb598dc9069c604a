/// Station reference table file name, expected at the base directory root.
pub const STATIONS_FILE: &str = "stations_db.txt";

/// Line layout of a daily export: the data readers skip twelve preamble
/// lines and land on the unit-label row; the column-name row sits one line
/// earlier; the final line is the running-totals footer.
pub const DATA_HEADER_SKIP: usize = 12;
pub const COLUMN_NAME_HEADER_SKIP: usize = 11;
pub const FOOTER_LINES: usize = 1;

/// Fixed column widths of the station reference table: id, state,
/// secondary id, name, commissioned date, latitude, longitude.
pub const DEFAULT_STATION_COLUMN_WIDTHS: [usize; 7] = [8, 4, 6, 41, 16, 9, 10];

/// Aggregation defaults
pub const DEFAULT_TEMPERATURE_THRESHOLD: f64 = 35.0;
pub const DEFAULT_LOOKBACK_YEARS: i32 = 9;
pub const DEFAULT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y"];

/// Exit codes signalled by the CLI wrapper, one per failing stage.
pub const EXIT_COLUMN_COUNT: i32 = 1;
pub const EXIT_COLUMN_NAMES: i32 = 2;
pub const EXIT_DATE_PARSE: i32 = 3;
pub const EXIT_AGGREGATION: i32 = 4;
pub const EXIT_FAILURE: i32 = 1;
