use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Address could not be resolved: '{address}'")]
    Geocoding { address: String },

    #[error("Station table error: {0}")]
    StationTable(String),

    #[error("Column count mismatch in {}: expected {expected} columns, found {found}", .file.display())]
    ColumnCountMismatch {
        file: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Column name mismatch in {}: expected {expected:?}, found {found:?}", .file.display())]
    ColumnNameMismatch {
        file: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Date parsing error: '{value}' matches none of the accepted formats")]
    DateParse { value: String },

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    /// Exit code contract for the CLI wrapper: each validation stage
    /// signals its failure with a distinct small integer.
    pub fn exit_code(&self) -> i32 {
        use crate::utils::constants::{
            EXIT_AGGREGATION, EXIT_COLUMN_COUNT, EXIT_COLUMN_NAMES, EXIT_DATE_PARSE, EXIT_FAILURE,
        };

        match self {
            ProcessingError::ColumnCountMismatch { .. } => EXIT_COLUMN_COUNT,
            ProcessingError::ColumnNameMismatch { .. } => EXIT_COLUMN_NAMES,
            ProcessingError::DateParse { .. } => EXIT_DATE_PARSE,
            ProcessingError::Aggregation(_) => EXIT_AGGREGATION,
            _ => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let count = ProcessingError::ColumnCountMismatch {
            file: PathBuf::from("a.csv"),
            expected: 11,
            found: 12,
        };
        assert_eq!(count.exit_code(), 1);

        let names = ProcessingError::ColumnNameMismatch {
            file: PathBuf::from("a.csv"),
            expected: vec!["Date".to_string()],
            found: vec!["date".to_string()],
        };
        assert_eq!(names.exit_code(), 2);

        let date = ProcessingError::DateParse {
            value: "not-a-date".to_string(),
        };
        assert_eq!(date.exit_code(), 3);

        let agg = ProcessingError::Aggregation("failed to write output".to_string());
        assert_eq!(agg.exit_code(), 4);

        let other = ProcessingError::MissingData("no files".to_string());
        assert_eq!(other.exit_code(), 1);
    }
}
