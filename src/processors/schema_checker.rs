use std::path::PathBuf;

use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::readers::WeatherReader;

/// Cross-file schema validation: every export must present the same
/// column count and the same ordered column names. The first file in the
/// discovered order is the reference; either mismatch is fatal to the run.
pub struct SchemaChecker {
    reader: WeatherReader,
}

impl SchemaChecker {
    pub fn new() -> Self {
        Self {
            reader: WeatherReader::new(),
        }
    }

    /// Compare each file's data-table column count against the first
    /// file's.
    pub fn check_column_count(&self, files: &[PathBuf]) -> Result<()> {
        let mut expected: Option<usize> = None;

        for file in files {
            let table = self.reader.read_data_table(file)?;
            let count = table.column_count();

            match expected {
                None => {
                    info!(columns = count, "checking column count across all files");
                    expected = Some(count);
                }
                Some(reference) if reference != count => {
                    return Err(ProcessingError::ColumnCountMismatch {
                        file: file.clone(),
                        expected: reference,
                        found: count,
                    });
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Compare each file's column-name row (the header one line above the
    /// data readers' offset) against the first file's, including order.
    pub fn check_column_names(&self, files: &[PathBuf]) -> Result<()> {
        let mut expected: Option<Vec<String>> = None;

        for file in files {
            let names = self.reader.read_column_names(file)?;

            match &expected {
                None => {
                    info!(columns = ?names, "checking column names across all files");
                    expected = Some(names);
                }
                Some(reference) if *reference != names => {
                    return Err(ProcessingError::ColumnNameMismatch {
                        file: file.clone(),
                        expected: reference.clone(),
                        found: names,
                    });
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

impl Default for SchemaChecker {
    fn default() -> Self {
        Self::new()
    }
}
