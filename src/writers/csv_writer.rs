use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::HeatDayCount;

/// Writes the aggregate output: one `locality_name,year,count` row per
/// (locality, year) group, no index column.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_counts(&self, counts: &[HeatDayCount], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        for count in counts {
            writer.serialize(count)?;
        }
        writer.flush()?;

        info!(rows = counts.len(), path = %path.display(), "wrote aggregate output");
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
