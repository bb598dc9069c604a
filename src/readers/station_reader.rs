use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ProcessingError, Result};
use crate::models::StationRecord;
use crate::utils::constants::DEFAULT_STATION_COLUMN_WIDTHS;

/// Reader for the fixed-width station reference table.
///
/// The table carries no header row; each line is sliced into fields by the
/// configured column widths (id, state, secondary id, name, commissioned
/// date, latitude, longitude).
pub struct StationReader {
    widths: Vec<usize>,
}

impl StationReader {
    pub fn new() -> Self {
        Self {
            widths: DEFAULT_STATION_COLUMN_WIDTHS.to_vec(),
        }
    }

    pub fn with_widths(widths: Vec<usize>) -> Result<Self> {
        if widths.len() != DEFAULT_STATION_COLUMN_WIDTHS.len() {
            return Err(ProcessingError::StationTable(format!(
                "expected {} column widths, got {}",
                DEFAULT_STATION_COLUMN_WIDTHS.len(),
                widths.len()
            )));
        }
        Ok(Self { widths })
    }

    /// Read all station records. An empty or malformed table is fatal.
    pub fn read_stations(&self, path: &Path) -> Result<Vec<StationRecord>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut stations = Vec::new();
        let mut seen_ids = HashSet::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line_number = index + 1;

            if line.trim().is_empty() {
                continue;
            }

            let station = self.parse_station_line(&line, line_number)?;
            if !seen_ids.insert(station.id) {
                return Err(ProcessingError::StationTable(format!(
                    "duplicate station id {} at line {}",
                    station.id, line_number
                )));
            }
            stations.push(station);
        }

        if stations.is_empty() {
            return Err(ProcessingError::StationTable(format!(
                "no station records in {}",
                path.display()
            )));
        }

        Ok(stations)
    }

    fn parse_station_line(&self, line: &str, line_number: usize) -> Result<StationRecord> {
        let fields = split_fixed_width(line, &self.widths);

        if fields.len() < self.widths.len() {
            return Err(ProcessingError::StationTable(format!(
                "line {}: expected {} fields, found {}",
                line_number,
                self.widths.len(),
                fields.len()
            )));
        }

        let id = fields[0].parse::<u32>().map_err(|_| {
            ProcessingError::StationTable(format!(
                "line {}: invalid station id '{}'",
                line_number, fields[0]
            ))
        })?;

        let latitude = fields[5].parse::<f64>().map_err(|_| {
            ProcessingError::StationTable(format!(
                "line {}: invalid latitude '{}'",
                line_number, fields[5]
            ))
        })?;

        let longitude = fields[6].parse::<f64>().map_err(|_| {
            ProcessingError::StationTable(format!(
                "line {}: invalid longitude '{}'",
                line_number, fields[6]
            ))
        })?;

        Ok(StationRecord::new(
            id,
            fields[1].clone(),
            fields[2].clone(),
            fields[3].clone(),
            fields[4].clone(),
            latitude,
            longitude,
        ))
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Slice a line into trimmed fields by character widths. A line shorter
/// than the full layout yields fewer fields.
fn split_fixed_width(line: &str, widths: &[usize]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut fields = Vec::with_capacity(widths.len());
    let mut pos = 0;

    for &width in widths {
        if pos >= chars.len() {
            break;
        }
        let end = (pos + width).min(chars.len());
        let field: String = chars[pos..end].iter().collect();
        fields.push(field.trim().to_string());
        pos = end;
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn station_line(
        id: u32,
        state: &str,
        secondary: &str,
        name: &str,
        date: &str,
        lat: f64,
        lon: f64,
    ) -> String {
        format!(
            "{:<8}{:<4}{:<6}{:<41}{:<16}{:>9}{:>10}",
            id, state, secondary, name, date, lat, lon
        )
    }

    #[test]
    fn test_parse_station_line() {
        let reader = StationReader::new();
        let line = station_line(
            9225,
            "WA",
            "9225",
            "PERTH METRO",
            "01/01/1994",
            -31.9192,
            115.8728,
        );

        let station = reader.parse_station_line(&line, 1).unwrap();
        assert_eq!(station.id, 9225);
        assert_eq!(station.state, "WA");
        assert_eq!(station.name, "PERTH METRO");
        assert!((station.latitude - -31.9192).abs() < 1e-9);
        assert!((station.longitude - 115.8728).abs() < 1e-9);
    }

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            "{}",
            station_line(
                9225,
                "WA",
                "9225",
                "PERTH METRO",
                "01/01/1994",
                -31.9192,
                115.8728
            )
        )?;
        writeln!(temp_file)?;
        writeln!(
            temp_file,
            "{}",
            station_line(
                86077,
                "VIC",
                "86077",
                "MOORABBIN AIRPORT",
                "01/01/1971",
                -37.9800,
                145.0960
            )
        )?;

        let reader = StationReader::new();
        let stations = reader.read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, 9225);
        assert_eq!(stations[1].name, "MOORABBIN AIRPORT");

        Ok(())
    }

    #[test]
    fn test_empty_table_is_fatal() {
        let temp_file = NamedTempFile::new().unwrap();
        let reader = StationReader::new();
        assert!(reader.read_stations(temp_file.path()).is_err());
    }

    #[test]
    fn test_truncated_line_is_fatal() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "9225    WA  9225  PERTH METRO").unwrap();

        let reader = StationReader::new();
        assert!(reader.read_stations(temp_file.path()).is_err());
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let mut temp_file = NamedTempFile::new().unwrap();
        for _ in 0..2 {
            writeln!(
                temp_file,
                "{}",
                station_line(
                    9225,
                    "WA",
                    "9225",
                    "PERTH METRO",
                    "01/01/1994",
                    -31.9192,
                    115.8728
                )
            )
            .unwrap();
        }

        let reader = StationReader::new();
        assert!(reader.read_stations(temp_file.path()).is_err());
    }

    #[test]
    fn test_bad_widths_rejected() {
        assert!(StationReader::with_widths(vec![8, 4]).is_err());
        assert!(StationReader::with_widths(vec![8, 4, 6, 41, 16, 9, 10]).is_ok());
    }
}
