use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;

use crate::error::{ProcessingError, Result};
use crate::models::{WeatherRow, WeatherSchema};
use crate::utils::constants::{COLUMN_NAME_HEADER_SKIP, DATA_HEADER_SKIP, FOOTER_LINES};

/// One decoded table view of an export: the header row the reader landed
/// on and the data rows beneath it.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// Reader for BOM daily-observation CSV exports.
///
/// Files are windows-1252 encoded. The first twelve lines are free-text
/// preamble; line twelve (0-indexed offset 11) is the column-name row,
/// line thirteen the unit-label row the data readers treat as header, and
/// the final line carries the running totals. Blank lines are ignored.
pub struct WeatherReader {
    schema: WeatherSchema,
}

impl WeatherReader {
    pub fn new() -> Self {
        Self {
            schema: WeatherSchema::bom_daily(),
        }
    }

    pub fn with_schema(schema: WeatherSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &WeatherSchema {
        &self.schema
    }

    /// The column-name row, read with the shorter preamble skip.
    pub fn read_column_names(&self, path: &Path) -> Result<Vec<String>> {
        let text = decode(path)?;
        let lines = body_lines(&text, COLUMN_NAME_HEADER_SKIP, 0);
        let header_line = lines.first().ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "{}: no header row after {} preamble lines",
                path.display(),
                COLUMN_NAME_HEADER_SKIP
            ))
        })?;
        parse_record(header_line)
    }

    /// The data table: unit-label header plus observation rows, with the
    /// trailing totals line dropped.
    pub fn read_data_table(&self, path: &Path) -> Result<CsvTable> {
        self.read_table(path, FOOTER_LINES)
    }

    /// The reconciliation view: same offset, but the totals line is kept
    /// as the last row.
    pub fn read_table_with_totals(&self, path: &Path) -> Result<CsvTable> {
        self.read_table(path, 0)
    }

    fn read_table(&self, path: &Path, footer_lines: usize) -> Result<CsvTable> {
        let text = decode(path)?;
        let lines = body_lines(&text, DATA_HEADER_SKIP, footer_lines);

        let mut iter = lines.into_iter();
        let header_line = iter.next().ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "{}: no data table after {} preamble lines",
                path.display(),
                DATA_HEADER_SKIP
            ))
        })?;

        let header = parse_record(header_line)?;
        let rows = iter.map(parse_record).collect::<Result<Vec<_>>>()?;

        Ok(CsvTable { header, rows })
    }

    /// Load the observations of one export for aggregation, tagged with
    /// the owning locality. The unit header is validated against the
    /// schema descriptor once per file.
    pub fn read_observations(&self, path: &Path, locality: &str) -> Result<Vec<WeatherRow>> {
        let table = self.read_data_table(path)?;
        self.schema.validate_unit_header(&table.header)?;

        table
            .rows
            .iter()
            .map(|fields| WeatherRow::from_fields(&self.schema, locality, fields))
            .collect()
    }
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let (text, _, _) = WINDOWS_1252.decode(&bytes);
    Ok(text.into_owned())
}

/// Raw lines minus the footer, minus the preamble skip, minus blanks.
/// The footer is removed from the physical end of the file before the
/// skip is applied, matching the source format's layout.
fn body_lines(text: &str, skip: usize, footer_lines: usize) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().collect();
    for _ in 0..footer_lines {
        lines.pop();
    }
    lines
        .into_iter()
        .skip(skip)
        .filter(|line| !line.trim().is_empty())
        .collect()
}

fn parse_record(line: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|field| field.to_string()).collect()),
        None => Ok(Vec::new()),
    }
}
