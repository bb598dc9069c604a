use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{HeatDayCount, WeatherRow};
use crate::utils::constants::DEFAULT_DATE_FORMATS;

/// The year-window filter: only years strictly greater than
/// `current_year - lookback_years` survive.
#[derive(Debug, Clone, Copy)]
pub struct YearWindow {
    pub current_year: i32,
    pub lookback_years: i32,
}

impl YearWindow {
    pub fn new(current_year: i32, lookback_years: i32) -> Self {
        Self {
            current_year,
            lookback_years,
        }
    }

    pub fn includes(&self, year: i32) -> bool {
        year > self.current_year - self.lookback_years
    }
}

/// Counts extreme-heat days per (locality, year).
///
/// Rows missing a date or a maximum temperature are dropped silently; a
/// non-blank date that matches none of the accepted formats fails the
/// whole run. Without a window the aggregation covers every year on
/// record.
pub struct Aggregator {
    threshold: f64,
    window: Option<YearWindow>,
    date_formats: Vec<String>,
}

impl Aggregator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            window: None,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn with_window(mut self, window: YearWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        self.date_formats = formats;
        self
    }

    /// Parse a date against the accepted formats, in order.
    fn parse_date(&self, raw: &str) -> Result<NaiveDate> {
        let trimmed = raw.trim();
        for format in &self.date_formats {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Ok(date);
            }
        }
        Err(ProcessingError::DateParse {
            value: raw.to_string(),
        })
    }

    pub fn aggregate(&self, rows: &[WeatherRow]) -> Result<Vec<HeatDayCount>> {
        let mut counts: BTreeMap<(String, i32), u64> = BTreeMap::new();
        let mut dropped = 0usize;

        for row in rows {
            if !row.has_date() {
                dropped += 1;
                continue;
            }
            let date = self.parse_date(&row.date)?;

            let Some(max_temperature) = row.maximum_temperature else {
                dropped += 1;
                continue;
            };

            if max_temperature <= self.threshold {
                continue;
            }

            let year = date.year();
            if let Some(window) = self.window {
                if !window.includes(year) {
                    continue;
                }
            }

            *counts.entry((row.locality.clone(), year)).or_insert(0) += 1;
        }

        debug!(dropped, groups = counts.len(), "aggregated rows");

        Ok(counts
            .into_iter()
            .map(|((locality, year), count)| HeatDayCount::new(locality, year, count))
            .collect())
    }
}
