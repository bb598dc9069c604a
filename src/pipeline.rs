use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use chrono::{Datelike, Local};
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{ProcessingError, Result};
use crate::geocode::{resolve_localities, Geocoder};
use crate::models::{HeatDayCount, WeatherRow};
use crate::processors::{
    discover_csv_files, Aggregator, ReconciliationChecker, ReconciliationPolicy,
    ReconciliationReport, SchemaChecker, StationLocator, StationMatch, YearWindow,
};
use crate::readers::{StationReader, WeatherReader};

/// Per-locality processing summary for the operator report.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalitySummary {
    pub files: usize,
    pub rows: usize,
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub matches: BTreeMap<String, StationMatch>,
    pub reconciliation: ReconciliationReport,
    pub summaries: BTreeMap<String, LocalitySummary>,
    pub counts: Vec<HeatDayCount>,
    pub files_processed: usize,
    pub rows_loaded: usize,
}

/// Drives the batch transform end to end:
/// geocode -> locate -> discover -> validate -> reconcile -> load -> aggregate.
///
/// Execution is sequential and fail-fast: the first fatal validation
/// error halts the run before any output is written.
pub struct Pipeline<'a> {
    settings: &'a Settings,
    current_year: i32,
    apply_year_window: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            current_year: Local::now().year(),
            apply_year_window: true,
        }
    }

    /// Aggregate every year on record instead of the lookback window.
    pub fn without_year_window(mut self) -> Self {
        self.apply_year_window = false;
        self
    }

    /// Pin the calendar year the window is anchored to.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn run(&self, geocoder: &dyn Geocoder) -> Result<PipelineOutcome> {
        let settings = self.settings;

        // Resolve each store address, then match it to its nearest station.
        let coordinates = resolve_localities(geocoder, &settings.localities)?;

        let station_reader = StationReader::with_widths(settings.station_column_widths.clone())?;
        let locator = StationLocator::from_table(&settings.stations_table_path(), &station_reader)?;
        let matches = locator.locate_all(&settings.base_path, &coordinates);

        // Discover each locality's CSV exports.
        let mut locality_files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        let mut all_files: Vec<PathBuf> = Vec::new();

        for (locality, station_match) in &matches {
            if !station_match.data_dir.is_dir() {
                return Err(ProcessingError::MissingData(format!(
                    "no data directory for locality {} at {}",
                    locality,
                    station_match.data_dir.display()
                )));
            }

            let files = discover_csv_files(&station_match.data_dir)?;
            if files.is_empty() {
                return Err(ProcessingError::MissingData(format!(
                    "no CSV files for locality {} under {}",
                    locality,
                    station_match.data_dir.display()
                )));
            }

            all_files.extend(files.iter().cloned());
            locality_files.insert(locality.clone(), files);
        }

        // Schema validation across the whole file set; either failure is
        // fatal before any row is loaded.
        let schema_checker = SchemaChecker::new();
        schema_checker.check_column_count(&all_files)?;
        info!("all files passed column count validation");
        schema_checker.check_column_names(&all_files)?;
        info!("all files passed column name validation");

        // Reconciliation never halts the run; under the enforcing policy
        // rejected files are excluded from loading.
        let reconciliation_checker = ReconciliationChecker::new(settings.reconciliation);
        let reconciliation = reconciliation_checker.check_files(&all_files);

        let excluded: HashSet<PathBuf> = match settings.reconciliation {
            ReconciliationPolicy::Enforcing => reconciliation
                .rejected_files()
                .iter()
                .map(|path| path.to_path_buf())
                .collect(),
            ReconciliationPolicy::Advisory => {
                if !reconciliation.all_reconciled() {
                    warn!(
                        rejected = reconciliation.rejected_files().len(),
                        "reconciliation rejections are advisory; files remain in processing"
                    );
                }
                HashSet::new()
            }
        };

        // Load observations, tagging each row with its locality.
        let weather_reader = WeatherReader::new();
        let mut rows: Vec<WeatherRow> = Vec::new();
        let mut summaries: BTreeMap<String, LocalitySummary> = BTreeMap::new();
        let mut files_processed = 0usize;

        for (locality, files) in &locality_files {
            let mut summary = LocalitySummary::default();

            for file in files {
                if excluded.contains(file) {
                    info!(file = %file.display(), "excluded by reconciliation policy");
                    continue;
                }
                let observations = weather_reader.read_observations(file, locality)?;
                summary.files += 1;
                summary.rows += observations.len();
                rows.extend(observations);
            }

            files_processed += summary.files;
            info!(
                locality = %locality,
                files = summary.files,
                rows = summary.rows,
                "loaded locality data"
            );
            summaries.insert(locality.clone(), summary);
        }

        let rows_loaded = rows.len();

        // Aggregate.
        let mut aggregator = Aggregator::new(settings.temperature_threshold)
            .with_date_formats(settings.date_formats.clone());
        if self.apply_year_window {
            aggregator = aggregator
                .with_window(YearWindow::new(self.current_year, settings.lookback_years));
        }
        let counts = aggregator.aggregate(&rows)?;

        Ok(PipelineOutcome {
            matches,
            reconciliation,
            summaries,
            counts,
            files_processed,
            rows_loaded,
        })
    }
}
