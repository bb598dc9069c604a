use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use validator::Validate;

use crate::error::Result;
use crate::models::Coordinate;
use crate::processors::ReconciliationPolicy;
use crate::utils::constants::{
    DEFAULT_DATE_FORMATS, DEFAULT_LOOKBACK_YEARS, DEFAULT_STATION_COLUMN_WIDTHS,
    DEFAULT_TEMPERATURE_THRESHOLD, STATIONS_FILE,
};

/// Externalized configuration surface: everything the original process
/// hardcoded. Loaded from a TOML file with `BOM_`-prefixed environment
/// overrides layered on top.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// Base folder holding the per-state station directories and the
    /// station reference table.
    pub base_path: PathBuf,

    /// Output CSV path; absent means a dated default under ./output.
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    #[serde(default = "default_stations_file")]
    pub stations_file: String,

    /// Locality name -> store street address.
    pub localities: BTreeMap<String, String>,

    /// Optional gazetteer: locality -> coordinate. When every configured
    /// locality appears here, no live geocoding is performed.
    #[serde(default)]
    pub coordinates: BTreeMap<String, Coordinate>,

    #[serde(default = "default_temperature_threshold")]
    #[validate(range(min = -50.0, max = 60.0))]
    pub temperature_threshold: f64,

    /// Year-window width for the windowed aggregation mode.
    #[serde(default = "default_lookback_years")]
    #[validate(range(min = 1, max = 200))]
    pub lookback_years: i32,

    #[serde(default = "default_station_column_widths")]
    pub station_column_widths: Vec<usize>,

    #[serde(default)]
    pub reconciliation: ReconciliationPolicy,

    /// Accepted date formats, attempted in order.
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
}

fn default_stations_file() -> String {
    STATIONS_FILE.to_string()
}

fn default_temperature_threshold() -> f64 {
    DEFAULT_TEMPERATURE_THRESHOLD
}

fn default_lookback_years() -> i32 {
    DEFAULT_LOOKBACK_YEARS
}

fn default_station_column_widths() -> Vec<usize> {
    DEFAULT_STATION_COLUMN_WIDTHS.to_vec()
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

impl Settings {
    /// Load settings from the given file (or `bom-processor.toml` in the
    /// working directory), then apply `BOM_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("bom-processor").required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("BOM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        if settings.localities.is_empty() {
            return Err(crate::error::ProcessingError::MissingData(
                "no localities configured".to_string(),
            ));
        }
        Ok(settings)
    }

    pub fn stations_table_path(&self) -> PathBuf {
        self.base_path.join(&self.stations_file)
    }

    /// True when the gazetteer covers every configured locality, so the
    /// run needs no live geocoding.
    pub fn covers_all_localities(&self) -> bool {
        self.localities
            .keys()
            .all(|locality| self.coordinates.contains_key(locality))
    }

    /// Address -> coordinate entries for the table geocoder, joined from
    /// the locality addresses and the gazetteer.
    pub fn gazetteer(&self) -> BTreeMap<String, Coordinate> {
        self.localities
            .iter()
            .filter_map(|(locality, address)| {
                self.coordinates
                    .get(locality)
                    .map(|coordinate| (address.clone(), *coordinate))
            })
            .collect()
    }
}
