use crate::error::{ProcessingError, Result};

/// Value kind a raw column is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Date,
    Numeric,
}

/// One column of the daily-observation table: the semantic name used
/// throughout the pipeline, the unit label printed in the table's own
/// header row, and the value kind.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub unit: &'static str,
    pub kind: ColumnKind,
}

/// Explicit ordered descriptor of the eleven raw columns in a BOM daily
/// export. Column meaning is bound here, once, instead of being inferred
/// from position at each use site.
#[derive(Debug, Clone)]
pub struct WeatherSchema {
    columns: Vec<ColumnSpec>,
}

const BOM_DAILY_COLUMNS: [ColumnSpec; 11] = [
    ColumnSpec {
        name: "station_name",
        unit: "",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        name: "date",
        unit: "",
        kind: ColumnKind::Date,
    },
    ColumnSpec {
        name: "evapo_transpiration",
        unit: "(mm)",
        kind: ColumnKind::Numeric,
    },
    ColumnSpec {
        name: "rain",
        unit: "(mm)",
        kind: ColumnKind::Numeric,
    },
    ColumnSpec {
        name: "pan_evaporation",
        unit: "(mm)",
        kind: ColumnKind::Numeric,
    },
    ColumnSpec {
        name: "maximum_temperature",
        unit: "(\u{b0}C)",
        kind: ColumnKind::Numeric,
    },
    ColumnSpec {
        name: "minimum_temperature",
        unit: "(\u{b0}C)",
        kind: ColumnKind::Numeric,
    },
    ColumnSpec {
        name: "maximum_relative_humidity",
        unit: "(%)",
        kind: ColumnKind::Numeric,
    },
    ColumnSpec {
        name: "minimum_relative_humidity",
        unit: "(%)",
        kind: ColumnKind::Numeric,
    },
    ColumnSpec {
        name: "average_10m_wind_speed",
        unit: "(km/h)",
        kind: ColumnKind::Numeric,
    },
    ColumnSpec {
        name: "solar_radiation",
        unit: "(MJ/m2)",
        kind: ColumnKind::Numeric,
    },
];

impl WeatherSchema {
    /// The daily-observation layout shared by every station export.
    pub fn bom_daily() -> Self {
        Self {
            columns: BOM_DAILY_COLUMNS.to_vec(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// The two running-total columns cross-checked during reconciliation:
    /// evapotranspiration and rain.
    pub fn accumulator_indices(&self) -> (usize, usize) {
        let et = self
            .index_of("evapo_transpiration")
            .expect("schema defines evapo_transpiration");
        let rain = self.index_of("rain").expect("schema defines rain");
        (et, rain)
    }

    /// Validate a file's unit-label header row against the descriptor.
    /// The accumulator columns must carry their expected `(mm)` labels;
    /// a table that does not match cannot be reconciled meaningfully.
    pub fn validate_unit_header(&self, header: &[String]) -> Result<()> {
        if header.len() != self.columns.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "unit header has {} columns, schema expects {}",
                header.len(),
                self.columns.len()
            )));
        }

        let (et, rain) = self.accumulator_indices();
        for idx in [et, rain] {
            let expected = self.columns[idx].unit;
            let found = header[idx].trim();
            if found != expected {
                return Err(ProcessingError::InvalidFormat(format!(
                    "column {} ('{}') carries unit '{}', expected '{}'",
                    idx, self.columns[idx].name, found, expected
                )));
            }
        }

        Ok(())
    }
}

impl Default for WeatherSchema {
    fn default() -> Self {
        Self::bom_daily()
    }
}
