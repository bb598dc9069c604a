use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::WeatherSchema;

/// One daily observation, tagged with the locality whose nearest station
/// produced it.
///
/// The date is kept as raw text: its parse failure semantics belong to the
/// aggregation stage (a bad date fails the whole run, a blank one drops the
/// row). Numeric fields are coerced at load time; blank or unparseable
/// cells become `None`, never zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRow {
    pub locality: String,
    pub station_name: String,
    pub date: String,
    pub evapo_transpiration: Option<f64>,
    pub rain: Option<f64>,
    pub pan_evaporation: Option<f64>,
    pub maximum_temperature: Option<f64>,
    pub minimum_temperature: Option<f64>,
    pub maximum_relative_humidity: Option<f64>,
    pub minimum_relative_humidity: Option<f64>,
    pub average_10m_wind_speed: Option<f64>,
    pub solar_radiation: Option<f64>,
}

impl WeatherRow {
    /// Bind a raw record's positional fields to their semantic names
    /// through the schema descriptor.
    pub fn from_fields(schema: &WeatherSchema, locality: &str, fields: &[String]) -> Result<Self> {
        if fields.len() != schema.column_count() {
            return Err(ProcessingError::InvalidFormat(format!(
                "row has {} fields, schema expects {}",
                fields.len(),
                schema.column_count()
            )));
        }

        let text = |name: &str| -> String {
            fields[schema.index_of(name).expect("schema column")]
                .trim()
                .to_string()
        };
        let numeric = |name: &str| -> Option<f64> {
            parse_numeric(&fields[schema.index_of(name).expect("schema column")])
        };

        Ok(Self {
            locality: locality.to_string(),
            station_name: text("station_name"),
            date: text("date"),
            evapo_transpiration: numeric("evapo_transpiration"),
            rain: numeric("rain"),
            pan_evaporation: numeric("pan_evaporation"),
            maximum_temperature: numeric("maximum_temperature"),
            minimum_temperature: numeric("minimum_temperature"),
            maximum_relative_humidity: numeric("maximum_relative_humidity"),
            minimum_relative_humidity: numeric("minimum_relative_humidity"),
            average_10m_wind_speed: numeric("average_10m_wind_speed"),
            solar_radiation: numeric("solar_radiation"),
        })
    }

    pub fn has_date(&self) -> bool {
        !self.date.trim().is_empty()
    }
}

/// Permissive numeric coercion: blank or unparseable cells are missing.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(date: &str, max_temp: &str) -> Vec<String> {
        vec![
            "MOORABBIN AIRPORT",
            date,
            "5.2",
            "0.0",
            "6.4",
            max_temp,
            "21.0",
            "65",
            "30",
            "15.5",
            "28.9",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    #[test]
    fn test_from_fields() {
        let schema = WeatherSchema::bom_daily();
        let row = WeatherRow::from_fields(&schema, "NOTTING HILL", &fields("2023-01-05", "38.4"))
            .unwrap();

        assert_eq!(row.locality, "NOTTING HILL");
        assert_eq!(row.station_name, "MOORABBIN AIRPORT");
        assert_eq!(row.date, "2023-01-05");
        assert_eq!(row.maximum_temperature, Some(38.4));
        assert_eq!(row.rain, Some(0.0));
        assert!(row.has_date());
    }

    #[test]
    fn test_missing_values_are_none() {
        let schema = WeatherSchema::bom_daily();
        let row =
            WeatherRow::from_fields(&schema, "GEELONG", &fields("2023-01-05", "  ")).unwrap();
        assert_eq!(row.maximum_temperature, None);

        let row = WeatherRow::from_fields(&schema, "GEELONG", &fields("2023-01-05", "n/a"))
            .unwrap();
        assert_eq!(row.maximum_temperature, None);
    }

    #[test]
    fn test_wrong_field_count_rejected() {
        let schema = WeatherSchema::bom_daily();
        let mut short = fields("2023-01-05", "38.4");
        short.pop();
        assert!(WeatherRow::from_fields(&schema, "GEELONG", &short).is_err());
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(" 35.6 "), Some(35.6));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("   "), None);
        assert_eq!(parse_numeric("Calm"), None);
    }
}
