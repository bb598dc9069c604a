use serde::{Deserialize, Serialize};

/// One output row: the number of days in `year` on which `locality`'s
/// nearest station recorded a maximum temperature above the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatDayCount {
    pub locality_name: String,
    pub year: i32,
    pub count: u64,
}

impl HeatDayCount {
    pub fn new(locality_name: String, year: i32, count: u64) -> Self {
        Self {
            locality_name,
            year,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_order() {
        // The serialized field order is the output CSV column order.
        let row = HeatDayCount::new("BELMONT".to_string(), 2020, 14);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"locality_name":"BELMONT","year":2020,"count":14}"#
        );
    }
}
