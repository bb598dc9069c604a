use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Coordinate;

/// One row of the fixed-width station reference table.
///
/// The table carries no header; fields are identified purely by their
/// column widths. The commissioned date is kept as opaque text because
/// nothing downstream interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StationRecord {
    pub id: u32,

    #[validate(length(min = 1))]
    pub state: String,

    pub secondary_id: String,

    #[validate(length(min = 1))]
    pub name: String,

    pub commissioned: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl StationRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        state: String,
        secondary_id: String,
        name: String,
        commissioned: String,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id,
            state,
            secondary_id,
            name,
            commissioned,
            latitude,
            longitude,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Directory name component for this station's CSV exports:
    /// lowercased, spaces replaced with underscores.
    pub fn directory_name(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }

    /// State code component, lowercased.
    pub fn state_directory(&self) -> String {
        self.state.to_lowercase()
    }
}
