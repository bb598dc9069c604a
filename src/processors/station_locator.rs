use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::models::{Coordinate, StationRecord};
use crate::readers::StationReader;
use crate::utils::coordinates::geodesic_distance_km;

/// A locality's nearest station, the geodesic distance to it, and the
/// directory holding that station's CSV exports.
#[derive(Debug, Clone)]
pub struct StationMatch {
    pub station: StationRecord,
    pub distance_km: f64,
    pub data_dir: PathBuf,
}

/// Nearest-station matcher over the fixed-width reference table.
pub struct StationLocator {
    stations: Vec<StationRecord>,
}

impl StationLocator {
    pub fn new(stations: Vec<StationRecord>) -> Result<Self> {
        if stations.is_empty() {
            return Err(ProcessingError::StationTable(
                "cannot locate stations over an empty table".to_string(),
            ));
        }
        Ok(Self { stations })
    }

    pub fn from_table(path: &Path, reader: &StationReader) -> Result<Self> {
        let stations = reader.read_stations(path)?;
        info!(stations = stations.len(), table = %path.display(), "loaded station table");
        Self::new(stations)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// The station nearest to `target` by geodesic distance. A strict `<`
    /// comparison keeps the first record in table order when distances tie.
    pub fn nearest(&self, target: Coordinate) -> (&StationRecord, f64) {
        let mut best = &self.stations[0];
        let mut best_distance = geodesic_distance_km(target, best.coordinate());

        for station in &self.stations[1..] {
            let distance = geodesic_distance_km(target, station.coordinate());
            if distance < best_distance {
                best = station;
                best_distance = distance;
            }
        }

        (best, best_distance)
    }

    /// Match every locality to its nearest station and derive the data
    /// directory `<base>/<state>/<station_name>` for each.
    pub fn locate_all(
        &self,
        base_path: &Path,
        coordinates: &BTreeMap<String, Coordinate>,
    ) -> BTreeMap<String, StationMatch> {
        let mut matches = BTreeMap::new();

        for (locality, coordinate) in coordinates {
            let (station, distance_km) = self.nearest(*coordinate);
            let data_dir = base_path
                .join(station.state_directory())
                .join(station.directory_name());

            info!(
                locality = %locality,
                station = %station.name,
                distance_km = format!("{:.1}", distance_km).as_str(),
                "matched nearest station"
            );

            matches.insert(
                locality.clone(),
                StationMatch {
                    station: station.clone(),
                    distance_km,
                    data_dir,
                },
            );
        }

        matches
    }
}

/// The `*.csv` files inside a station's data directory, sorted by name
/// for a deterministic processing order.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn station(id: u32, state: &str, name: &str, lat: f64, lon: f64) -> StationRecord {
        StationRecord::new(
            id,
            state.to_string(),
            format!("{:06}", id),
            name.to_string(),
            "01/01/1990".to_string(),
            lat,
            lon,
        )
    }

    fn three_stations() -> Vec<StationRecord> {
        vec![
            station(9225, "WA", "PERTH METRO", -31.9192, 115.8728),
            station(86077, "VIC", "MOORABBIN AIRPORT", -37.9800, 145.0960),
            station(87184, "VIC", "BREAKWATER (GEELONG RACECOURSE)", -38.1736, 144.3828),
        ]
    }

    #[test]
    fn test_nearest_picks_geodesic_minimum() {
        let locator = StationLocator::new(three_stations()).unwrap();

        // Notting Hill VIC sits ~9 km from Moorabbin Airport and hundreds
        // of kilometers from the other two.
        let notting_hill = Coordinate::new(-37.9106, 145.1187);
        let (nearest, distance) = locator.nearest(notting_hill);

        assert_eq!(nearest.name, "MOORABBIN AIRPORT");
        assert!(distance < 15.0, "got {}", distance);

        let belmont_wa = Coordinate::new(-31.9655, 115.9345);
        let (nearest, _) = locator.nearest(belmont_wa);
        assert_eq!(nearest.name, "PERTH METRO");
    }

    #[test]
    fn test_tie_keeps_table_order() {
        let twin_a = station(1, "VIC", "TWIN A", -37.5, 145.0);
        let mut twin_b = station(2, "VIC", "TWIN B", -37.5, 145.0);
        twin_b.secondary_id = "000002".to_string();

        let locator = StationLocator::new(vec![twin_a, twin_b]).unwrap();
        let (nearest, _) = locator.nearest(Coordinate::new(-37.0, 145.0));
        assert_eq!(nearest.name, "TWIN A");
    }

    #[test]
    fn test_locate_all_derives_data_dirs() {
        let locator = StationLocator::new(three_stations()).unwrap();

        let mut coordinates = BTreeMap::new();
        coordinates.insert("BELMONT".to_string(), Coordinate::new(-31.9655, 115.9345));
        coordinates.insert("GEELONG".to_string(), Coordinate::new(-38.1499, 144.3617));

        let matches = locator.locate_all(Path::new("/data/tables"), &coordinates);

        assert_eq!(
            matches["BELMONT"].data_dir,
            Path::new("/data/tables/wa/perth_metro")
        );
        assert_eq!(
            matches["GEELONG"].data_dir,
            Path::new("/data/tables/vic/breakwater_(geelong_racecourse)")
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(StationLocator::new(Vec::new()).is_err());
    }

    #[test]
    fn test_discover_csv_files_sorted() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("IDCJDW3049.202301.csv")).unwrap();
        File::create(dir.path().join("IDCJDW3049.202212.csv")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let files = discover_csv_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("IDCJDW3049.202212.csv"));
        assert!(files[1].ends_with("IDCJDW3049.202301.csv"));
    }

    #[test]
    fn test_discover_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("vic").join("nowhere");
        assert!(discover_csv_files(&missing).is_err());
    }
}
