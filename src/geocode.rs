use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::Coordinate;

const ARCGIS_ENDPOINT: &str =
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates";

/// Boundary for resolving a postal address to a coordinate. The pipeline
/// core only sees this trait; the live HTTP implementation and the static
/// gazetteer are interchangeable.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<Coordinate>;
}

/// Resolve every locality's address, preserving locality order. The first
/// unresolvable address fails the run; each address gets exactly one
/// lookup attempt.
pub fn resolve_localities(
    geocoder: &dyn Geocoder,
    addresses: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, Coordinate>> {
    let mut resolved = BTreeMap::new();

    for (locality, address) in addresses {
        let coordinate = geocoder.geocode(address)?;
        debug!(
            locality = %locality,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "resolved address"
        );
        resolved.insert(locality.clone(), coordinate);
    }

    Ok(resolved)
}

/// Single-line geocoder backed by the public ArcGIS World service.
pub struct ArcGisGeocoder {
    client: reqwest::blocking::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct CandidateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    location: CandidateLocation,
}

#[derive(Debug, Deserialize)]
struct CandidateLocation {
    x: f64,
    y: f64,
}

impl ArcGisGeocoder {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: ARCGIS_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint,
        }
    }

    fn best_candidate(address: &str, response: CandidateResponse) -> Result<Coordinate> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProcessingError::Geocoding {
                address: address.to_string(),
            })?;

        // ArcGIS returns x = longitude, y = latitude.
        Ok(Coordinate::new(candidate.location.y, candidate.location.x))
    }
}

impl Default for ArcGisGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for ArcGisGeocoder {
    fn geocode(&self, address: &str) -> Result<Coordinate> {
        let response: CandidateResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("f", "json"),
                ("singleLine", address),
                ("outFields", "none"),
                ("maxLocations", "1"),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        Self::best_candidate(address, response)
    }
}

/// Gazetteer geocoder over a fixed locality-address table, used when the
/// configuration supplies coordinates directly and as the test seam.
pub struct TableGeocoder {
    entries: BTreeMap<String, Coordinate>,
}

impl TableGeocoder {
    pub fn new(entries: BTreeMap<String, Coordinate>) -> Self {
        Self { entries }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(address)
    }
}

impl Geocoder for TableGeocoder {
    fn geocode(&self, address: &str) -> Result<Coordinate> {
        self.entries
            .get(address)
            .copied()
            .ok_or_else(|| ProcessingError::Geocoding {
                address: address.to_string(),
            })
    }
}
