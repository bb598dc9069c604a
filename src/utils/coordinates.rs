use geo::{point, GeodesicDistance};

use crate::models::Coordinate;

/// Distance between two coordinates along the WGS-84 ellipsoid, in
/// kilometers. Station matching requires the true geodesic, not a planar
/// or spherical approximation.
pub fn geodesic_distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let origin = point!(x: from.longitude, y: from.latitude);
    let destination = point!(x: to.longitude, y: to.latitude);

    origin.geodesic_distance(&destination) / 1000.0
}
