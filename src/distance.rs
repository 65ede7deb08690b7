//! Great-circle distances along a rendered path.
//!
//! Ignores terrain and roads; road-snapped paths are already dense enough
//! that summing haversine legs tracks the driven distance closely.

use crate::coordinate::Coordinate;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Total length of a path in kilometers. Zero for fewer than two points.
pub fn path_length_km(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|leg| haversine_km(leg[0], leg[1]))
        .sum()
}
