//! Bengaluru locations for realistic route fixtures.
//!
//! Approximate coordinates of well-known places around the city, close
//! enough to real streets to make plausible delivery routes.

#![allow(dead_code)]

use route_geometry::coordinate::Coordinate;
use route_geometry::polyline::encode;
use route_geometry::stops::{Route, Stop, StopKind};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

pub const DEPOT: Location = Location::new("Peenya Warehouse", 13.0285, 77.5197);

pub const DELIVERIES: &[Location] = &[
    Location::new("MG Road Metro", 12.9755, 77.6069),
    Location::new("Koramangala 5th Block", 12.9352, 77.6245),
    Location::new("Indiranagar 100ft Road", 12.9719, 77.6412),
    Location::new("Jayanagar 4th Block", 12.9250, 77.5838),
    Location::new("Malleshwaram 8th Cross", 13.0031, 77.5707),
    Location::new("Whitefield ITPL", 12.9857, 77.7367),
    Location::new("Electronic City Phase 1", 12.8452, 77.6602),
    Location::new("Hebbal Flyover", 13.0358, 77.5970),
];

/// Builds a route that starts at the depot and visits `count` deliveries.
///
/// Stops are listed in reverse sequence order so tests catch any code
/// that trusts input order.
pub fn delivery_route(id: &str, count: usize) -> Route {
    let mut stops = vec![Stop::new(format!("{}-depot", id), 0, StopKind::Pickup).at(DEPOT.lat, DEPOT.lng)];
    for (i, location) in DELIVERIES.iter().take(count).enumerate() {
        stops.push(
            Stop::new(format!("{}-stop-{}", id, i + 1), i as i32 + 1, StopKind::Delivery)
                .at(location.lat, location.lng)
                .order(format!("ORD-{}", 1000 + i)),
        );
    }
    stops.reverse();

    Route {
        id: id.to_string(),
        name: format!("Route {}", id),
        stops,
    }
}

/// Points on the 1e-5 degree grid between two locations, endpoints included.
///
/// Grid-aligned values survive a precision-5 encode/decode unchanged.
pub fn road_points(from: &Location, to: &Location, count: usize) -> Vec<Coordinate> {
    let steps = (count.max(2) - 1) as f64;
    (0..count)
        .map(|i| {
            let t = i as f64 / steps;
            let lat = ((from.lat + (to.lat - from.lat) * t) * 1e5).round() / 1e5;
            let lng = ((from.lng + (to.lng - from.lng) * t) * 1e5).round() / 1e5;
            Coordinate::new(lat, lng)
        })
        .collect()
}

pub fn encoded_leg(from: &Location, to: &Location, count: usize) -> String {
    encode(&road_points(from, to, count), 5).expect("fixture points are valid")
}
