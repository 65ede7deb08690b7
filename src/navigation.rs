//! Helpers for presenting a resolved route: hand-off links for
//! turn-by-turn navigation and framing the initial view.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::resolver::RenderGeometry;
use crate::stops::ValidatedStop;

const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Where to center the view when a route has nothing to draw.
    pub default_center: Coordinate,
    pub travel_mode: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_center: Coordinate::new(12.9716, 77.5946),
            travel_mode: "driving".to_string(),
        }
    }
}

/// Builds a Google Maps directions link through the validated stops.
///
/// The first stop is the origin, the last the destination, and any
/// stops in between become waypoints. Needs at least two stops.
pub fn directions_url(stops: &[ValidatedStop], config: &NavigationConfig) -> Option<String> {
    let (origin, rest) = stops.split_first()?;
    let (destination, intermediate) = rest.split_last()?;

    let mut url = format!(
        "{}&origin={}&destination={}",
        DIRECTIONS_BASE_URL,
        format_point(origin.coordinate),
        format_point(destination.coordinate)
    );

    if !intermediate.is_empty() {
        let waypoints = intermediate
            .iter()
            .map(|stop| format_point(stop.coordinate))
            .collect::<Vec<_>>()
            .join("|");
        url.push_str("&waypoints=");
        url.push_str(&waypoints);
    }

    url.push_str("&travelmode=");
    url.push_str(&config.travel_mode);
    Some(url)
}

/// Center of the geometry's bounds, or the configured default.
pub fn view_center(geometry: &RenderGeometry, config: &NavigationConfig) -> Coordinate {
    geometry
        .bounds()
        .map(|region| region.center())
        .unwrap_or(config.default_center)
}

fn format_point(point: Coordinate) -> String {
    format!("{},{}", point.lat, point.lng)
}
