//! Wire shapes exchanged with the routing service.
//!
//! Transport is left to the application; these types cover the request
//! body and the two response shapes the service produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Road geometry as returned by the routing collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadGeometry {
    /// One encoded polyline covering the whole route.
    Single(String),
    /// One encoded polyline per leg, in traversal order, plus the whole
    /// route polyline when the response carried one as well.
    Sections {
        sections: Vec<String>,
        polyline: Option<String>,
    },
}

impl RoadGeometry {
    /// Per-leg geometry with no whole-route polyline.
    pub fn sections<S: Into<String>>(sections: impl IntoIterator<Item = S>) -> Self {
        RoadGeometry::Sections {
            sections: sections.into_iter().map(Into::into).collect(),
            polyline: None,
        }
    }

    /// Normalizes either shape into segment lists to try in order.
    ///
    /// Sections come first; a whole-route polyline follows as a single
    /// segment list of its own.
    pub fn into_candidates(self) -> Vec<Vec<String>> {
        match self {
            RoadGeometry::Single(polyline) => vec![vec![polyline]],
            RoadGeometry::Sections { sections, polyline } => {
                let mut candidates = vec![sections];
                candidates.extend(polyline.map(|polyline| vec![polyline]));
                candidates
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinate> for Waypoint {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            lat: coordinate.lat,
            lng: coordinate.lng,
        }
    }
}

/// Request body for a road route lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub waypoints: Vec<Waypoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
}

impl RouteRequest {
    pub fn new(waypoints: &[Coordinate], departure_time: Option<DateTime<Utc>>) -> Self {
        Self {
            waypoints: waypoints.iter().copied().map(Waypoint::from).collect(),
            departure_time,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteResponse {
    pub route: Option<RouteBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteBody {
    pub sections: Option<Vec<Option<String>>>,
    pub polyline: Option<String>,
}

impl RouteResponse {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Extracts the geometry to render.
    ///
    /// Empty section entries are dropped. When any section remains the
    /// whole-route polyline is kept alongside it as a fallback; otherwise a
    /// non-empty polyline alone is used.
    pub fn into_road_geometry(self) -> Option<RoadGeometry> {
        let body = self.route?;

        let sections: Vec<String> = body
            .sections
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter(|section| !section.is_empty())
            .collect();
        let polyline = body.polyline.filter(|polyline| !polyline.is_empty());

        if sections.is_empty() {
            return polyline.map(RoadGeometry::Single);
        }
        Some(RoadGeometry::Sections { sections, polyline })
    }
}
