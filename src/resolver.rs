//! Geometry resolution policy.
//!
//! Turns a route into one render-ready geometry: road-snapped when the
//! routing collaborator delivers usable segments, straight lines between
//! validated stops otherwise, and empty when there is nothing to draw.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coordinate::{bounds, BoundingRegion, Coordinate};
use crate::distance::path_length_km;
use crate::segments::assemble;
use crate::stops::{prepare, waypoints, Route};
use crate::traits::RoadGeometryProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Forwarded to the routing collaborator for traffic-aware routing.
    pub departure_time: Option<DateTime<Utc>>,
    /// Assembled road paths shorter than this fall back to straight lines.
    pub min_road_points: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            departure_time: None,
            min_road_points: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeometryKind {
    RoadSnapped,
    StraightLine,
    Empty,
}

/// Render-ready geometry for one route. Immutable once produced.
///
/// Serializable for handing to a renderer, but only [`resolve`] builds one,
/// so `bounds` always covers `path`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderGeometry {
    kind: GeometryKind,
    path: Vec<Coordinate>,
    bounds: Option<BoundingRegion>,
}

impl RenderGeometry {
    fn empty() -> Self {
        Self {
            kind: GeometryKind::Empty,
            path: Vec::new(),
            bounds: None,
        }
    }

    fn from_path(kind: GeometryKind, path: Vec<Coordinate>) -> Self {
        let bounds = bounds(&path);
        Self { kind, path, bounds }
    }

    /// How the path was obtained.
    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Points to draw, in traversal order.
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    /// Region covering the path, `None` when the path is empty.
    pub fn bounds(&self) -> Option<BoundingRegion> {
        self.bounds
    }

    /// Great-circle length of the path in kilometers.
    pub fn length_km(&self) -> f64 {
        path_length_km(&self.path)
    }
}

/// Resolves the geometry for a single route.
///
/// Calls the provider at most once and never fails: fetch errors, empty
/// responses and undecodable segments all degrade to straight lines.
/// Routes with fewer than two valid stops resolve to an empty geometry
/// without contacting the provider.
#[tracing::instrument(skip_all, fields(route_id = %route.id))]
pub fn resolve<P>(route: &Route, provider: &P, options: &ResolveOptions) -> RenderGeometry
where
    P: RoadGeometryProvider + ?Sized,
{
    let stops = prepare(&route.stops);
    if stops.len() < 2 {
        debug!(valid_stops = stops.len(), "not enough valid stops to draw a path");
        return RenderGeometry::empty();
    }

    let waypoints = waypoints(&stops);

    match provider.road_geometry(&waypoints, options.departure_time) {
        Ok(geometry) => {
            for segments in geometry.into_candidates() {
                let assembled = assemble(&segments);
                if !assembled.is_empty() && assembled.path.len() >= options.min_road_points {
                    debug!(
                        points = assembled.path.len(),
                        skipped_segments = assembled.skipped_segments,
                        "resolved road-snapped geometry"
                    );
                    return RenderGeometry::from_path(GeometryKind::RoadSnapped, assembled.path.into_points());
                }
                debug!(
                    segments = segments.len(),
                    points = assembled.path.len(),
                    "road geometry candidate unusable"
                );
            }
            debug!("no usable road geometry, drawing straight lines");
        }
        Err(err) => {
            warn!(error = %err, "road geometry unavailable, drawing straight lines");
        }
    }

    RenderGeometry::from_path(GeometryKind::StraightLine, waypoints)
}

/// Resolves many routes in parallel. Output order matches `routes`.
pub fn resolve_all<P>(routes: &[Route], provider: &P, options: &ResolveOptions) -> Vec<RenderGeometry>
where
    P: RoadGeometryProvider + Sync + ?Sized,
{
    routes
        .par_iter()
        .map(|route| resolve(route, provider, options))
        .collect()
}
