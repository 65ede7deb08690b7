//! Seams to the collaborators the pipeline depends on.
//!
//! Both the routing service and the platform positioning facility live
//! outside this crate. Applications implement these traits over their
//! own transport.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::coordinate::Coordinate;
use crate::routing::RoadGeometry;
use crate::tracker::{PositionSample, TrackerConfig, TrackerError};

/// Failure reported by the routing collaborator. Opaque to the pipeline.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("routing service unavailable: {0}")]
    Unavailable(String),

    #[error("routing request failed: {0}")]
    Request(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Provides road-snapped geometry for an ordered list of waypoints.
///
/// Implementations perform exactly one request per call and own any
/// retry policy. Closures with the same signature implement this trait.
pub trait RoadGeometryProvider {
    fn road_geometry(
        &self,
        waypoints: &[Coordinate],
        departure_time: Option<DateTime<Utc>>,
    ) -> Result<RoadGeometry, FetchError>;
}

impl<F> RoadGeometryProvider for F
where
    F: Fn(&[Coordinate], Option<DateTime<Utc>>) -> Result<RoadGeometry, FetchError>,
{
    fn road_geometry(
        &self,
        waypoints: &[Coordinate],
        departure_time: Option<DateTime<Utc>>,
    ) -> Result<RoadGeometry, FetchError> {
        self(waypoints, departure_time)
    }
}

/// Stream of position updates from the platform. Dropping it unsubscribes.
pub type PositionStream = mpsc::UnboundedReceiver<Result<PositionSample, TrackerError>>;

/// The platform positioning facility.
pub trait PositionSource {
    /// Whether the platform can provide positions at all.
    fn is_supported(&self) -> bool;

    /// Opens a subscription honoring the accuracy and staleness tunables.
    fn subscribe(&self, config: &TrackerConfig) -> Result<PositionStream, TrackerError>;
}
