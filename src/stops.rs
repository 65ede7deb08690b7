//! Route stops and the sequencing/validation pass run before routing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coordinate::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopKind {
    Pickup,
    Delivery,
}

/// A single stop on a route as delivered by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub sequence: i32,
    pub kind: StopKind,
    pub coordinate: Option<Coordinate>,
    pub order_reference: Option<String>,
    pub estimated_arrival: Option<DateTime<Utc>>,
}

impl Stop {
    pub fn new(id: impl Into<String>, sequence: i32, kind: StopKind) -> Self {
        Self {
            id: id.into(),
            sequence,
            kind,
            coordinate: None,
            order_reference: None,
            estimated_arrival: None,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.coordinate = Some(Coordinate::new(lat, lng));
        self
    }

    pub fn order(mut self, reference: impl Into<String>) -> Self {
        self.order_reference = Some(reference.into());
        self
    }

    pub fn eta(mut self, at: DateTime<Utc>) -> Self {
        self.estimated_arrival = Some(at);
        self
    }
}

/// A route owned by the caller. The geometry pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub stops: Vec<Stop>,
}

/// Position of a validated stop within the rendered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopRole {
    Start,
    Intermediate,
    End,
}

/// A stop that survived validation, with a guaranteed-valid coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedStop {
    pub id: String,
    pub sequence: i32,
    pub kind: StopKind,
    pub role: StopRole,
    pub coordinate: Coordinate,
    pub order_reference: Option<String>,
    pub estimated_arrival: Option<DateTime<Utc>>,
}

/// Orders stops by sequence, drops invalid coordinates and assigns roles.
///
/// The input slice is left untouched. Roles depend only on position in
/// the filtered sequence: first is `Start`, last is `End`. A single
/// surviving stop is `Start`.
pub fn prepare(stops: &[Stop]) -> Vec<ValidatedStop> {
    let mut ordered: Vec<&Stop> = stops.iter().collect();
    // `sort_by_key` is stable, so equal sequences keep input order.
    ordered.sort_by_key(|stop| stop.sequence);

    let valid: Vec<(&Stop, Coordinate)> = ordered
        .into_iter()
        .filter_map(|stop| match stop.coordinate {
            Some(coordinate) if coordinate.is_valid() => Some((stop, coordinate)),
            _ => {
                debug!(stop_id = %stop.id, sequence = stop.sequence, "excluding stop without a valid coordinate");
                None
            }
        })
        .collect();

    let last = valid.len().saturating_sub(1);
    valid
        .into_iter()
        .enumerate()
        .map(|(index, (stop, coordinate))| ValidatedStop {
            id: stop.id.clone(),
            sequence: stop.sequence,
            kind: stop.kind,
            role: if index == 0 {
                StopRole::Start
            } else if index == last {
                StopRole::End
            } else {
                StopRole::Intermediate
            },
            coordinate,
            order_reference: stop.order_reference.clone(),
            estimated_arrival: stop.estimated_arrival,
        })
        .collect()
}

/// Coordinates of validated stops, in order. These double as waypoints.
pub fn waypoints(stops: &[ValidatedStop]) -> Vec<Coordinate> {
    stops.iter().map(|stop| stop.coordinate).collect()
}
