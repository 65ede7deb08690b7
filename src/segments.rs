//! Assembles per-leg encoded segments into one continuous path.

use tracing::warn;

use crate::coordinate::Coordinate;
use crate::polyline::{self, Polyline};

/// Result of assembling a list of encoded segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledPath {
    pub path: Polyline,
    /// Segments that failed to decode and were left out.
    pub skipped_segments: usize,
    /// Decoded points outside the valid coordinate range.
    pub dropped_points: usize,
}

impl AssembledPath {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Decodes each segment and concatenates the results in segment order.
///
/// A segment that fails to decode is skipped; the others still make it
/// into the path. An empty result means no road data is available.
pub fn assemble<S: AsRef<str>>(segments: &[S]) -> AssembledPath {
    let mut points: Vec<Coordinate> = Vec::new();
    let mut skipped_segments = 0;
    let mut dropped_points = 0;

    for (index, segment) in segments.iter().enumerate() {
        match polyline::decode(segment.as_ref()) {
            Ok(decoded) => {
                let before = points.len();
                let total = decoded.len();
                points.extend(decoded.into_points().into_iter().filter(Coordinate::is_valid));
                dropped_points += total - (points.len() - before);
            }
            Err(err) => {
                warn!(segment = index, error = %err, "skipping undecodable route segment");
                skipped_segments += 1;
            }
        }
    }

    if dropped_points > 0 {
        warn!(dropped_points, "dropped out-of-range decoded points");
    }

    AssembledPath {
        path: Polyline::new(points),
        skipped_segments,
        dropped_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::encode;

    fn segment(points: &[(f64, f64)]) -> String {
        let points: Vec<Coordinate> = points.iter().copied().map(Coordinate::from).collect();
        encode(&points, 5).unwrap()
    }

    #[test]
    fn test_concatenates_in_order() {
        let first = segment(&[(12.97, 77.59), (12.96, 77.60)]);
        let second = segment(&[(12.96, 77.60), (12.95, 77.62)]);

        let assembled = assemble(&[first, second]);
        let lats: Vec<f64> = assembled.path.points().iter().map(|p| p.lat).collect();
        assert_eq!(lats, vec![12.97, 12.96, 12.96, 12.95]);
        assert_eq!(assembled.skipped_segments, 0);
    }

    #[test]
    fn test_skips_failed_segments() {
        let first = segment(&[(1.0, 1.0)]);
        let third = segment(&[(3.0, 3.0), (3.5, 3.5)]);
        let segments = vec![first, "BF!!".to_string(), third, "BFoz5xJ67i1B1B7".to_string()];

        let assembled = assemble(&segments);
        let points: Vec<(f64, f64)> = assembled.path.points().iter().map(Coordinate::as_tuple).collect();
        assert_eq!(points, vec![(1.0, 1.0), (3.0, 3.0), (3.5, 3.5)]);
        assert_eq!(assembled.skipped_segments, 2);
    }

    #[test]
    fn test_all_failed_is_empty() {
        let assembled = assemble(&["???", "BFoz5xJ"]);
        assert!(assembled.is_empty());
        assert_eq!(assembled.skipped_segments, 2);
    }

    #[test]
    fn test_empty_input() {
        let segments: Vec<String> = Vec::new();
        let assembled = assemble(&segments);
        assert!(assembled.is_empty());
        assert_eq!(assembled.skipped_segments, 0);
    }

    #[test]
    fn test_drops_out_of_range_points() {
        // Rewriting the header to precision 4 scales every value by ten,
        // pushing the second point to latitude 95.
        let encoded = segment(&[(1.0, 1.0), (9.5, 10.0)]).replacen("BF", "BE", 1);

        let assembled = assemble(&[encoded]);
        let points: Vec<(f64, f64)> = assembled.path.points().iter().map(Coordinate::as_tuple).collect();
        assert_eq!(points, vec![(10.0, 10.0)]);
        assert_eq!(assembled.dropped_points, 1);
        assert_eq!(assembled.skipped_segments, 0);
    }
}
