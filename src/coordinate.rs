//! Geographic coordinates and bounding regions.

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in degrees.
///
/// Construction is unchecked; call [`Coordinate::is_valid`] before
/// trusting a value that came from outside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate without checking its range.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite, latitude in [-90, 90], longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Returns `(lat, lng)`.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Minimal axis-aligned box enclosing a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl BoundingRegion {
    /// Midpoint of the two corners.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Whether the point lies inside the region, edges included.
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }
}

/// Computes the bounding region of `points`, or `None` when empty.
///
/// Longitudes are compared numerically, so a path crossing the
/// antimeridian yields a box spanning most of the globe.
pub fn bounds(points: &[Coordinate]) -> Option<BoundingRegion> {
    let (first, rest) = points.split_first()?;

    let mut south_west = *first;
    let mut north_east = *first;
    for point in rest {
        south_west.lat = south_west.lat.min(point.lat);
        south_west.lng = south_west.lng.min(point.lng);
        north_east.lat = north_east.lat.max(point.lat);
        north_east.lng = north_east.lng.max(point.lng);
    }

    Some(BoundingRegion {
        south_west,
        north_east,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        assert!(Coordinate::new(12.9716, 77.5946).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(Coordinate::new(90.0, -180.0).is_valid());
    }

    #[test]
    fn test_invalid_coordinates_are_rejected() {
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
        assert!(!Coordinate::new(90.0001, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn test_from_tuple() {
        let coordinate = Coordinate::from((1.5, 2.5));
        assert_eq!(coordinate.as_tuple(), (1.5, 2.5));
    }

    #[test]
    fn test_bounds_empty() {
        assert_eq!(bounds(&[]), None);
    }

    #[test]
    fn test_bounds_single_point() {
        let point = Coordinate::new(12.97, 77.59);
        let region = bounds(&[point]).unwrap();
        assert_eq!(region.south_west, point);
        assert_eq!(region.north_east, point);
    }

    #[test]
    fn test_bounds_mixed_corners() {
        // Extremes come from different points.
        let points = vec![
            Coordinate::new(12.90, 77.70),
            Coordinate::new(13.05, 77.55),
            Coordinate::new(12.95, 77.60),
        ];
        let region = bounds(&points).unwrap();
        assert_eq!(region.south_west, Coordinate::new(12.90, 77.55));
        assert_eq!(region.north_east, Coordinate::new(13.05, 77.70));
        assert!(points.iter().all(|p| region.contains(p)));
    }

    #[test]
    fn test_bounds_across_antimeridian_is_not_wrapped() {
        let points = vec![Coordinate::new(-17.0, 179.5), Coordinate::new(-17.1, -179.5)];
        let region = bounds(&points).unwrap();
        assert_eq!(region.south_west.lng, -179.5);
        assert_eq!(region.north_east.lng, 179.5);
    }

    #[test]
    fn test_center() {
        let region = bounds(&[Coordinate::new(10.0, 20.0), Coordinate::new(12.0, 24.0)]).unwrap();
        assert_eq!(region.center(), Coordinate::new(11.0, 22.0));
    }
}
