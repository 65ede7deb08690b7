//! route-geometry
//!
//! Render-ready route geometry from optimizer routes: flexible polyline
//! decoding, road-snapped path assembly with straight-line fallback, and
//! a live device position stream.

pub mod coordinate;
pub mod distance;
pub mod navigation;
pub mod polyline;
pub mod resolver;
pub mod routing;
pub mod segments;
pub mod stops;
pub mod tracker;
pub mod traits;
