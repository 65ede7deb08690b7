//! Test fixtures for route-geometry.
//!
//! Provides realistic test data including:
//! - Bengaluru depot and delivery locations
//! - Route builders and encoded road geometry helpers

pub mod bengaluru_locations;

pub use bengaluru_locations::*;
