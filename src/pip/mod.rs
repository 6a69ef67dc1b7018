//! Point-in-Polygon (PIP) region assignment.
//!
//! Loads named boundary polygons and resolves a point to the containing
//! region, falling back to the region with the nearest boundary edge.

pub mod boundary;
pub mod distance;
pub mod source;

pub use boundary::{BoundarySet, Region};
pub use distance::{haversine_km, EARTH_RADIUS_KM};
