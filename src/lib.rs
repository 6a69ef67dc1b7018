//! Geomarker - administrative region tagging for point records
//!
//! Assigns each longitude/latitude record to a region per administrative
//! level (point-in-polygon with a nearest-boundary fallback) and emits the
//! records as GeoJSON point markers.

pub mod config;
pub mod emit;
pub mod error;
pub mod join;
pub mod models;
pub mod pip;
pub mod table;

pub use error::{GeoError, Result};
pub use models::{Marker, MarkerCollection, Record};
pub use pip::{BoundarySet, Region};
