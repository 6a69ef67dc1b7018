//! Core data models for the record and marker layers.

pub mod marker;
pub mod record;

pub use marker::{Marker, MarkerCollection, PointGeometry};
pub use record::Record;
