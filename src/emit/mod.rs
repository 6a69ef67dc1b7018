//! Marker emission.

pub mod marker;

pub use marker::{emit_collection, emit_markers};
