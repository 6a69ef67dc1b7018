//! Record enrichment with administrative region labels.

pub mod coordinate;
pub mod joiner;

pub use coordinate::extract_point;
pub use joiner::{level_field, RecordJoiner, LEVEL_FIELD_PREFIX};
