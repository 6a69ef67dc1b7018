//! Converts records into GeoJSON point markers.

use tracing::debug;

use crate::error::Result;
use crate::join::extract_point;
use crate::models::{Marker, MarkerCollection, Record};

/// One marker per record, in input order.
///
/// Properties are the full record, unmodified. Fails on the first record
/// with a missing or non-numeric coordinate; no partial output.
pub fn emit_markers(records: &[Record], long_col: &str, lat_col: &str) -> Result<Vec<Marker>> {
    let markers = records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let point = extract_point(record, row, long_col, lat_col)?;
            Ok(Marker::new(record.clone(), point.x(), point.y()))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Emitted {} markers", markers.len());
    Ok(markers)
}

/// [`emit_markers`] wrapped in a FeatureCollection
pub fn emit_collection(
    records: &[Record],
    long_col: &str,
    lat_col: &str,
) -> Result<MarkerCollection> {
    emit_markers(records, long_col, lat_col).map(MarkerCollection::new)
}
