//! Coordinate extraction shared by the joiner and the marker emitter.

use geo::Point;

use crate::error::{GeoError, Result};
use crate::models::Record;

/// Parse the longitude/latitude columns of a record into a point.
///
/// `row` is only used for error reporting.
pub fn extract_point(
    record: &Record,
    row: usize,
    long_col: &str,
    lat_col: &str,
) -> Result<Point<f64>> {
    let lon = parse_column(record, row, long_col)?;
    let lat = parse_column(record, row, lat_col)?;
    Ok(Point::new(lon, lat))
}

fn parse_column(record: &Record, row: usize, column: &str) -> Result<f64> {
    let raw = record.get(column).ok_or_else(|| GeoError::InvalidCoordinate {
        row,
        column: column.to_string(),
        value: None,
    })?;

    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(GeoError::InvalidCoordinate {
            row,
            column: column.to_string(),
            value: Some(raw.to_string()),
        }),
    }
}
