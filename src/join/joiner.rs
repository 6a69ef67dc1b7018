//! Attaches administrative region names to records.

use rayon::prelude::*;
use tracing::info;

use super::coordinate::extract_point;
use crate::error::Result;
use crate::models::Record;
use crate::pip::BoundarySet;

/// Prefix of the per-level output field: `_geo_admin{level}`
pub const LEVEL_FIELD_PREFIX: &str = "_geo_admin";

/// Field name written for administrative level `level`
pub fn level_field(level: usize) -> String {
    format!("{}{}", LEVEL_FIELD_PREFIX, level)
}

/// Resolves each record against one boundary set per administrative level.
///
/// Level `i` writes the resolved region name into `_geo_admin{i}`.
pub struct RecordJoiner<'a> {
    levels: &'a [BoundarySet],
    long_col: String,
    lat_col: String,
}

impl<'a> RecordJoiner<'a> {
    pub fn new(levels: &'a [BoundarySet], long_col: &str, lat_col: &str) -> Self {
        Self {
            levels,
            long_col: long_col.to_string(),
            lat_col: lat_col.to_string(),
        }
    }

    /// Names of the fields this joiner appends, in level order
    pub fn level_fields(&self) -> Vec<String> {
        (0..self.levels.len()).map(level_field).collect()
    }

    /// Produce the augmented record sequence.
    ///
    /// Any invalid coordinate aborts the whole join.
    pub fn join(&self, records: &[Record]) -> Result<Vec<Record>> {
        if self.levels.is_empty() {
            return Ok(records.to_vec());
        }

        let fields = self.level_fields();
        let joined = records
            .iter()
            .enumerate()
            .map(|(row, record)| self.join_record(&fields, row, record))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Joined {} records against {} administrative levels",
            joined.len(),
            self.levels.len()
        );
        Ok(joined)
    }

    /// Same result as [`RecordJoiner::join`], with records sharded across
    /// the rayon pool. On failure the error of the earliest bad row is
    /// returned.
    pub fn join_parallel(&self, records: &[Record]) -> Result<Vec<Record>> {
        if self.levels.is_empty() {
            return Ok(records.to_vec());
        }

        let fields = self.level_fields();
        let results: Vec<Result<Record>> = records
            .par_iter()
            .enumerate()
            .map(|(row, record)| self.join_record(&fields, row, record))
            .collect();

        let joined = results.into_iter().collect::<Result<Vec<_>>>()?;

        info!(
            "Joined {} records against {} administrative levels (parallel)",
            joined.len(),
            self.levels.len()
        );
        Ok(joined)
    }

    fn join_record(&self, fields: &[String], row: usize, record: &Record) -> Result<Record> {
        let point = extract_point(record, row, &self.long_col, &self.lat_col)?;

        let mut augmented = record.clone();
        for (field, boundary) in fields.iter().zip(self.levels) {
            let region = boundary.resolve(&point)?;
            augmented.set(field, region.name());
        }
        Ok(augmented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;
    use serde_json::json;

    fn level(names_and_squares: &[(&str, f64, f64, f64)]) -> BoundarySet {
        let features: Vec<_> = names_and_squares
            .iter()
            .map(|&(name, x, y, s)| {
                json!({
                    "type": "Feature",
                    "properties": { "shapeName": name },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[x, y], [x, y + s], [x + s, y + s], [x + s, y], [x, y]]]
                    }
                })
            })
            .collect();
        BoundarySet::load(json!({ "type": "FeatureCollection", "features": features })).unwrap()
    }

    fn record(id: &str, lon: &str, lat: &str) -> Record {
        Record::new()
            .with("id", id)
            .with("longitude", lon)
            .with("latitude", lat)
    }

    #[test]
    fn test_no_levels_is_passthrough() {
        let records = vec![record("1", "x", "y"), record("2", "1", "1")];
        let joined = RecordJoiner::new(&[], "longitude", "latitude")
            .join(&records)
            .unwrap();
        assert_eq!(joined, records);
    }

    #[test]
    fn test_join_two_levels() {
        let levels = vec![
            level(&[("Country", 0.0, 0.0, 10.0)]),
            level(&[("West", 0.0, 0.0, 5.0), ("East", 5.0, 0.0, 5.0)]),
        ];
        let records = vec![
            record("1", "2", "2"),
            record("2", "7", "2"),
            record("3", "20", "2"),
        ];

        let joined = RecordJoiner::new(&levels, "longitude", "latitude")
            .join(&records)
            .unwrap();

        assert_eq!(joined.len(), 3);
        let ids: Vec<_> = joined.iter().map(|r| r.get("id").unwrap()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        for r in &joined {
            assert_eq!(r.len(), 5);
            assert_eq!(r.get("_geo_admin0"), Some("Country"));
        }
        assert_eq!(joined[0].get("_geo_admin1"), Some("West"));
        assert_eq!(joined[1].get("_geo_admin1"), Some("East"));
        // Outside everything: nearest edge is East's
        assert_eq!(joined[2].get("_geo_admin1"), Some("East"));
        // Input untouched
        assert_eq!(records[0].len(), 3);
    }

    #[test]
    fn test_invalid_coordinate_aborts() {
        let levels = vec![level(&[("A", 0.0, 0.0, 2.0)])];
        let records = vec![
            record("1", "1", "1"),
            Record::new().with("id", "2").with("longitude", "1"),
        ];
        let err = RecordJoiner::new(&levels, "longitude", "latitude")
            .join(&records)
            .unwrap_err();
        assert!(matches!(err, GeoError::InvalidCoordinate { row: 1, .. }));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let levels = vec![level(&[("West", 0.0, 0.0, 5.0), ("East", 5.0, 0.0, 5.0)])];
        let records: Vec<Record> = (0..200)
            .map(|i| record(&i.to_string(), &format!("{}", (i % 12) as f64 - 1.0), "2.5"))
            .collect();

        let joiner = RecordJoiner::new(&levels, "longitude", "latitude");
        assert_eq!(
            joiner.join(&records).unwrap(),
            joiner.join_parallel(&records).unwrap()
        );
    }

    #[test]
    fn test_parallel_reports_first_bad_row() {
        let levels = vec![level(&[("A", 0.0, 0.0, 2.0)])];
        let mut records: Vec<Record> = (0..100).map(|i| record(&i.to_string(), "1", "1")).collect();
        records[40] = record("40", "bad", "1");
        records[90] = record("90", "1", "bad");

        let err = RecordJoiner::new(&levels, "longitude", "latitude")
            .join_parallel(&records)
            .unwrap_err();
        assert!(matches!(err, GeoError::InvalidCoordinate { row: 40, .. }));
    }
}
