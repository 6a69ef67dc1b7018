//! CSV-backed record table.
//!
//! Keeps the header and the rows as ordered [`Record`]s so the augmented
//! table can be written back with the extra columns appended.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::info;

use crate::error::{GeoError, Result};
use crate::models::Record;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Build from a header and rows; every row must have the header's fields
    pub fn new(header: Vec<String>, rows: Vec<Record>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != header.len() || !header.iter().all(|h| row.contains_key(h)) {
                return Err(GeoError::RowShape {
                    row: idx,
                    expected: header.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { header, rows })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        for (idx, name) in header.iter().enumerate() {
            if header[..idx].contains(name) {
                return Err(GeoError::DuplicateColumn(name.clone()));
            }
        }

        let mut rows = Vec::new();
        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            if record.len() != header.len() {
                return Err(GeoError::RowShape {
                    row: idx,
                    expected: header.len(),
                    found: record.len(),
                });
            }
            rows.push(header.iter().map(String::as_str).zip(record.iter()).collect());
        }

        Ok(Self { header, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let table = Self::from_reader(File::open(path)?)?;
        info!(
            "Loaded {} rows with {} columns from {}",
            table.rows.len(),
            table.header.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_records(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append an empty column to the header and every row
    pub fn add_column(&mut self, name: &str) -> Result<()> {
        if self.header.iter().any(|h| h == name) {
            return Err(GeoError::DuplicateColumn(name.to_string()));
        }
        self.header.push(name.to_string());
        for row in &mut self.rows {
            row.set(name, "");
        }
        Ok(())
    }

    /// Rows whose `column` equals `value`
    pub fn rows_by_column(&self, column: &str, value: &str) -> Vec<&Record> {
        self.rows
            .iter()
            .filter(|r| r.get(column) == Some(value))
            .collect()
    }

    pub fn row(&self, idx: usize) -> Result<&Record> {
        self.rows.get(idx).ok_or(GeoError::RowOutOfRange {
            row: idx,
            len: self.rows.len(),
        })
    }

    /// Replace the row at `idx`; the new row must match the header
    pub fn set_row(&mut self, idx: usize, row: Record) -> Result<()> {
        let len = self.rows.len();
        if idx >= len {
            return Err(GeoError::RowOutOfRange { row: idx, len });
        }
        if row.len() != self.header.len() || !self.header.iter().all(|h| row.contains_key(h)) {
            return Err(GeoError::RowShape {
                row: idx,
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows[idx] = row;
        Ok(())
    }

    /// Write header then rows, `\n` terminated
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(&self.header)?;
        for row in &self.rows {
            csv_writer.write_record(self.header.iter().map(|h| row.get(h).unwrap_or("")))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_path(&self, path: &Path) -> Result<()> {
        self.write_to(File::create(path)?)?;
        info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "name,longitude,latitude\nA,1.0,2.0\nB,3.5,-4\nC,1.0,0\n";

    #[test]
    fn test_read_preserves_header_and_order() {
        let table = Table::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.header(), ["name", "longitude", "latitude"]);
        let names: Vec<_> = table.records().iter().map(|r| r.get("name").unwrap()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(table.row(1).unwrap().get("latitude"), Some("-4"));
    }

    #[test]
    fn test_round_trip_with_added_column() {
        let mut table = Table::from_reader(CSV.as_bytes()).unwrap();
        table.add_column("_geo_admin0").unwrap();
        let mut row = table.row(0).unwrap().clone();
        row.set("_geo_admin0", "Region, One");
        table.set_row(0, row).unwrap();

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,longitude,latitude,_geo_admin0\n\
             A,1.0,2.0,\"Region, One\"\n\
             B,3.5,-4,\n\
             C,1.0,0,\n"
        );
    }

    #[test]
    fn test_add_duplicate_column() {
        let mut table = Table::from_reader(CSV.as_bytes()).unwrap();
        assert!(matches!(
            table.add_column("name"),
            Err(GeoError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_rows_by_column() {
        let table = Table::from_reader(CSV.as_bytes()).unwrap();
        let rows = table.rows_by_column("longitude", "1.0");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some("C"));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let result = Table::from_reader("a,b\n1,2\n3\n".as_bytes());
        assert!(matches!(
            result,
            Err(GeoError::RowShape { row: 1, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let result = Table::from_reader("a,a,longitude,latitude\n1,2,0,0\n".as_bytes());
        match result {
            Err(GeoError::DuplicateColumn(name)) => assert_eq!(name, "a"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_row_out_of_range() {
        let mut table = Table::from_reader(CSV.as_bytes()).unwrap();
        assert!(table.row(3).is_err());
        assert!(matches!(
            table.set_row(9, Record::new()),
            Err(GeoError::RowOutOfRange { row: 9, len: 3 })
        ));
    }

    #[test]
    fn test_new_rejects_mismatched_rows() {
        let header = vec!["a".to_string(), "b".to_string()];
        let rows = vec![Record::new().with("a", "1").with("c", "2")];
        assert!(Table::new(header, rows).is_err());
    }
}
