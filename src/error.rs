//! Error type shared by the boundary, join and emit layers.

/// Errors raised while loading boundaries or enriching records.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// Boundary source failed structural validation.
    #[error("Malformed boundary data: {message}")]
    MalformedBoundaryData {
        /// Description of what went wrong.
        message: String,
    },

    /// A record's longitude/latitude value is missing or not a number.
    #[error("{}", invalid_coordinate_message(*.row, .column, .value))]
    InvalidCoordinate {
        /// Zero-based record index.
        row: usize,
        /// Coordinate column name.
        column: String,
        /// Raw cell value, `None` if the column is absent.
        value: Option<String>,
    },

    /// Nearest-boundary lookup against a set with no regions.
    #[error("Boundary set contains no regions")]
    EmptyBoundarySet,

    /// Column already present in the table header.
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    /// Row index past the end of the table.
    #[error("Row {row} out of range (table has {len} rows)")]
    RowOutOfRange {
        /// Requested zero-based row index.
        row: usize,
        /// Number of rows in the table.
        len: usize,
    },

    /// CSV row width differs from the header.
    #[error("Row {row} has {found} fields, header has {expected}")]
    RowShape {
        /// Zero-based data row index.
        row: usize,
        /// Header width.
        expected: usize,
        /// Fields in the offending row.
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn invalid_coordinate_message(row: usize, column: &str, value: &Option<String>) -> String {
    match value {
        Some(v) => format!("Invalid coordinate in row {row}: column '{column}' has value '{v}'"),
        None => format!("Invalid coordinate in row {row}: column '{column}' is missing"),
    }
}

impl GeoError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        GeoError::MalformedBoundaryData {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_coordinate_message() {
        let missing = GeoError::InvalidCoordinate {
            row: 4,
            column: "latitude".to_string(),
            value: None,
        };
        assert_eq!(
            missing.to_string(),
            "Invalid coordinate in row 4: column 'latitude' is missing"
        );

        let bad = GeoError::InvalidCoordinate {
            row: 0,
            column: "longitude".to_string(),
            value: Some("abc".to_string()),
        };
        assert_eq!(
            bad.to_string(),
            "Invalid coordinate in row 0: column 'longitude' has value 'abc'"
        );
    }
}
