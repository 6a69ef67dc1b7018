//! GeoJSON point features produced from records.

use serde::Serialize;

use super::Record;

/// GeoJSON Point geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGeometry {
    pub coordinates: [f64; 2], // [lon, lat]
    #[serde(rename = "type")]
    pub geo_type: String,
}

impl PointGeometry {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            coordinates: [lon, lat],
            geo_type: "Point".to_string(),
        }
    }
}

/// One point feature built from a record.
///
/// `properties` is the full record, including any `_geo_admin*` fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub properties: Record,
    pub geometry: PointGeometry,
}

impl Marker {
    pub fn new(properties: Record, lon: f64, lat: f64) -> Self {
        Self {
            feature_type: "Feature".to_string(),
            properties,
            geometry: PointGeometry::new(lon, lat),
        }
    }

    pub fn lon(&self) -> f64 {
        self.geometry.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.geometry.coordinates[1]
    }
}

/// GeoJSON FeatureCollection of markers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Marker>,
}

impl MarkerCollection {
    pub fn new(features: Vec<Marker>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn write_to<W: std::io::Write>(&self, writer: W) -> Result<(), serde_json::Error> {
        serde_json::to_writer(writer, self)
    }
}
