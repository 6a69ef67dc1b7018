//! Boundary source parsing.
//!
//! A boundary source is a GeoJSON FeatureCollection where every feature has
//! a Polygon or MultiPolygon geometry and a `properties.shapeName` label
//! (the geoBoundaries ADM layout).

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};

use crate::error::{GeoError, Result};

/// Property holding the display label of a region
pub const NAME_PROPERTY: &str = "shapeName";

/// Pull the feature array out of a FeatureCollection
pub fn features(source: &Value) -> Result<&[Value]> {
    let obj = source
        .as_object()
        .ok_or_else(|| GeoError::malformed("boundary source is not a JSON object"))?;

    if let Some(t) = obj.get("type") {
        if t.as_str() != Some("FeatureCollection") {
            return Err(GeoError::malformed(format!(
                "expected a FeatureCollection, found type {}",
                t
            )));
        }
    }

    obj.get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| GeoError::malformed("boundary source has no 'features' array"))
}

/// Parsed pieces of one boundary feature
pub struct ParsedFeature {
    pub name: String,
    pub properties: Map<String, Value>,
    pub geometry: MultiPolygon<f64>,
}

/// Validate and convert a single feature
pub fn parse_feature(index: usize, feature: &Value) -> Result<ParsedFeature> {
    let properties = feature
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| GeoError::malformed(format!("feature {} has no properties", index)))?;

    let name = properties
        .get(NAME_PROPERTY)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GeoError::malformed(format!(
                "feature {} is missing string property '{}'",
                index, NAME_PROPERTY
            ))
        })?
        .to_string();

    let geometry = match feature.get("geometry") {
        Some(g) if !g.is_null() => parse_geometry(g)
            .map_err(|e| GeoError::malformed(format!("feature {} ('{}'): {}", index, name, e)))?,
        _ => {
            return Err(GeoError::malformed(format!(
                "feature {} ('{}') has no geometry",
                index, name
            )))
        }
    };

    Ok(ParsedFeature {
        name,
        properties: properties.clone(),
        geometry,
    })
}

/// Convert a GeoJSON Polygon/MultiPolygon geometry object.
///
/// Errors are plain messages; the caller attaches feature context.
fn parse_geometry(geometry: &Value) -> std::result::Result<MultiPolygon<f64>, String> {
    let geo_type = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry has no type")?;
    let coordinates = geometry
        .get("coordinates")
        .ok_or("geometry has no coordinates")?;

    match geo_type {
        "Polygon" => {
            let rings: Vec<Vec<Vec<f64>>> =
                serde_json::from_value(coordinates.clone()).map_err(|e| e.to_string())?;
            Ok(MultiPolygon::new(vec![to_polygon(rings)?]))
        }
        "MultiPolygon" => {
            let polygons: Vec<Vec<Vec<Vec<f64>>>> =
                serde_json::from_value(coordinates.clone()).map_err(|e| e.to_string())?;
            if polygons.is_empty() {
                return Err("MultiPolygon has no polygons".to_string());
            }
            let polygons = polygons
                .into_iter()
                .map(to_polygon)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(MultiPolygon::new(polygons))
        }
        other => Err(format!(
            "unsupported geometry type '{}' (expected Polygon or MultiPolygon)",
            other
        )),
    }
}

/// First ring is the exterior, the rest are holes
fn to_polygon(rings: Vec<Vec<Vec<f64>>>) -> std::result::Result<Polygon<f64>, String> {
    let mut rings = rings.into_iter().map(to_ring);
    let exterior = rings.next().ok_or("polygon has no rings")??;
    let interiors = rings.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn to_ring(positions: Vec<Vec<f64>>) -> std::result::Result<LineString<f64>, String> {
    if positions.len() < 3 {
        return Err(format!(
            "ring has {} positions, need at least 3",
            positions.len()
        ));
    }

    // Extra ordinates (altitude) are ignored
    let coords = positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(format!("position {:?} has fewer than 2 ordinates", p)),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(LineString::new(coords))
}
