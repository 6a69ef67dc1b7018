//! Named polygon regions and the per-level boundary set.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use geo::{Closest, ClosestPoint, Contains, MultiPolygon, Point};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::distance::haversine_km;
use super::source;
use crate::error::{GeoError, Result};

/// A single boundary polygon with its label and metadata
#[derive(Debug, Clone)]
pub struct Region {
    name: String,
    properties: Map<String, Value>,
    geometry: MultiPolygon<f64>,
}

impl Region {
    /// Display label (`properties.shapeName`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full feature properties as loaded
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Boundary-exclusive point-in-polygon test; holes are excluded.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.geometry.contains(point)
    }

    /// Closest point on the region's rings to `point`, projected in
    /// degree space. `None` if the geometry has no usable edges.
    pub fn nearest_edge_point(&self, point: &Point<f64>) -> Option<Point<f64>> {
        match self.geometry.closest_point(point) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => Some(p),
            Closest::Indeterminate => None,
        }
    }

    /// Haversine distance in km from `point` to the nearest edge point
    pub fn edge_distance_km(&self, point: &Point<f64>) -> Option<f64> {
        self.nearest_edge_point(point)
            .map(|edge| haversine_km(edge, *point))
    }
}

/// Ordered collection of regions for one administrative level.
///
/// Order is the input feature order and is the tie-break for both
/// containment (first match) and nearest lookup (first minimum).
#[derive(Debug, Clone)]
pub struct BoundarySet {
    regions: Vec<Region>,
    source: Value,
}

impl BoundarySet {
    /// Build from a parsed boundary source (GeoJSON FeatureCollection)
    pub fn load(source: Value) -> Result<Self> {
        let regions = source::features(&source)?
            .iter()
            .enumerate()
            .map(|(idx, feature)| {
                source::parse_feature(idx, feature).map(|f| Region {
                    name: f.name,
                    properties: f.properties,
                    geometry: f.geometry,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} regions", regions.len());

        Ok(Self { regions, source })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let source: Value = serde_json::from_reader(reader)?;
        Self::load(source)
    }

    /// Load a boundary file; `.gz` files are decompressed on the fly
    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Loading boundaries from {}", path.display());

        let file = File::open(path)?;
        let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let set = Self::from_reader(BufReader::new(reader))?;
        info!("Loaded {} regions from {}", set.len(), path.display());
        Ok(set)
    }

    /// All regions containing the point, in original order
    pub fn contains(&self, point: &Point<f64>) -> Vec<&Region> {
        self.regions.iter().filter(|r| r.contains(point)).collect()
    }

    /// Region whose boundary is nearest by haversine edge distance.
    ///
    /// Ties keep the earliest region.
    pub fn nearest(&self, point: &Point<f64>) -> Result<&Region> {
        let mut best: Option<(&Region, f64)> = None;

        for region in &self.regions {
            let distance = region.edge_distance_km(point).unwrap_or(f64::INFINITY);
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((region, distance)),
            }
        }

        best.map(|(r, _)| r).ok_or(GeoError::EmptyBoundarySet)
    }

    /// First containing region, falling back to the nearest boundary
    pub fn resolve(&self, point: &Point<f64>) -> Result<&Region> {
        if let Some(region) = self.regions.iter().find(|r| r.contains(point)) {
            return Ok(region);
        }

        let region = self.nearest(point)?;
        debug!(
            "No region contains ({}, {}), using nearest boundary '{}'",
            point.x(),
            point.y(),
            region.name()
        );
        Ok(region)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Re-serialize the boundary source as it was loaded
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.source)?)
    }
}
