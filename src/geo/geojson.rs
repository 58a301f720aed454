use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::geometry::LonLat;
use crate::error::{ChartError, ChartResult};

/// Where a boundary payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundarySource {
    Path(PathBuf),
    /// Payload already fetched by the host (e.g. the body of an HTTP response).
    Text(String),
}

impl BoundarySource {
    #[must_use]
    pub fn path(path: impl AsRef<Path>) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Outer ring of a polygon plus all of its rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    pub vertices: Vec<LonLat>,
    pub coordinates: Vec<Vec<LonLat>>,
}

impl BoundaryFeature {
    #[must_use]
    pub fn lon_lat_table(&self) -> LonLatTable {
        LonLatTable {
            longitude: self.vertices.iter().map(|v| v.longitude).collect(),
            latitude: self.vertices.iter().map(|v| v.latitude).collect(),
        }
    }
}

/// Vertex list split into longitude and latitude columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LonLatTable {
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryFormat {
    Vertices,
    LonLatTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum BoundaryOutput {
    Vertices(BoundaryFeature),
    LonLatTable(LonLatTable),
}

/// Contract implemented by any source of region boundaries.
pub trait BoundaryLoader {
    fn load(&self, source: &BoundarySource) -> ChartResult<Vec<BoundaryFeature>>;
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl Geometry {
    /// Rings of the polygon (the first polygon of a multi-polygon).
    fn into_rings(self) -> Vec<Vec<Position>> {
        match self {
            Self::Polygon { coordinates } => coordinates,
            Self::MultiPolygon { coordinates } => {
                coordinates.into_iter().next().unwrap_or_default()
            }
        }
    }
}

fn to_lon_lat(position: &[f64]) -> ChartResult<LonLat> {
    match position {
        [longitude, latitude, ..] => Ok(LonLat::new(*longitude, *latitude)),
        _ => Err(ChartError::InvalidData(format!(
            "GeoJSON position needs at least 2 values, got {}",
            position.len()
        ))),
    }
}

/// GeoJSON feature-collection reader for polygon boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoJsonLoader {
    first_only: bool,
}

impl Default for GeoJsonLoader {
    fn default() -> Self {
        Self { first_only: true }
    }
}

impl GeoJsonLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every feature instead of the first one.
    #[must_use]
    pub fn with_all_features(mut self) -> Self {
        self.first_only = false;
        self
    }

    /// Parses a GeoJSON payload.
    pub fn parse_str(&self, input: &str) -> ChartResult<Vec<BoundaryFeature>> {
        let collection: FeatureCollection = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse GeoJSON: {e}")))?;

        let take = if self.first_only { 1 } else { usize::MAX };
        let features = collection
            .features
            .into_iter()
            .take(take)
            .map(|feature| {
                let coordinates = feature
                    .geometry
                    .into_rings()
                    .iter()
                    .map(|ring| ring.iter().map(|p| to_lon_lat(p)).collect())
                    .collect::<ChartResult<Vec<Vec<LonLat>>>>()?;
                let vertices = coordinates.first().cloned().ok_or_else(|| {
                    ChartError::InvalidData("GeoJSON polygon has no rings".to_owned())
                })?;
                Ok(BoundaryFeature {
                    vertices,
                    coordinates,
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;

        if features.is_empty() {
            debug!("GeoJSON payload has no features");
        }
        trace!(features = features.len(), "GeoJSON parsed");
        Ok(features)
    }

    /// Loads features in the requested output format.
    pub fn load_as(
        &self,
        source: &BoundarySource,
        format: BoundaryFormat,
    ) -> ChartResult<Vec<BoundaryOutput>> {
        Ok(self
            .load(source)?
            .into_iter()
            .map(|feature| match format {
                BoundaryFormat::Vertices => BoundaryOutput::Vertices(feature),
                BoundaryFormat::LonLatTable => BoundaryOutput::LonLatTable(feature.lon_lat_table()),
            })
            .collect())
    }
}

impl BoundaryLoader for GeoJsonLoader {
    fn load(&self, source: &BoundarySource) -> ChartResult<Vec<BoundaryFeature>> {
        match source {
            BoundarySource::Path(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ChartError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                self.parse_str(&raw)
            }
            BoundarySource::Text(text) => self.parse_str(text),
        }
    }
}
