use serde::{Deserialize, Serialize};

use crate::api::context::MapLocation;
use crate::core::color::Color;
use crate::core::geometry::{Extent, LonLat};
use crate::error::{ChartError, ChartResult};

pub const BOUNDARY_ALPHA: f64 = 0.75;
/// Offset (degrees, both axes) between a location marker and its label.
pub const LOCATION_LABEL_OFFSET: f64 = 0.05;

/// Region outline drawn over a heat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryAnnotation {
    /// Plot extent: bounding box of the outer ring.
    pub extent: Extent,
    pub rings: Vec<Vec<LonLat>>,
    pub edge_color: Color,
    pub filled: bool,
}

/// Bounding box of `vertices` plus the polygon as a hollow outline.
pub fn boundary(vertices: &[LonLat], coordinates: &[Vec<LonLat>]) -> ChartResult<BoundaryAnnotation> {
    if vertices.is_empty() {
        return Err(ChartError::InvalidData(
            "boundary needs at least one vertex".to_owned(),
        ));
    }
    Ok(BoundaryAnnotation {
        extent: Extent::of_vertices(vertices)?,
        rings: coordinates.to_vec(),
        edge_color: Color::BLACK.with_alpha(BOUNDARY_ALPHA),
        filled: false,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMarker {
    pub name: String,
    pub position: LonLat,
    pub label_position: LonLat,
    pub hollow: bool,
    pub italic_label: bool,
}

#[must_use]
pub fn location_markers(locations: &[MapLocation]) -> Vec<LocationMarker> {
    locations
        .iter()
        .map(|location| LocationMarker {
            name: location.name.clone(),
            position: LonLat::new(location.longitude, location.latitude),
            label_position: LonLat::new(
                location.longitude + LOCATION_LABEL_OFFSET,
                location.latitude + LOCATION_LABEL_OFFSET,
            ),
            hollow: true,
            italic_label: true,
        })
        .collect()
}
