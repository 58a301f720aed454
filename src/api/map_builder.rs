use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::boundary_adapter::{BoundaryAnnotation, LocationMarker, location_markers};
use crate::api::context::PlotContext;
use crate::core::geometry::{Extent, MapCell, MapGrid};
use crate::core::palette::{PaletteRequest, PaletteSpec, select_palette};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatMap {
    pub grid: MapGrid,
    pub palette: PaletteSpec,
    pub extent: Extent,
    pub boundary: Option<BoundaryAnnotation>,
    pub locations: Vec<LocationMarker>,
}

/// Assembles a heat map.
///
/// `value_range` fixes the color bar (e.g. shared across scenarios); the
/// grid's own range is used when it is `None`.
pub fn heat_map(
    cells: &[MapCell],
    value_range: Option<(f64, f64)>,
    boundary: Option<BoundaryAnnotation>,
    context: &PlotContext,
) -> ChartResult<HeatMap> {
    let grid = MapGrid::from_cells(cells)?;
    let (min, max) = match value_range {
        Some(range) => range,
        None => grid.value_range().ok_or_else(|| {
            ChartError::InvalidData("heat map has no finite values".to_owned())
        })?,
    };

    let request = PaletteRequest::new(context.variable.code.clone(), min, max)
        .with_delta(context.delta)
        .with_discrete(context.discrete_map);
    let palette = select_palette(&request, &context.palette_tables)?;

    let extent = boundary
        .as_ref()
        .map_or_else(|| grid.extent(), |annotation| annotation.extent);

    trace!(
        rows = grid.latitudes.len(),
        columns = grid.longitudes.len(),
        palette = %palette.name,
        has_boundary = boundary.is_some(),
        "heat map assembled"
    );

    Ok(HeatMap {
        grid,
        palette,
        extent,
        boundary,
        locations: location_markers(&context.locations),
    })
}
