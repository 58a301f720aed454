use std::collections::{BTreeMap, BTreeSet};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Offset (degrees) used to widen a single-cell grid into a 3x3 grid.
pub const SINGLE_CELL_SPREAD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Axis-aligned extent in longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    /// Bounding box of a vertex list.
    pub fn of_vertices(vertices: &[LonLat]) -> ChartResult<Self> {
        let mut iter = vertices.iter();
        let Some(first) = iter.next() else {
            return Err(ChartError::InvalidData(
                "extent needs at least one vertex".to_owned(),
            ));
        };
        let seed = Self {
            x_min: first.longitude,
            x_max: first.longitude,
            y_min: first.latitude,
            y_max: first.latitude,
        };
        Ok(iter.fold(seed, |extent, vertex| Self {
            x_min: extent.x_min.min(vertex.longitude),
            x_max: extent.x_max.max(vertex.longitude),
            y_min: extent.y_min.min(vertex.latitude),
            y_max: extent.y_max.max(vertex.latitude),
        }))
    }
}

/// One heat-map cell as delivered by the statistics layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCell {
    pub longitude: f64,
    pub latitude: f64,
    pub value: f64,
}

/// Regular latitude x longitude grid, rows ordered by ascending latitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapGrid {
    pub longitudes: Vec<f64>,
    pub latitudes: Vec<f64>,
    /// `values[row][col]` for `latitudes[row]`, `longitudes[col]`; NaN when missing.
    pub values: Vec<Vec<f64>>,
}

impl MapGrid {
    /// Assembles cells into a sorted grid.
    ///
    /// A lone cell is widened into a 3x3 grid of the same value so a color
    /// bar and a visible patch can still be drawn.
    pub fn from_cells(cells: &[MapCell]) -> ChartResult<Self> {
        if cells.is_empty() {
            return Err(ChartError::InvalidData(
                "map grid needs at least one cell".to_owned(),
            ));
        }
        if let Some(cell) = cells
            .iter()
            .find(|cell| !cell.longitude.is_finite() || !cell.latitude.is_finite())
        {
            return Err(ChartError::InvalidData(format!(
                "map cell coordinates must be finite, got ({}, {})",
                cell.longitude, cell.latitude
            )));
        }

        let longitudes: BTreeSet<OrderedFloat<f64>> =
            cells.iter().map(|cell| OrderedFloat(cell.longitude)).collect();
        let latitudes: BTreeSet<OrderedFloat<f64>> =
            cells.iter().map(|cell| OrderedFloat(cell.latitude)).collect();

        if longitudes.len() == 1 && latitudes.len() == 1 {
            return Ok(Self::widen_single_cell(cells[0]));
        }

        let lookup: BTreeMap<(OrderedFloat<f64>, OrderedFloat<f64>), f64> = cells
            .iter()
            .map(|cell| {
                (
                    (OrderedFloat(cell.latitude), OrderedFloat(cell.longitude)),
                    cell.value,
                )
            })
            .collect();

        let values = latitudes
            .iter()
            .map(|lat| {
                longitudes
                    .iter()
                    .map(|lon| lookup.get(&(*lat, *lon)).copied().unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();

        Ok(Self {
            longitudes: longitudes.into_iter().map(|lon| lon.0).collect(),
            latitudes: latitudes.into_iter().map(|lat| lat.0).collect(),
            values,
        })
    }

    fn widen_single_cell(cell: MapCell) -> Self {
        let spread = |center: f64| {
            vec![
                center - SINGLE_CELL_SPREAD,
                center,
                center + SINGLE_CELL_SPREAD,
            ]
        };
        Self {
            longitudes: spread(cell.longitude),
            latitudes: spread(cell.latitude),
            values: vec![vec![cell.value; 3]; 3],
        }
    }

    /// Grid extent, used when no region boundary is available.
    #[must_use]
    pub fn extent(&self) -> Extent {
        let first_or_nan = |values: &[f64]| values.first().copied().unwrap_or(f64::NAN);
        let last_or_nan = |values: &[f64]| values.last().copied().unwrap_or(f64::NAN);
        Extent {
            x_min: first_or_nan(&self.longitudes),
            x_max: last_or_nan(&self.longitudes),
            y_min: first_or_nan(&self.latitudes),
            y_max: last_or_nan(&self.latitudes),
        }
    }

    /// Finite min/max over every cell.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        crate::core::table::finite_range(self.values.iter().flatten().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_rejects_empty_vertex_list() {
        assert!(Extent::of_vertices(&[]).is_err());
    }

    #[test]
    fn missing_cells_are_nan() {
        let grid = MapGrid::from_cells(&[
            MapCell {
                longitude: -70.0,
                latitude: 45.0,
                value: 1.0,
            },
            MapCell {
                longitude: -69.5,
                latitude: 45.5,
                value: 2.0,
            },
        ])
        .expect("grid");
        assert_eq!(grid.latitudes, vec![45.0, 45.5]);
        assert!(grid.values[0][1].is_nan());
        assert_eq!(grid.values[1][1], 2.0);
    }
}
