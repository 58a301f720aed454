use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::precision;
use crate::error::{ChartError, ChartResult};

const RMS_TICK_FRACTIONS: [f64; 4] = [0.0, 0.25, 0.5, 0.75];
const RMS_TICK_MAX_DECIMALS: u32 = 2;
const LEGEND_ROWS: usize = 15;
const HALF_DIAGRAM_WIDTH: f64 = 7.5;
const FULL_DIAGRAM_WIDTH: f64 = 12.0;
const LEGEND_COLUMN_WIDTH: f64 = 3.75;
const DIAGRAM_HEIGHT: f64 = 5.0;

/// Skill statistics of one simulation against the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaylorRow {
    pub simulation: String,
    pub standard_deviation: f64,
    pub centered_rmsd: f64,
    pub correlation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaylorDiagram {
    pub rows: Vec<TaylorRow>,
    pub rms_ticks: Vec<f64>,
    pub legend_columns: usize,
    /// Figure size in inches.
    pub width: f64,
    pub height: f64,
    /// Negative correlations need the full half-circle.
    pub full_circle: bool,
}

pub fn taylor_diagram(rows: &[TaylorRow]) -> ChartResult<TaylorDiagram> {
    if rows.is_empty() {
        return Err(ChartError::InvalidData(
            "taylor diagram needs at least one row".to_owned(),
        ));
    }
    if let Some(row) = rows.iter().find(|row| {
        !row.standard_deviation.is_finite()
            || !row.centered_rmsd.is_finite()
            || !row.correlation.is_finite()
    }) {
        return Err(ChartError::InvalidData(format!(
            "statistics of `{}` must be finite",
            row.simulation
        )));
    }

    let max_rmsd = rows
        .iter()
        .map(|row| row.centered_rmsd)
        .fold(f64::NEG_INFINITY, f64::max);
    let raw_ticks: Vec<f64> = RMS_TICK_FRACTIONS
        .iter()
        .map(|fraction| max_rmsd * fraction)
        .collect();
    let rms_ticks = precision::adjust(&raw_ticks, RMS_TICK_MAX_DECIMALS).as_floats();

    // The first row is the reference itself and has no legend entry.
    let legend_columns = (rows.len() - 1).div_ceil(LEGEND_ROWS);
    let full_circle = rows.iter().any(|row| row.correlation < 0.0);
    let base_width = if full_circle {
        FULL_DIAGRAM_WIDTH
    } else {
        HALF_DIAGRAM_WIDTH
    };
    let width = base_width + (legend_columns as f64 - 1.0) * LEGEND_COLUMN_WIDTH;

    trace!(rows = rows.len(), legend_columns, width, "taylor diagram sized");

    Ok(TaylorDiagram {
        rows: rows.to_vec(),
        rms_ticks,
        legend_columns,
        width,
        height: DIAGRAM_HEIGHT,
        full_circle,
    })
}
