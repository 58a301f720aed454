//! Simulation clusters: colored table rows and scatter plot with a grid legend.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::context::{PlotContext, Variable};
use crate::core::color::Color;
use crate::core::palette::{ColorRef, sample_palette};
use crate::core::table::finite_range;
use crate::error::{ChartError, ChartResult};

pub const LEGEND_MAX_COLUMNS: u32 = 30;
pub const LEGEND_MAX_ROWS: u32 = 15;

/// Group a simulation was assigned to, with its per-variable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub simulation: String,
    pub scenario: String,
    /// 1-based group number.
    pub group: u32,
    #[serde(default)]
    pub values: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterTableRow {
    pub simulation: String,
    pub scenario: String,
    pub group: u32,
    pub color: ColorRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterTable {
    pub cluster_count: u32,
    /// Codes of the variables the clusters were computed from.
    pub variables: Vec<String>,
    pub rows: Vec<ClusterTableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPoint {
    pub simulation: String,
    pub group: u32,
    pub x: f64,
    pub y: f64,
    pub color: ColorRef,
    pub legend_x: f64,
    pub legend_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPlot {
    pub cluster_count: u32,
    pub x_variable: Variable,
    pub y_variable: Variable,
    pub legend_anchor: (f64, f64),
    pub points: Vec<ClusterPoint>,
}

impl ClusterPlot {
    #[must_use]
    pub fn axis_labels(&self) -> (String, String) {
        let label = |variable: &Variable| format!("{} ({})", variable.description, variable.unit);
        (label(&self.x_variable), label(&self.y_variable))
    }
}

/// Color of a group: the cluster palette sampled evenly, black for a single
/// cluster.
pub fn group_color(palette: &str, group: u32, cluster_count: u32) -> ChartResult<ColorRef> {
    if cluster_count <= 1 {
        return Ok(ColorRef::rgb(Color::BLACK));
    }
    let position = f64::from(group.saturating_sub(1)) / f64::from(cluster_count - 1);
    sample_palette(palette, position)
}

fn validate_groups(assignments: &[ClusterAssignment], cluster_count: u32) -> ChartResult<()> {
    if cluster_count == 0 {
        return Err(ChartError::InvalidData(
            "cluster count must be > 0".to_owned(),
        ));
    }
    if let Some(assignment) = assignments
        .iter()
        .find(|assignment| assignment.group == 0 || assignment.group > cluster_count)
    {
        return Err(ChartError::InvalidData(format!(
            "simulation `{}` is in group {}, expected 1..={cluster_count}",
            assignment.simulation, assignment.group
        )));
    }
    Ok(())
}

/// Table of simulations sorted by group, then scenario.
pub fn cluster_table(
    assignments: &[ClusterAssignment],
    cluster_count: u32,
    variables: &[Variable],
    context: &PlotContext,
) -> ChartResult<ClusterTable> {
    validate_groups(assignments, cluster_count)?;

    let mut sorted: Vec<&ClusterAssignment> = assignments.iter().collect();
    sorted.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.scenario.cmp(&b.scenario)));

    let rows = sorted
        .into_iter()
        .map(|assignment| {
            Ok(ClusterTableRow {
                simulation: assignment.simulation.clone(),
                scenario: assignment.scenario.clone(),
                group: assignment.group,
                color: group_color(&context.cluster_palette, assignment.group, cluster_count)?,
            })
        })
        .collect::<ChartResult<Vec<_>>>()?;

    Ok(ClusterTable {
        cluster_count,
        variables: variables.iter().map(|variable| variable.code.clone()).collect(),
        rows,
    })
}

/// Scatter plot of the first two variables (the same one twice when only
/// one is given) with a per-point legend position.
pub fn cluster_plot(
    assignments: &[ClusterAssignment],
    cluster_count: u32,
    variables: &[Variable],
    context: &PlotContext,
) -> ChartResult<ClusterPlot> {
    validate_groups(assignments, cluster_count)?;
    let (x_variable, y_variable) = match variables {
        [] => {
            return Err(ChartError::InvalidData(
                "cluster plot needs at least one variable".to_owned(),
            ));
        }
        [only] => (only, only),
        [first, second, ..] => (first, second),
    };

    let coordinate = |assignment: &ClusterAssignment, variable: &Variable| -> ChartResult<f64> {
        assignment
            .values
            .get(&variable.code)
            .copied()
            .ok_or_else(|| ChartError::missing_column(variable.code.clone()))
    };
    let coordinates = assignments
        .iter()
        .map(|assignment| {
            Ok((
                coordinate(assignment, x_variable)?,
                coordinate(assignment, y_variable)?,
            ))
        })
        .collect::<ChartResult<Vec<(f64, f64)>>>()?;

    let no_values = || ChartError::InvalidData("cluster plot has no finite values".to_owned());
    let (x_min, x_max) = finite_range(coordinates.iter().map(|(x, _)| *x)).ok_or_else(no_values)?;
    let (y_min, y_max) = finite_range(coordinates.iter().map(|(_, y)| *y)).ok_or_else(no_values)?;

    let dx = (x_max - x_min) / f64::from(LEGEND_MAX_COLUMNS);
    let dy = (y_max - y_min) / f64::from(LEGEND_MAX_ROWS);
    let row_count = cluster_count.div_ceil(LEGEND_MAX_COLUMNS);

    let points = assignments
        .iter()
        .zip(coordinates)
        .map(|(assignment, (x, y))| {
            let group = assignment.group;
            let column = (group - 1) % LEGEND_MAX_COLUMNS;
            let row = row_count - group.div_ceil(LEGEND_MAX_COLUMNS);
            Ok(ClusterPoint {
                simulation: assignment.simulation.clone(),
                group,
                x,
                y,
                color: group_color(&context.cluster_palette, group, cluster_count)?,
                legend_x: x_min + dx * f64::from(column),
                legend_y: y_min + dy * f64::from(row),
            })
        })
        .collect::<ChartResult<Vec<_>>>()?;

    trace!(
        points = points.len(),
        cluster_count,
        rows = row_count,
        "cluster plot laid out"
    );

    Ok(ClusterPlot {
        cluster_count,
        x_variable: x_variable.clone(),
        y_variable: y_variable.clone(),
        legend_anchor: (x_min, y_min + dy * f64::from(row_count)),
        points,
    })
}
