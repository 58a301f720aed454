//! Wide scenario tables to per-scenario long-format series.
//!
//! The reshaper applies the scenario and simulation filters of the
//! [`PlotContext`], combines scenarios for the bias view and decides color,
//! line weight and area of every series, so that every back end draws from
//! the same [`SeriesBundle`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::api::context::{PlotContext, View};
use crate::api::line_weight::{LineWeight, line_weights};
use crate::core::color::Color;
use crate::core::precision::round_value;
use crate::core::scenario::{Scenario, ScenarioSelection, reference_last};
use crate::core::table::{
    ColumnKind, EnvelopeRole, REF_COLUMN, ScenarioTable, aggregate_scenarios, classify_column,
    decade_range, finite_range,
};
use crate::error::{ChartError, ChartResult};

/// How scenario columns are turned into series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReshapeMode {
    /// One envelope (lower/middle/upper) per scenario.
    Aggregate,
    /// One curve per simulation.
    PerSimulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesValues {
    Single {
        values: Vec<f64>,
    },
    Envelope {
        min: Vec<f64>,
        mid: Vec<f64>,
        max: Vec<f64>,
    },
    /// Simulation curves keyed by display label.
    Simulations {
        columns: IndexMap<String, Vec<f64>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReshapedSeries {
    pub scenario_code: String,
    pub label: String,
    pub color: Color,
    pub weight: LineWeight,
    /// Draw the min/max band under the curve.
    pub area: bool,
    pub is_reference: bool,
    pub time: Vec<f64>,
    pub values: SeriesValues,
}

impl ReshapedSeries {
    /// Curves to draw, keyed by label; envelope bands are not included.
    #[must_use]
    pub fn curves(&self) -> Vec<(&str, &[f64])> {
        match &self.values {
            SeriesValues::Single { values } => vec![(self.label.as_str(), values.as_slice())],
            SeriesValues::Envelope { mid, .. } => vec![(self.label.as_str(), mid.as_slice())],
            SeriesValues::Simulations { columns } => columns
                .iter()
                .map(|(label, values)| (label.as_str(), values.as_slice()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBundle {
    pub time_key: String,
    pub mode: ReshapeMode,
    pub series: Vec<ReshapedSeries>,
    pub time_range: (f64, f64),
    /// Finite min/max of the plotted columns, taken after the delta zero-fill
    /// and column subsetting; the reference is excluded per simulation.
    pub value_range: (f64, f64),
}

impl SeriesBundle {
    #[must_use]
    pub fn reference(&self) -> Option<&ReshapedSeries> {
        self.series.iter().find(|series| series.is_reference)
    }

    #[must_use]
    pub fn series_by_code(&self, code: &str) -> Option<&ReshapedSeries> {
        self.series.iter().find(|series| series.scenario_code == code)
    }
}

/// Reshapes a wide scenario table into the series of a time-series figure.
pub fn reshape(
    table: &ScenarioTable,
    mode: ReshapeMode,
    context: &PlotContext,
) -> ChartResult<SeriesBundle> {
    table.require_column(REF_COLUMN)?;
    if table.is_empty() {
        return Err(ChartError::InvalidData(format!(
            "time column `{}` has no rows",
            table.time_key()
        )));
    }

    let mut working = table.clone();
    if context.delta {
        working.fill_column(REF_COLUMN, 0.0)?;
    }

    let time_range = if working.duplicate_single_row(context.time_unit)? {
        trace!(unit = context.time_unit, "single row duplicated");
        let t0 = working.time()[0];
        (t0, t0 + context.time_unit)
    } else {
        let (min, max) = working.time_range().ok_or_else(|| {
            ChartError::InvalidData(format!(
                "time column `{}` has no finite values",
                working.time_key()
            ))
        })?;
        decade_range(min, max)
    };

    if mode == ReshapeMode::PerSimulation {
        subset_columns(&mut working, context);
    }

    if mode == ReshapeMode::Aggregate
        && context.view == View::Bias
        && !context.scenario.is_specific()
    {
        working = aggregate_scenarios(&working);
    }

    let value_range = value_range(&working, mode)?;
    let weights = line_weights(mode, context.delta, context.simulation.is_specific());

    let mut series = Vec::new();
    for scenario in iteration_order(context) {
        if is_filtered_out(&scenario, context) {
            trace!(scenario = %scenario.code, "scenario filtered out");
            continue;
        }

        let Some(values) = extract_values(&working, &scenario, mode, context)? else {
            debug!(
                scenario = %scenario.code,
                ?mode,
                "no columns for scenario, series skipped"
            );
            continue;
        };

        let color = if context.view == View::Bias && !scenario.is_ref() {
            Color::DARK_GREY
        } else {
            scenario.rgb()?
        };
        let weight = if scenario.is_ref() {
            weights.reference
        } else {
            weights.scenario
        };

        series.push(ReshapedSeries {
            scenario_code: scenario.code.clone(),
            label: scenario.series_label().to_owned(),
            color,
            weight,
            area: matches!(values, SeriesValues::Envelope { .. }),
            is_reference: scenario.is_ref(),
            time: working.time().to_vec(),
            values,
        });
    }

    trace!(
        series = series.len(),
        ?mode,
        view = ?context.view,
        "table reshaped"
    );

    Ok(SeriesBundle {
        time_key: working.time_key().to_owned(),
        mode,
        series,
        time_range,
        value_range,
    })
}

/// A selected simulation wins over the scenario filter and is looked up in
/// the full column set.
fn subset_columns(table: &mut ScenarioTable, context: &PlotContext) {
    if let Some(code) = context.simulation.code() {
        table.retain_columns(|name| name == REF_COLUMN || name == code);
    } else if let ScenarioSelection::Specific(code) = &context.scenario {
        table.retain_columns(|name| name == REF_COLUMN || name.contains(code.as_str()));
    }
}

fn value_range(table: &ScenarioTable, mode: ReshapeMode) -> ChartResult<(f64, f64)> {
    let values = table
        .columns()
        .filter(|(name, _)| mode == ReshapeMode::Aggregate || *name != REF_COLUMN)
        .flat_map(|(_, values)| values.iter().copied());
    finite_range(values)
        .or_else(|| table.value_range())
        .ok_or_else(|| ChartError::InvalidData("table has no finite values".to_owned()))
}

/// Configured scenarios (or the "all scenarios" pseudo-scenario), then the
/// reference.
fn iteration_order(context: &PlotContext) -> Vec<Scenario> {
    if context.view == View::TimeSeries || context.scenario.is_specific() {
        reference_last(&context.scenarios)
    } else {
        let reference = context
            .scenarios
            .iter()
            .find(|scenario| scenario.is_ref())
            .cloned()
            .unwrap_or_else(Scenario::reference);
        vec![Scenario::all_scenarios(), reference]
    }
}

fn is_filtered_out(scenario: &Scenario, context: &PlotContext) -> bool {
    let isolated = match context.view {
        View::TimeSeries => context.scenario.is_specific(),
        View::Bias => context.scenario != ScenarioSelection::None,
        _ => false,
    };
    isolated && !scenario.is_ref() && context.scenario.code() != Some(scenario.code.as_str())
}

fn extract_values(
    table: &ScenarioTable,
    scenario: &Scenario,
    mode: ReshapeMode,
    context: &PlotContext,
) -> ChartResult<Option<SeriesValues>> {
    let precision = context.variable.precision;
    let rounded = |values: &[f64]| -> Vec<f64> {
        values
            .iter()
            .map(|value| round_value(*value, precision))
            .collect()
    };

    if scenario.is_ref() {
        let values = table.require_column(REF_COLUMN)?;
        return Ok(Some(SeriesValues::Single {
            values: rounded(values),
        }));
    }

    match mode {
        ReshapeMode::Aggregate => {
            let column = |role: EnvelopeRole| table.column(&role.column_name(&scenario.code));
            match (
                column(EnvelopeRole::Lower),
                column(EnvelopeRole::Middle),
                column(EnvelopeRole::Upper),
            ) {
                (Some(min), Some(mid), Some(max)) => Ok(Some(SeriesValues::Envelope {
                    min: rounded(min),
                    mid: rounded(mid),
                    max: rounded(max),
                })),
                (None, Some(mid), None) => Ok(Some(SeriesValues::Single {
                    values: rounded(mid),
                })),
                (None, None, None) => Ok(None),
                _ => Err(ChartError::InvalidData(format!(
                    "scenario `{}` has an incomplete envelope",
                    scenario.code
                ))),
            }
        }
        ReshapeMode::PerSimulation => {
            let columns: IndexMap<String, Vec<f64>> = table
                .columns()
                .filter(|(name, _)| match classify_column(name) {
                    ColumnKind::Simulation => scenario.is_all() || name.contains(&scenario.code),
                    ColumnKind::Reference | ColumnKind::Envelope { .. } => false,
                })
                .map(|(name, values)| (context.simulation_label(name).to_owned(), rounded(values)))
                .collect();
            if columns.is_empty() {
                Ok(None)
            } else {
                Ok(Some(SeriesValues::Simulations { columns }))
            }
        }
    }
}
