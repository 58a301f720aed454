use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::context::PlotContext;
use crate::core::precision::{format_rounded, round_value};
use crate::core::scenario::REF_CODE;
use crate::error::{ChartError, ChartResult};

/// Unit written right after the number, without a space.
const UNSPACED_UNIT: &str = "°C";
const MEDIAN_CENTILE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Min,
    Max,
    Mean,
    Centile,
}

/// One statistic of one scenario at one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub scenario: String,
    pub horizon: String,
    pub stat: StatKind,
    #[serde(default)]
    pub centile: Option<u32>,
    pub value: f64,
}

impl StatRecord {
    fn matches(&self, scenario: &str, horizon: &str, stat: StatKind, centile: Option<u32>) -> bool {
        self.scenario == scenario
            && self.horizon == horizon
            && self.stat == stat
            && (stat != StatKind::Centile || self.centile == centile)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub statistic: String,
    /// Rounded values, one per scenario column.
    pub values: Vec<f64>,
    /// Values with their unit, as displayed.
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    pub columns: Vec<String>,
    pub rows: Vec<StatsRow>,
}

/// Row order of the statistics table with its descriptions.
fn statistic_rows(centiles: &[u32]) -> ChartResult<Vec<(StatKind, Option<u32>, String)>> {
    let (Some(lower), Some(upper)) = (centiles.first(), centiles.last()) else {
        return Err(ChartError::InvalidData(
            "at least one table centile is required".to_owned(),
        ));
    };
    Ok(vec![
        (StatKind::Min, None, "Minimum".to_owned()),
        (StatKind::Centile, Some(*lower), format!("{lower}th centile")),
        (StatKind::Centile, Some(MEDIAN_CENTILE), "Median".to_owned()),
        (StatKind::Centile, Some(*upper), format!("{upper}th centile")),
        (StatKind::Max, None, "Maximum".to_owned()),
        (StatKind::Mean, None, "Mean".to_owned()),
    ])
}

/// Builds the statistics table of every non-reference scenario at the
/// context's horizon.
pub fn stats_table(records: &[StatRecord], context: &PlotContext) -> ChartResult<StatsTable> {
    let statistics = statistic_rows(&context.table_centiles)?;
    let scenarios: Vec<_> = context
        .scenarios
        .iter()
        .filter(|scenario| !scenario.is_ref())
        .collect();

    let offset = if context.delta {
        reference_value(records)?
    } else {
        0.0
    };

    let precision = context.variable.precision;
    let separator = if context.variable.unit == UNSPACED_UNIT {
        ""
    } else {
        " "
    };

    let mut rows = Vec::with_capacity(statistics.len());
    for (stat, centile, description) in statistics {
        let values = scenarios
            .iter()
            .map(|scenario| {
                records
                    .iter()
                    .find(|record| record.matches(&scenario.code, &context.horizon, stat, centile))
                    .map(|record| round_value(record.value - offset, precision))
                    .ok_or_else(|| {
                        ChartError::InvalidData(format!(
                            "no `{description}` value for scenario `{}` at horizon `{}`",
                            scenario.code, context.horizon
                        ))
                    })
            })
            .collect::<ChartResult<Vec<f64>>>()?;
        let cells = values
            .iter()
            .map(|value| {
                format!(
                    "{}{separator}{}",
                    format_rounded(*value, precision),
                    context.variable.unit
                )
            })
            .collect();
        rows.push(StatsRow {
            statistic: description,
            values,
            cells,
        });
    }

    trace!(
        columns = scenarios.len(),
        delta = context.delta,
        "statistics table built"
    );

    Ok(StatsTable {
        columns: scenarios
            .iter()
            .map(|scenario| scenario.label.clone())
            .collect(),
        rows,
    })
}

fn reference_value(records: &[StatRecord]) -> ChartResult<f64> {
    let mut reference = records.iter().filter(|record| record.scenario == REF_CODE);
    let first = reference.next().ok_or_else(|| {
        ChartError::InvalidData("delta table needs a reference value".to_owned())
    })?;
    Ok(std::iter::once(first)
        .chain(reference)
        .find(|record| record.stat == StatKind::Mean)
        .unwrap_or(first)
        .value)
}
