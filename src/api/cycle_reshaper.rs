use chrono::Month;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::table::ScenarioTable;
use crate::error::{ChartError, ChartResult};

pub const DAILY_MEAN_COLUMN: &str = "mean";
pub const DAILY_MIN_COLUMN: &str = "min";
pub const DAILY_MAX_COLUMN: &str = "max";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub year: f64,
    pub month: u8,
    pub month_label: String,
    pub value: f64,
}

/// Monthly values in long format, ordered month first then year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCycle {
    pub rows: Vec<MonthlyRow>,
}

impl MonthlyCycle {
    /// Values of each month, January first, for box plots.
    #[must_use]
    pub fn by_month(&self) -> Vec<(String, Vec<f64>)> {
        let mut months: Vec<(String, Vec<f64>)> = Vec::with_capacity(12);
        for row in &self.rows {
            match months.last_mut() {
                Some((label, values)) if *label == row.month_label => values.push(row.value),
                _ => months.push((row.month_label.clone(), vec![row.value])),
            }
        }
        months
    }
}

/// Three-letter English month abbreviation, `month` in `1..=12`.
pub fn month_label(month: u8) -> ChartResult<String> {
    let month = Month::try_from(month)
        .map_err(|_| ChartError::InvalidData(format!("month {month} is out of range")))?;
    Ok(month.name().chars().take(3).collect())
}

/// Turns a table with one column per month (`"1"` to `"12"`) into long rows.
pub fn monthly_cycle(table: &ScenarioTable) -> ChartResult<MonthlyCycle> {
    let mut rows = Vec::with_capacity(table.len() * 12);
    for month in 1..=12_u8 {
        let values = table.require_column(&month.to_string())?;
        let label = month_label(month)?;
        rows.extend(
            table
                .time()
                .iter()
                .zip(values)
                .map(|(year, value)| MonthlyRow {
                    year: *year,
                    month,
                    month_label: label.clone(),
                    value: *value,
                }),
        );
    }
    trace!(rows = rows.len(), "monthly cycle reshaped");
    Ok(MonthlyCycle { rows })
}

/// Daily mean with its min/max envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCycle {
    pub day: Vec<f64>,
    pub mean: Vec<f64>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl DailyCycle {
    #[must_use]
    pub fn len(&self) -> usize {
        self.day.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }
}

pub fn daily_cycle(table: &ScenarioTable) -> ChartResult<DailyCycle> {
    Ok(DailyCycle {
        day: table.time().to_vec(),
        mean: table.require_column(DAILY_MEAN_COLUMN)?.to_vec(),
        min: table.require_column(DAILY_MIN_COLUMN)?.to_vec(),
        max: table.require_column(DAILY_MAX_COLUMN)?.to_vec(),
    })
}
