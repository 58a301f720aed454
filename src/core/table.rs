//! Wide, scenario-indexed tables as produced by the statistics layer.
//!
//! A table has one time column (year, day or month) and ordered value
//! columns: the reference column, per-scenario envelope columns named
//! `<scenario>_{lower|middle|upper}`, or raw per-simulation columns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::scenario::{ALL_SCENARIOS_CODE, REF_CODE};
use crate::error::{ChartError, ChartResult};

/// Name of the reference column.
pub const REF_COLUMN: &str = REF_CODE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeRole {
    Lower,
    Middle,
    Upper,
}

impl EnvelopeRole {
    pub const ALL: [Self; 3] = [Self::Lower, Self::Middle, Self::Upper];

    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Middle => "middle",
            Self::Upper => "upper",
        }
    }

    #[must_use]
    pub fn column_name(self, scenario_code: &str) -> String {
        format!("{scenario_code}_{}", self.suffix())
    }

    /// Row-wise reduction applied when scenarios are combined.
    fn reduce(self, values: impl Iterator<Item = f64>) -> f64 {
        let finite = values.filter(|value| !value.is_nan());
        match self {
            Self::Lower => finite.fold(f64::NAN, f64::min),
            Self::Upper => finite.fold(f64::NAN, f64::max),
            Self::Middle => {
                let (sum, count) = finite.fold((0.0, 0_usize), |(sum, count), value| {
                    (sum + value, count + 1)
                });
                if count == 0 {
                    f64::NAN
                } else {
                    sum / count as f64
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind<'a> {
    Reference,
    Envelope {
        scenario: &'a str,
        role: EnvelopeRole,
    },
    Simulation,
}

#[must_use]
pub fn classify_column(name: &str) -> ColumnKind<'_> {
    if name == REF_COLUMN {
        return ColumnKind::Reference;
    }
    for role in EnvelopeRole::ALL {
        if let Some(scenario) = name
            .strip_suffix(role.suffix())
            .and_then(|rest| rest.strip_suffix('_'))
        {
            if !scenario.is_empty() {
                return ColumnKind::Envelope { scenario, role };
            }
        }
    }
    ColumnKind::Simulation
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTable {
    time_key: String,
    time: Vec<f64>,
    columns: IndexMap<String, Vec<f64>>,
}

impl ScenarioTable {
    #[must_use]
    pub fn new(time_key: impl Into<String>, time: Vec<f64>) -> Self {
        Self {
            time_key: time_key.into(),
            time,
            columns: IndexMap::new(),
        }
    }

    /// Appends (or replaces) a value column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> ChartResult<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> ChartResult<()> {
        let name = name.into();
        if values.len() != self.time.len() {
            return Err(ChartError::InvalidData(format!(
                "column `{name}` has {} rows, expected {}",
                values.len(),
                self.time.len()
            )));
        }
        if name == self.time_key {
            return Err(ChartError::InvalidData(format!(
                "column `{name}` collides with the time column"
            )));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    #[must_use]
    pub fn time_key(&self) -> &str {
        &self.time_key
    }

    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn require_column(&self, name: &str) -> ChartResult<&[f64]> {
        self.column(name)
            .ok_or_else(|| ChartError::missing_column(name))
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Keeps the columns for which `keep` returns `true`, preserving order.
    pub fn retain_columns(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.columns.retain(|name, _| keep(name));
    }

    /// Replaces every value of an existing column.
    pub fn fill_column(&mut self, name: &str, value: f64) -> ChartResult<()> {
        let column = self
            .columns
            .get_mut(name)
            .ok_or_else(|| ChartError::missing_column(name))?;
        column.iter_mut().for_each(|cell| *cell = value);
        Ok(())
    }

    /// Duplicates a lone row with its time shifted by `unit`.
    ///
    /// Returns `true` when the table was extended. `unit` must be finite and
    /// positive so the time column stays strictly increasing.
    pub fn duplicate_single_row(&mut self, unit: f64) -> ChartResult<bool> {
        if self.time.len() != 1 {
            return Ok(false);
        }
        if !unit.is_finite() || unit <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "time unit must be finite and > 0, got {unit}"
            )));
        }
        let time = self.time[0];
        self.time.push(time + unit);
        for values in self.columns.values_mut() {
            let value = values[0];
            values.push(value);
        }
        Ok(true)
    }

    /// Finite min/max over every value column, `None` when there is none.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(self.columns.values().flatten().copied())
    }

    #[must_use]
    pub fn time_range(&self) -> Option<(f64, f64)> {
        finite_range(self.time.iter().copied())
    }
}

pub(crate) fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|value| value.is_finite())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
}

/// Rounds a time range outwards to whole decades.
#[must_use]
pub fn decade_range(min: f64, max: f64) -> (f64, f64) {
    ((min / 10.0).floor() * 10.0, (max / 10.0).ceil() * 10.0)
}

/// Combines every scenario's envelope into one synthetic "all scenarios"
/// envelope: row-wise minimum of the lower columns, mean of the middle
/// columns and maximum of the upper columns.
///
/// The synthetic columns are appended in role order and the source columns
/// are removed. A role without columns is left untouched.
#[must_use]
pub fn aggregate_scenarios(table: &ScenarioTable) -> ScenarioTable {
    let mut combined = table.clone();
    for role in EnvelopeRole::ALL {
        let group: Vec<String> = combined
            .column_names()
            .filter(|name| {
                matches!(classify_column(name), ColumnKind::Envelope { role: r, .. } if r == role)
            })
            .map(str::to_owned)
            .collect();
        if group.is_empty() {
            continue;
        }

        let reduced: Vec<f64> = (0..combined.len())
            .map(|row| {
                role.reduce(
                    group
                        .iter()
                        .filter_map(|name| combined.columns.get(name))
                        .map(|values| values[row]),
                )
            })
            .collect();

        trace!(role = role.suffix(), columns = group.len(), "aggregate scenarios");
        for name in &group {
            combined.columns.shift_remove(name);
        }
        combined
            .columns
            .insert(role.column_name(ALL_SCENARIOS_CODE), reduced);
    }
    combined
}
