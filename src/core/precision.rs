//! Adaptive decimal precision for displayed values.
//!
//! The search looks for the smallest number of decimals for which every
//! rendered value is distinct, so that colorbar ticks or table cells never
//! show two identical labels for different numbers.

use std::collections::HashSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

pub const DEFAULT_MAX_DECIMALS: u32 = 4;

/// Output representation requested from [`PrecisionResult::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionOutput {
    Int,
    Float,
    Str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdjustedValue {
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionResult {
    pub decimals: u32,
    pub formatted: Vec<String>,
    /// `true` when no decimal count within the bound made the values distinct.
    pub exhausted: bool,
}

impl PrecisionResult {
    /// Converts the formatted values to the requested representation.
    ///
    /// Integer output is only defined for a zero-decimal result with finite
    /// values.
    pub fn convert(&self, output: PrecisionOutput) -> ChartResult<Vec<AdjustedValue>> {
        match output {
            PrecisionOutput::Str => Ok(self
                .formatted
                .iter()
                .cloned()
                .map(AdjustedValue::Str)
                .collect()),
            PrecisionOutput::Float => Ok(self
                .as_floats()
                .into_iter()
                .map(AdjustedValue::Float)
                .collect()),
            PrecisionOutput::Int => self
                .formatted
                .iter()
                .map(|text| {
                    text.parse::<i64>().map(AdjustedValue::Int).map_err(|_| {
                        ChartError::InvalidData(format!(
                            "`{text}` cannot be represented as an integer"
                        ))
                    })
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn as_floats(&self) -> Vec<f64> {
        self.formatted
            .iter()
            .map(|text| text.parse::<f64>().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Finds the smallest decimal count in `0..=max_decimals` that renders all
/// values as pairwise distinct text, falling back to `max_decimals`.
#[must_use]
pub fn adjust(values: &[f64], max_decimals: u32) -> PrecisionResult {
    let mut decimals = 0;
    loop {
        let formatted: Vec<String> = values
            .iter()
            .map(|value| format_rounded(*value, decimals))
            .collect();

        if all_distinct(&formatted) {
            trace!(decimals, count = values.len(), "precision adjusted");
            return PrecisionResult {
                decimals,
                formatted,
                exhausted: false,
            };
        }
        if decimals >= max_decimals {
            trace!(
                decimals,
                count = values.len(),
                "precision bound reached without distinct values"
            );
            return PrecisionResult {
                decimals,
                formatted,
                exhausted: true,
            };
        }
        decimals += 1;
    }
}

/// Rounds half-to-even on the exact binary value and renders `decimals`
/// fractional digits.
#[must_use]
pub fn format_rounded(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }

    let width = decimals as usize;
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded =
                exact.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven);
            if rounded.is_zero() {
                rounded.set_sign_positive(true);
            }
            format!("{rounded:.width$}")
        }
        // Outside the decimal range: plain float formatting is exact enough there.
        None => format!("{value:.width$}"),
    }
}

/// Rounds a value to `decimals` places using the same rule as
/// [`format_rounded`].
#[must_use]
pub fn round_value(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}

fn all_distinct(formatted: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(formatted.len());
    formatted.iter().all(|text| seen.insert(text.as_str()))
}
