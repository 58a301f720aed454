use serde::{Deserialize, Serialize};

use crate::api::series_reshaper::ReshapeMode;

/// Stroke width of a time-series curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineWeight {
    Thin,
    Thick,
}

impl LineWeight {
    #[must_use]
    pub const fn width(self) -> f64 {
        match self {
            Self::Thin => 1.0,
            Self::Thick => 2.0,
        }
    }
}

/// Weights of the reference curve and of scenario curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWeights {
    pub reference: LineWeight,
    pub scenario: LineWeight,
}

/// ```text
/// mode | delta | simulation |   ref |   rcp
/// -----+-------+------------+-------+------
/// rcp  |   no  |      blank | thick | thick
/// sim  |   no  |      blank | thick |  thin
/// rcp  |  yes  |      blank |  thin | thick
/// sim  |  yes  |      blank |  thin |  thin
/// rcp  |   no  |  specified | thick | thick
/// sim  |   no  |  specified | thick | thick
/// rcp  |  yes  |  specified |  thin | thick
/// sim  |  yes  |  specified |  thin | thick
/// ```
#[must_use]
pub fn line_weights(mode: ReshapeMode, delta: bool, simulation_specified: bool) -> LineWeights {
    let reference = if delta {
        LineWeight::Thin
    } else {
        LineWeight::Thick
    };
    let scenario = match (mode, simulation_specified) {
        (ReshapeMode::PerSimulation, false) => LineWeight::Thin,
        _ => LineWeight::Thick,
    };
    LineWeights {
        reference,
        scenario,
    }
}
