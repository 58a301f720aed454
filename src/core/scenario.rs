use serde::{Deserialize, Serialize};

use crate::core::color::Color;
use crate::error::ChartResult;

/// Code of the historical reference scenario.
pub const REF_CODE: &str = "ref";
/// Sentinel code standing for every emission scenario at once.
pub const ALL_SCENARIOS_CODE: &str = "rcpxx";
/// Sentinel code standing for every simulation at once.
pub const ALL_SIMULATIONS_CODE: &str = "simxx";
/// Display label replacing the "all scenarios" label on rendered series.
pub const ALL_SCENARIOS_SERIES_LABEL: &str = "Simulation(s)";

/// Emission scenario (RCP) as configured for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub code: String,
    pub label: String,
    /// Hex color, `#rrggbb`.
    pub color: String,
}

impl Scenario {
    #[must_use]
    pub fn new(code: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            color: color.into(),
        }
    }

    #[must_use]
    pub fn reference() -> Self {
        Self::new(REF_CODE, "Reference", "#000000")
    }

    #[must_use]
    pub fn all_scenarios() -> Self {
        Self::new(ALL_SCENARIOS_CODE, "All scenarios", "#808080")
    }

    #[must_use]
    pub fn is_ref(&self) -> bool {
        self.code == REF_CODE
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.code == ALL_SCENARIOS_CODE
    }

    pub fn rgb(&self) -> ChartResult<Color> {
        Color::from_hex(&self.color)
    }

    /// Label used on rendered series.
    #[must_use]
    pub fn series_label(&self) -> &str {
        if self.is_all() {
            ALL_SCENARIOS_SERIES_LABEL
        } else {
            &self.label
        }
    }
}

#[must_use]
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::reference(),
        Scenario::new("rcp26", "RCP 2.6", "#0000ff"),
        Scenario::new("rcp45", "RCP 4.5", "#008000"),
        Scenario::new("rcp85", "RCP 8.5", "#ff0000"),
    ]
}

/// Moves the reference scenario to the end so it draws on top.
#[must_use]
pub fn reference_last(scenarios: &[Scenario]) -> Vec<Scenario> {
    let mut ordered: Vec<Scenario> = scenarios.iter().filter(|s| !s.is_ref()).cloned().collect();
    ordered.push(
        scenarios
            .iter()
            .find(|s| s.is_ref())
            .cloned()
            .unwrap_or_else(Scenario::reference),
    );
    ordered
}

/// Scenario picked in the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioSelection {
    /// Nothing picked (blank selector).
    #[default]
    None,
    /// The "all scenarios" entry.
    All,
    Specific(String),
}

impl ScenarioSelection {
    #[must_use]
    pub fn specific(code: impl Into<String>) -> Self {
        let code = code.into();
        match code.as_str() {
            "" => Self::None,
            ALL_SCENARIOS_CODE => Self::All,
            _ => Self::Specific(code),
        }
    }

    #[must_use]
    pub fn is_specific(&self) -> bool {
        matches!(self, Self::Specific(_))
    }

    /// Code as it appears in scenario lists, `None` when blank.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::All => Some(ALL_SCENARIOS_CODE),
            Self::Specific(code) => Some(code),
        }
    }
}

/// Simulation picked in the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationSelection {
    #[default]
    None,
    All,
    Specific(String),
}

impl SimulationSelection {
    #[must_use]
    pub fn specific(code: impl Into<String>) -> Self {
        let code = code.into();
        match code.as_str() {
            "" => Self::None,
            ALL_SIMULATIONS_CODE => Self::All,
            _ => Self::Specific(code),
        }
    }

    #[must_use]
    pub fn is_specific(&self) -> bool {
        matches!(self, Self::Specific(_))
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Specific(code) => Some(code),
            Self::None | Self::All => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_is_moved_last() {
        let ordered = reference_last(&default_scenarios());
        assert_eq!(ordered.len(), 4);
        assert!(ordered[3].is_ref());
        assert_eq!(ordered[0].code, "rcp26");
    }

    #[test]
    fn sentinel_codes_map_to_selection_variants() {
        assert_eq!(ScenarioSelection::specific(""), ScenarioSelection::None);
        assert_eq!(ScenarioSelection::specific("rcpxx"), ScenarioSelection::All);
        assert_eq!(SimulationSelection::specific("simxx"), SimulationSelection::All);
    }
}
