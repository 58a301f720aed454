use serde::{Deserialize, Serialize};

use crate::core::palette::PaletteTables;
use crate::core::scenario::{
    ALL_SCENARIOS_CODE, Scenario, ScenarioSelection, SimulationSelection, default_scenarios,
};
use crate::error::{ChartError, ChartResult};
use crate::render::BackendKind;

/// Variable or climate index being plotted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub code: String,
    /// Value axis label, unit included.
    pub label: String,
    pub description: String,
    pub unit: String,
    /// Decimal places used for displayed values.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Variable {
    #[must_use]
    pub fn new(code: impl Into<String>, description: impl Into<String>, unit: impl Into<String>) -> Self {
        let description = description.into();
        let unit = unit.into();
        Self {
            code: code.into(),
            label: format!("{description} ({unit})"),
            description,
            unit,
            precision: default_precision(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }
}

/// Dashboard view the figure is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    TimeSeries,
    /// Time series of simulations compared against the reference (bias).
    Bias,
    Table,
    Map,
    Cycle,
    Cluster,
    Taylor,
}

/// Host the figure is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Dash,
    Streamlit,
    Jupyter,
    Script,
}

/// Statistic shown on a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapStatistic {
    Mean,
    Min,
    Max,
    Centile { centile: u32 },
}

impl MapStatistic {
    #[must_use]
    pub fn description(self) -> String {
        match self {
            Self::Mean => "mean".to_owned(),
            Self::Min => "minimum".to_owned(),
            Self::Max => "maximum".to_owned(),
            Self::Centile { centile } => format!("{centile}th centile"),
        }
    }
}

/// Point location annotated on heat maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLocation {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl MapLocation {
    #[must_use]
    pub fn new(name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            latitude,
        }
    }
}

/// Simulation metadata: the column code it appears under in wide tables,
/// its display label, and the model pair it was produced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationInfo {
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub rcm: String,
    #[serde(default)]
    pub gcm: String,
}

/// Read-only configuration for every figure operation.
///
/// This type is serializable so a host dashboard can hand over its state as
/// JSON instead of wiring each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotContext {
    pub variable: Variable,
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub scenario: ScenarioSelection,
    #[serde(default)]
    pub simulation: SimulationSelection,
    #[serde(default)]
    pub simulations: Vec<SimulationInfo>,
    #[serde(default)]
    pub delta: bool,
    #[serde(default = "default_view")]
    pub view: View,
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    #[serde(default)]
    pub discrete_map: bool,
    #[serde(default)]
    pub palette_tables: PaletteTables,
    #[serde(default = "default_cluster_palette")]
    pub cluster_palette: String,
    #[serde(default = "default_platform")]
    pub platform: Platform,
    #[serde(default)]
    pub horizon: String,
    #[serde(default)]
    pub map_statistic: Option<MapStatistic>,
    #[serde(default = "default_table_centiles")]
    pub table_centiles: Vec<u32>,
    /// Time offset given to the duplicate of a single-row table.
    #[serde(default = "default_time_unit")]
    pub time_unit: f64,
    #[serde(default)]
    pub locations: Vec<MapLocation>,
}

impl PlotContext {
    /// Creates a context with the default scenario set and no selection.
    #[must_use]
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            scenarios: default_scenarios(),
            scenario: ScenarioSelection::default(),
            simulation: SimulationSelection::default(),
            simulations: Vec::new(),
            delta: false,
            view: default_view(),
            backend: default_backend(),
            discrete_map: false,
            palette_tables: PaletteTables::default(),
            cluster_palette: default_cluster_palette(),
            platform: default_platform(),
            horizon: String::new(),
            map_statistic: None,
            table_centiles: default_table_centiles(),
            time_unit: default_time_unit(),
            locations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    #[must_use]
    pub fn with_scenario(mut self, selection: ScenarioSelection) -> Self {
        self.scenario = selection;
        self
    }

    #[must_use]
    pub fn with_simulation(mut self, selection: SimulationSelection) -> Self {
        self.simulation = selection;
        self
    }

    #[must_use]
    pub fn with_simulations(mut self, simulations: Vec<SimulationInfo>) -> Self {
        self.simulations = simulations;
        self
    }

    #[must_use]
    pub fn with_delta(mut self, delta: bool) -> Self {
        self.delta = delta;
        self
    }

    #[must_use]
    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_discrete_map(mut self, discrete: bool) -> Self {
        self.discrete_map = discrete;
        self
    }

    #[must_use]
    pub fn with_palette_tables(mut self, tables: PaletteTables) -> Self {
        self.palette_tables = tables;
        self
    }

    #[must_use]
    pub fn with_cluster_palette(mut self, name: impl Into<String>) -> Self {
        self.cluster_palette = name.into();
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_horizon(mut self, horizon: impl Into<String>) -> Self {
        self.horizon = horizon.into();
        self
    }

    #[must_use]
    pub fn with_map_statistic(mut self, statistic: MapStatistic) -> Self {
        self.map_statistic = Some(statistic);
        self
    }

    #[must_use]
    pub fn with_table_centiles(mut self, centiles: Vec<u32>) -> Self {
        self.table_centiles = centiles;
        self
    }

    #[must_use]
    pub fn with_time_unit(mut self, unit: f64) -> Self {
        self.time_unit = unit;
        self
    }

    #[must_use]
    pub fn with_locations(mut self, locations: Vec<MapLocation>) -> Self {
        self.locations = locations;
        self
    }

    /// Configured scenario by code. The "all scenarios" sentinel resolves
    /// to its pseudo-scenario even when it is not configured.
    #[must_use]
    pub fn scenario_by_code(&self, code: &str) -> Option<Scenario> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.code == code)
            .cloned()
            .or_else(|| (code == ALL_SCENARIOS_CODE).then(Scenario::all_scenarios))
    }

    #[must_use]
    pub fn selected_scenario(&self) -> Option<Scenario> {
        match &self.scenario {
            ScenarioSelection::Specific(code) => self.scenario_by_code(code),
            ScenarioSelection::None | ScenarioSelection::All => None,
        }
    }

    #[must_use]
    pub fn selected_simulation(&self) -> Option<&SimulationInfo> {
        let code = self.simulation.code()?;
        self.simulations.iter().find(|info| info.code == code)
    }

    /// Display label of a simulation column, the code itself when unknown.
    #[must_use]
    pub fn simulation_label<'a>(&'a self, code: &'a str) -> &'a str {
        self.simulations
            .iter()
            .find(|info| info.code == code)
            .map_or(code, |info| info.label.as_str())
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.variable.code.is_empty() {
            return Err(ChartError::InvalidData(
                "variable code must not be empty".to_owned(),
            ));
        }
        if !self.time_unit.is_finite() || self.time_unit <= 0.0 {
            return Err(ChartError::InvalidData(
                "time unit must be finite and > 0".to_owned(),
            ));
        }
        if self.table_centiles.is_empty() {
            return Err(ChartError::InvalidData(
                "at least one table centile is required".to_owned(),
            ));
        }
        for scenario in &self.scenarios {
            scenario.rgb()?;
        }
        Ok(())
    }

    /// Serializes the context to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize context: {e}")))
    }

    /// Deserializes and validates a context from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let context: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse context: {e}")))?;
        context.validate()?;
        Ok(context)
    }
}

fn default_precision() -> u32 {
    1
}

fn default_view() -> View {
    View::TimeSeries
}

fn default_backend() -> BackendKind {
    BackendKind::ChartGrammar
}

fn default_cluster_palette() -> String {
    "nipy_spectral".to_owned()
}

fn default_platform() -> Platform {
    Platform::Script
}

fn default_table_centiles() -> Vec<u32> {
    vec![10, 90]
}

fn default_time_unit() -> f64 {
    1.0
}
