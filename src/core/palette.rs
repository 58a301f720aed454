//! Color scale selection for heat maps and cluster colors.
//!
//! Selection runs in two stages: a sign index derived from the value range
//! and the delta flag, then a per-family table of four palette names. Names
//! that match the built-in gradient library are synthesized here; every
//! other name is handed to the rendering back end as a native colormap.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::color::Color;
use crate::core::precision::{self, DEFAULT_MAX_DECIMALS};
use crate::error::{ChartError, ChartResult};

/// Suffix reversing the stop order of a palette.
pub const REVERSED_SUFFIX: &str = "_r";

pub const DISCRETE_CLUSTER_BASE: u32 = 10;
pub const CONTINUOUS_CLUSTER_BASE: u32 = 256;
/// Largest accepted cluster base; a straddling range doubles it.
pub const MAX_CLUSTER_BASE: u32 = 4096;

/// Closed set of variable families sharing a palette table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteFamily {
    TemperatureVariable,
    TemperatureIndexHeat,
    TemperatureIndexCold,
    PrecipitationVariable,
    PrecipitationIndexWet,
    PrecipitationIndexDry,
    PrecipitationIndexSeason,
    EvaporationVariable,
    WindVariable,
    WindIndex,
    Default,
}

impl PaletteFamily {
    pub const ALL: [Self; 11] = [
        Self::TemperatureVariable,
        Self::TemperatureIndexHeat,
        Self::TemperatureIndexCold,
        Self::PrecipitationVariable,
        Self::PrecipitationIndexWet,
        Self::PrecipitationIndexDry,
        Self::PrecipitationIndexSeason,
        Self::EvaporationVariable,
        Self::WindVariable,
        Self::WindIndex,
        Self::Default,
    ];
}

/// Maps a variable or index code to its palette family.
#[must_use]
pub fn classify_variable(code: &str) -> PaletteFamily {
    match code {
        "tas" | "tasmin" | "tasmax" | "etr" | "tgg" | "tng" | "tnx" | "txx" | "txg" => {
            PaletteFamily::TemperatureVariable
        }
        "tx_days_above"
        | "heat_wave_max_length"
        | "heat_wave_total_length"
        | "hot_spell_frequency"
        | "hot_spell_max_length"
        | "hot_spell_total_length"
        | "tropical_nights"
        | "tx90p"
        | "wsdi" => PaletteFamily::TemperatureIndexHeat,
        "tn_days_below" | "tng_months_below" => PaletteFamily::TemperatureIndexCold,
        "pr" | "prcptot" | "rx1day" | "rx5day" | "sdii" | "rain_season_prcptot" => {
            PaletteFamily::PrecipitationVariable
        }
        "cwd" | "r10mm" | "r20mm" | "wet_days" | "rain_season_length" => {
            PaletteFamily::PrecipitationIndexWet
        }
        "cdd" | "dry_days" | "drought_code" | "dry_spell_total_length" => {
            PaletteFamily::PrecipitationIndexDry
        }
        "rain_season_start" | "rain_season_end" => PaletteFamily::PrecipitationIndexSeason,
        "evspsbl" | "evspsblpot" => PaletteFamily::EvaporationVariable,
        "uas" | "vas" | "sfcWindmax" => PaletteFamily::WindVariable,
        "wg_days_above" | "wx_days_above" => PaletteFamily::WindIndex,
        _ => PaletteFamily::Default,
    }
}

/// Position in a family's 4-entry palette table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignIndex {
    /// Absolute values of a non-wind variable.
    Absolute = 0,
    /// Range straddles zero.
    Straddling = 1,
    /// Range entirely below zero.
    Negative = 2,
    /// Everything else.
    Positive = 3,
}

impl SignIndex {
    #[must_use]
    pub fn resolve(family: PaletteFamily, is_delta: bool, min: f64, max: f64) -> Self {
        if !is_delta && family != PaletteFamily::WindVariable {
            Self::Absolute
        } else if straddles_zero(min, max) {
            Self::Straddling
        } else if min < 0.0 && max < 0.0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }
}

#[must_use]
pub fn straddles_zero(min: f64, max: f64) -> bool {
    min < 0.0 && max > 0.0
}

/// Palette names per family, indexed by [`SignIndex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteTables {
    #[serde(default)]
    pub families: IndexMap<PaletteFamily, [String; 4]>,
    #[serde(default = "default_family_names")]
    pub default: [String; 4],
}

impl Default for PaletteTables {
    fn default() -> Self {
        let table = |names: [&str; 4]| names.map(str::to_owned);
        let mut families = IndexMap::new();
        families.insert(
            PaletteFamily::TemperatureVariable,
            table(["RdBu_r", "RdBu_r", "Blues_r", "Reds"]),
        );
        families.insert(
            PaletteFamily::TemperatureIndexHeat,
            table(["Reds", "RdBu_r", "Blues_r", "Reds"]),
        );
        families.insert(
            PaletteFamily::TemperatureIndexCold,
            table(["Blues", "RdBu", "Reds_r", "Blues"]),
        );
        families.insert(
            PaletteFamily::PrecipitationVariable,
            table(["Turquoises", "BrWhGr", "Browns_r", "Turquoises"]),
        );
        families.insert(
            PaletteFamily::PrecipitationIndexWet,
            table(["LBlues", "BrWhGr", "Browns_r", "LBlues"]),
        );
        families.insert(
            PaletteFamily::PrecipitationIndexDry,
            table(["YlBr", "GrWhBr", "Turquoises_r", "Browns"]),
        );
        families.insert(
            PaletteFamily::PrecipitationIndexSeason,
            table(["YlGr", "BrYlGr", "BrYl", "YlGr"]),
        );
        families.insert(
            PaletteFamily::EvaporationVariable,
            table(["Browns", "GrWhBr", "Turquoises_r", "Browns"]),
        );
        families.insert(
            PaletteFamily::WindVariable,
            table(["YlPu", "PiPu", "Pinks_r", "YlPu"]),
        );
        families.insert(
            PaletteFamily::WindIndex,
            table(["YlPu", "PiPu", "Pinks_r", "YlPu"]),
        );
        Self {
            families,
            default: default_family_names(),
        }
    }
}

impl PaletteTables {
    /// Palette name for a family, falling back to the default table.
    #[must_use]
    pub fn name(&self, family: PaletteFamily, index: SignIndex) -> &str {
        let names = match family {
            PaletteFamily::Default => &self.default,
            _ => self.families.get(&family).unwrap_or_else(|| {
                debug!(?family, "palette family not configured, using default table");
                &self.default
            }),
        };
        &names[index.position()]
    }

    #[must_use]
    pub fn with_family(mut self, family: PaletteFamily, names: [String; 4]) -> Self {
        if family == PaletteFamily::Default {
            self.default = names;
        } else {
            self.families.insert(family, names);
        }
        self
    }
}

fn default_family_names() -> [String; 4] {
    ["viridis", "RdBu_r", "Blues_r", "Reds"].map(str::to_owned)
}

/// Where the colors of a palette come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaletteSource {
    /// Colormap known to the rendering back end.
    Native { name: String },
    /// Built-in gradient through 2 or 3 stops.
    Gradient { stops: SmallVec<[Color; 3]> },
}

const HEX_WHITE: &str = "#ffffff";
const HEX_GREY: &str = "#808080";
const HEX_GREEN: &str = "#008000";
const HEX_YELLOW: &str = "#ffffcc";
const HEX_ORANGE: &str = "#f97306";
const HEX_BROWN: &str = "#662506";
const HEX_RED: &str = "#ff0000";
const HEX_PINK: &str = "#ffc0cb";
const HEX_PURPLE: &str = "#800080";
const HEX_BLUE: &str = "#0000ff";
const HEX_LIGHT_BLUE: &str = "#7bc8f6";
const HEX_LIGHT_BROWN: &str = "#d2b48c";
const HEX_SALMON: &str = "#a52a2a";
const HEX_TURQUOISE: &str = "#008080";

/// Stops of a built-in gradient, ordered for a vertical color bar.
fn gradient_hex(base_name: &str) -> Option<&'static [&'static str]> {
    let stops: &'static [&'static str] = match base_name {
        "Pinks" => &[HEX_WHITE, HEX_PINK],
        "PiPu" => &[HEX_PINK, HEX_WHITE, HEX_PURPLE],
        "Browns" => &[HEX_WHITE, HEX_BROWN],
        "YlBr" => &[HEX_YELLOW, HEX_BROWN],
        "BrYl" => &[HEX_BROWN, HEX_YELLOW],
        "BrYlGr" => &[HEX_BROWN, HEX_YELLOW, HEX_GREEN],
        "GrYlBr" => &[HEX_GREEN, HEX_YELLOW, HEX_BROWN],
        "YlGr" => &[HEX_YELLOW, HEX_GREEN],
        "GrYl" => &[HEX_GREEN, HEX_YELLOW],
        "BrWhGr" => &[HEX_BROWN, HEX_WHITE, HEX_GREEN],
        "GrWhBr" => &[HEX_GREEN, HEX_WHITE, HEX_BROWN],
        "TuYlSa" => &[HEX_TURQUOISE, HEX_YELLOW, HEX_SALMON],
        "YlTu" => &[HEX_YELLOW, HEX_TURQUOISE],
        "YlSa" => &[HEX_YELLOW, HEX_SALMON],
        "LBuWhLBr" => &[HEX_LIGHT_BLUE, HEX_WHITE, HEX_LIGHT_BROWN],
        "LBlues" => &[HEX_WHITE, HEX_LIGHT_BLUE],
        "BuYlRd" => &[HEX_BLUE, HEX_YELLOW, HEX_RED],
        "LBrowns" => &[HEX_WHITE, HEX_LIGHT_BROWN],
        "LBuYlLBr" => &[HEX_LIGHT_BLUE, HEX_YELLOW, HEX_LIGHT_BROWN],
        "YlLBu" => &[HEX_YELLOW, HEX_LIGHT_BLUE],
        "YlLBr" => &[HEX_YELLOW, HEX_LIGHT_BROWN],
        "YlBu" => &[HEX_YELLOW, HEX_BLUE],
        "Turquoises" => &[HEX_WHITE, HEX_TURQUOISE],
        "PuYlOr" => &[HEX_PURPLE, HEX_YELLOW, HEX_ORANGE],
        "YlOrRd" => &[HEX_YELLOW, HEX_ORANGE, HEX_RED],
        "YlOr" => &[HEX_YELLOW, HEX_ORANGE],
        "YlPu" => &[HEX_YELLOW, HEX_PURPLE],
        "PuYl" => &[HEX_PURPLE, HEX_YELLOW],
        "GyYlRd" => &[HEX_GREY, HEX_YELLOW, HEX_RED],
        "RdYlGy" => &[HEX_RED, HEX_YELLOW, HEX_GREY],
        "YlGy" => &[HEX_YELLOW, HEX_GREY],
        "GyYl" => &[HEX_GREY, HEX_YELLOW],
        "YlRd" => &[HEX_YELLOW, HEX_RED],
        "RdYl" => &[HEX_RED, HEX_YELLOW],
        "GyWhRd" => &[HEX_GREY, HEX_WHITE, HEX_RED],
        _ => return None,
    };
    Some(stops)
}

/// Resolves a palette name to a built-in gradient or a native colormap.
pub fn resolve_palette(name: &str) -> ChartResult<PaletteSource> {
    let (base_name, reversed) = match name.strip_suffix(REVERSED_SUFFIX) {
        Some(base_name) => (base_name, true),
        None => (name, false),
    };

    let Some(hex_stops) = gradient_hex(base_name) else {
        return Ok(PaletteSource::Native {
            name: name.to_owned(),
        });
    };

    let mut stops = hex_stops
        .iter()
        .map(|hex| Color::from_hex(hex))
        .collect::<ChartResult<SmallVec<[Color; 3]>>>()?;
    if reversed {
        stops.reverse();
    }
    Ok(PaletteSource::Gradient { stops })
}

/// Piecewise-linear color at `t` in `[0, 1]`, stops placed at `{0, 1}` or
/// `{0, 0.5, 1}`.
pub fn interpolate_stops(stops: &[Color], t: f64) -> ChartResult<Color> {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    match stops {
        [start, end] => Ok(start.lerp(*end, t)),
        [start, middle, end] => {
            if t <= 0.5 {
                Ok(start.lerp(*middle, t / 0.5))
            } else {
                Ok(middle.lerp(*end, (t - 0.5) / 0.5))
            }
        }
        _ => Err(ChartError::InvalidData(format!(
            "gradient must have 2 or 3 stops, got {}",
            stops.len()
        ))),
    }
}

/// Gradient discretized into a fixed number of levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    levels: Vec<Color>,
}

impl ColorScale {
    pub fn from_stops(stops: &[Color], level_count: u32) -> ChartResult<Self> {
        if level_count == 0 {
            return Err(ChartError::InvalidData(
                "color scale needs at least one level".to_owned(),
            ));
        }
        let last = f64::from(level_count.saturating_sub(1).max(1));
        let levels = (0..level_count)
            .map(|level| interpolate_stops(stops, f64::from(level) / last))
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self { levels })
    }

    #[must_use]
    pub fn levels(&self) -> &[Color] {
        &self.levels
    }

    /// Color of the band containing normalized position `t`.
    #[must_use]
    pub fn sample(&self, t: f64) -> Color {
        let count = self.levels.len();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let index = ((t * count as f64).floor() as usize).min(count - 1);
        self.levels[index]
    }

    /// Color of `value` within `range`; a degenerate range maps to the first band.
    #[must_use]
    pub fn color_for(&self, value: f64, range: (f64, f64)) -> Color {
        let span = range.1 - range.0;
        if span == 0.0 || !span.is_finite() {
            return self.sample(0.0);
        }
        self.sample((value - range.0) / span)
    }
}

/// Color reference that a back end can always resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorRef {
    Rgb { color: Color },
    /// Position in a native colormap, resolved by the back end.
    Native { palette: String, position: f64 },
}

impl ColorRef {
    #[must_use]
    pub fn rgb(color: Color) -> Self {
        Self::Rgb { color }
    }
}

/// Samples a named palette at a normalized position.
pub fn sample_palette(name: &str, position: f64) -> ChartResult<ColorRef> {
    match resolve_palette(name)? {
        PaletteSource::Gradient { stops } => Ok(ColorRef::rgb(interpolate_stops(&stops, position)?)),
        PaletteSource::Native { name } => Ok(ColorRef::Native {
            palette: name,
            position: position.clamp(0.0, 1.0),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteRequest {
    pub variable_code: String,
    pub is_delta: bool,
    pub value_min: f64,
    pub value_max: f64,
    pub discrete: bool,
    /// Overrides the 10/256 default cluster base.
    pub cluster_base: Option<u32>,
}

impl PaletteRequest {
    #[must_use]
    pub fn new(variable_code: impl Into<String>, value_min: f64, value_max: f64) -> Self {
        Self {
            variable_code: variable_code.into(),
            is_delta: false,
            value_min,
            value_max,
            discrete: false,
            cluster_base: None,
        }
    }

    #[must_use]
    pub fn with_delta(mut self, is_delta: bool) -> Self {
        self.is_delta = is_delta;
        self
    }

    #[must_use]
    pub fn with_discrete(mut self, discrete: bool) -> Self {
        self.discrete = discrete;
        self
    }

    #[must_use]
    pub fn with_cluster_base(mut self, cluster_base: u32) -> Self {
        self.cluster_base = Some(cluster_base);
        self
    }

    fn resolved_cluster_base(&self) -> u32 {
        self.cluster_base.unwrap_or(if self.discrete {
            DISCRETE_CLUSTER_BASE
        } else {
            CONTINUOUS_CLUSTER_BASE
        })
    }
}

/// Fully resolved color scale for one figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteSpec {
    pub name: String,
    pub family: PaletteFamily,
    pub sign_index: SignIndex,
    pub source: PaletteSource,
    pub cluster_count: u32,
    /// Discretized levels; only present for built-in gradients.
    pub scale: Option<ColorScale>,
    pub value_range: (f64, f64),
    pub ticks: Option<Vec<f64>>,
    pub tick_labels: Vec<String>,
}

impl PaletteSpec {
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        self.ticks.is_some()
    }
}

/// Selects and synthesizes the palette for a variable and value range.
pub fn select_palette(request: &PaletteRequest, tables: &PaletteTables) -> ChartResult<PaletteSpec> {
    let (min, max) = (request.value_min, request.value_max);
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ChartError::InvalidData(format!(
            "palette value range must be finite and ordered, got [{min}, {max}]"
        )));
    }
    let cluster_base = request.resolved_cluster_base();
    if cluster_base == 0 || cluster_base > MAX_CLUSTER_BASE {
        return Err(ChartError::InvalidData(format!(
            "palette cluster base must be in 1..={MAX_CLUSTER_BASE}, got {cluster_base}"
        )));
    }

    let family = classify_variable(&request.variable_code);
    if family == PaletteFamily::Default {
        debug!(
            variable = %request.variable_code,
            "no palette family for variable, using default table"
        );
    }
    let sign_index = SignIndex::resolve(family, request.is_delta, min, max);
    let name = tables.name(family, sign_index).to_owned();

    let straddling = straddles_zero(min, max);
    let cluster_count = if straddling {
        cluster_base.checked_mul(2).ok_or_else(|| {
            ChartError::InvalidData(format!("cluster count overflows for base {cluster_base}"))
        })?
    } else {
        cluster_base
    };
    let mut value_range = if straddling {
        let max_abs = min.abs().max(max.abs());
        (-max_abs, max_abs)
    } else {
        (min, max)
    };

    let (ticks, tick_labels) = if request.discrete {
        let ticks = uniform_ticks(value_range, cluster_count);
        let labels = precision::adjust(&ticks, DEFAULT_MAX_DECIMALS).formatted;
        value_range = (ticks[0], ticks[ticks.len() - 1]);
        (Some(ticks), labels)
    } else {
        (None, Vec::new())
    };

    let source = resolve_palette(&name)?;
    let scale = match &source {
        PaletteSource::Gradient { stops } => Some(ColorScale::from_stops(stops, cluster_count)?),
        PaletteSource::Native { .. } => None,
    };

    trace!(
        variable = %request.variable_code,
        ?family,
        ?sign_index,
        palette = %name,
        cluster_count,
        "palette selected"
    );

    Ok(PaletteSpec {
        name,
        family,
        sign_index,
        source,
        cluster_count,
        scale,
        value_range,
        ticks,
        tick_labels,
    })
}

/// `count + 1` evenly spaced boundaries over `range`.
#[must_use]
pub fn uniform_ticks(range: (f64, f64), count: u32) -> Vec<f64> {
    let span = range.1 - range.0;
    (0..=count)
        .map(|i| f64::from(i) / f64::from(count) * span + range.0)
        .collect()
}
