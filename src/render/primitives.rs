use serde::{Deserialize, Serialize};

use crate::core::color::Color;
use crate::core::geometry::LonLat;
use crate::core::palette::ColorRef;
use crate::error::{ChartError, ChartResult};

fn ensure_finite(values: &[f64], what: &str) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

/// Connected line through data-space points. Non-finite y values break the
/// line instead of being drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylinePrimitive {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub stroke_width: f64,
    pub color: Color,
}

impl PolylinePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        if self.x.len() != self.y.len() {
            return Err(ChartError::InvalidData(format!(
                "polyline `{}` has {} x values and {} y values",
                self.label,
                self.x.len(),
                self.y.len()
            )));
        }
        ensure_finite(&self.x, "polyline")?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Filled area between two curves sharing the same x values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPrimitive {
    pub x: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub color: Color,
}

impl BandPrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        if self.lower.len() != self.x.len() || self.upper.len() != self.x.len() {
            return Err(ChartError::InvalidData(
                "band bounds must match the x values".to_owned(),
            ));
        }
        ensure_finite(&self.x, "band")?;
        self.color.validate()
    }
}

/// Axis-aligned rectangle in data space, e.g. one heat-map cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: ColorRef,
}

impl RectPrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        ensure_finite(&[self.x, self.y, self.width, self.height], "rect")?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Closed outline, never filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlinePrimitive {
    pub points: Vec<LonLat>,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Circle,
    HollowCircle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPrimitive {
    pub x: f64,
    pub y: f64,
    pub shape: MarkerShape,
    pub color: ColorRef,
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: ColorRef,
    pub h_align: TextHAlign,
    pub italic: bool,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64, color: ColorRef) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            color,
            h_align: TextHAlign::Left,
            italic: false,
        }
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.y], "text")
    }
}

/// Five-number summary drawn as one box (whiskers at min/max, no fliers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPrimitive {
    pub label: String,
    pub position: f64,
    pub min: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub max: f64,
}

impl BoxPrimitive {
    /// Summary of `values`, ignoring NaN; `None` when nothing is left.
    #[must_use]
    pub fn from_values(label: impl Into<String>, position: f64, values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            label: label.into(),
            position,
            min: sorted[0],
            lower_quartile: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            upper_quartile: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    sorted[low] + (sorted[high] - sorted[low]) * (rank - low as f64)
}

/// Draw command in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "primitive", rename_all = "snake_case")]
pub enum Primitive {
    Polyline(PolylinePrimitive),
    Band(BandPrimitive),
    Rect(RectPrimitive),
    Outline(OutlinePrimitive),
    Marker(MarkerPrimitive),
    Text(TextPrimitive),
    Box(BoxPrimitive),
}

impl Primitive {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Polyline(line) => line.validate(),
            Self::Band(band) => band.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Outline(outline) => outline.color.validate(),
            Self::Marker(marker) => ensure_finite(&[marker.x, marker.y], "marker"),
            Self::Text(text) => text.validate(),
            Self::Box(_) => Ok(()),
        }
    }
}
