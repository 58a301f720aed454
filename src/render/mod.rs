mod chart_grammar_backend;
mod interactive_backend;
mod null_backend;
mod primitives;
mod raster_backend;
mod raster_frame;

pub use chart_grammar_backend::ChartGrammarBackend;
pub use interactive_backend::InteractiveBackend;
pub use null_backend::NullBackend;
pub use primitives::{
    BandPrimitive, BoxPrimitive, MarkerPrimitive, MarkerShape, OutlinePrimitive, Primitive,
    PolylinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use raster_backend::RasterBackend;
pub use raster_frame::{FigureSize, RasterFigure};

use serde::{Deserialize, Serialize};

use crate::api::{FigureData, FigureKind, PlotContext};
use crate::error::ChartResult;

/// Family of rendering library a figure is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Declarative grammar-of-graphics spec.
    ChartGrammar,
    /// Interactive overlay with hover tooltips.
    Interactive,
    /// Static raster figure.
    Raster,
}

impl BackendKind {
    pub const ALL: [Self; 3] = [Self::ChartGrammar, Self::Interactive, Self::Raster];
}

/// Figure produced by a back end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", content = "figure", rename_all = "snake_case")]
pub enum FigureHandle {
    ChartGrammar(serde_json::Value),
    Interactive(serde_json::Value),
    Raster(RasterFigure),
}

impl FigureHandle {
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        match self {
            Self::ChartGrammar(_) => BackendKind::ChartGrammar,
            Self::Interactive(_) => BackendKind::Interactive,
            Self::Raster(_) => BackendKind::Raster,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::ChartGrammar(spec) | Self::Interactive(spec) => Some(spec),
            Self::Raster(_) => None,
        }
    }

    #[must_use]
    pub fn as_raster(&self) -> Option<&RasterFigure> {
        match self {
            Self::Raster(figure) => Some(figure),
            Self::ChartGrammar(_) | Self::Interactive(_) => None,
        }
    }
}

/// Contract implemented by any rendering back end.
///
/// Back ends receive already reshaped data and already synthesized palettes,
/// so every one of them draws from the same figure contract.
pub trait FigureBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn supports(&self, figure: FigureKind) -> bool;

    fn render(&self, figure: &FigureData, context: &PlotContext) -> ChartResult<FigureHandle>;
}
