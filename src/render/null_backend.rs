use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use crate::api::{FigureData, FigureKind, PlotContext};
use crate::error::ChartResult;
use crate::render::{BackendKind, FigureBackend, FigureHandle, FigureSize, RasterFigure};

/// Back end that draws nothing, used by tests and headless pipelines.
///
/// It answers for any back-end kind and accepts every figure kind, returning
/// an empty handle of its kind and counting the calls.
#[derive(Debug)]
pub struct NullBackend {
    kind: BackendKind,
    render_count: AtomicUsize,
}

impl NullBackend {
    #[must_use]
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            render_count: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count.load(Ordering::Relaxed)
    }
}

impl FigureBackend for NullBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn supports(&self, _figure: FigureKind) -> bool {
        true
    }

    fn render(&self, figure: &FigureData, _context: &PlotContext) -> ChartResult<FigureHandle> {
        self.render_count.fetch_add(1, Ordering::Relaxed);
        let summary = json!({ "kind": figure.kind() });
        Ok(match self.kind {
            BackendKind::ChartGrammar => FigureHandle::ChartGrammar(summary),
            BackendKind::Interactive => FigureHandle::Interactive(summary),
            BackendKind::Raster => FigureHandle::Raster(RasterFigure::new(FigureSize::new(1.0, 1.0))),
        })
    }
}
