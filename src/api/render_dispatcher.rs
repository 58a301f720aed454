use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::api::context::PlotContext;
use crate::api::figure_data::{FigureData, FigureKind};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    BackendKind, ChartGrammarBackend, FigureBackend, FigureHandle, InteractiveBackend,
    RasterBackend,
};

/// Effective back end for a figure kind given the requested one.
///
/// | kind          | chart-grammar | interactive | raster      |
/// |---------------|---------------|-------------|-------------|
/// | time-series   | chart-grammar | interactive | raster      |
/// | table         | interactive   | interactive | interactive |
/// | map           | raster        | interactive | raster      |
/// | monthly-cycle | raster        | interactive | raster      |
/// | daily-cycle   | raster        | interactive | raster      |
/// | cluster-table | interactive   | interactive | interactive |
/// | cluster-plot  | interactive   | interactive | raster      |
/// | diagram       | raster        | raster      | raster      |
#[must_use]
pub const fn resolve_backend(kind: FigureKind, requested: BackendKind) -> BackendKind {
    use BackendKind::{ChartGrammar, Interactive, Raster};
    match (kind, requested) {
        (FigureKind::TimeSeries, requested) => requested,
        (FigureKind::Table | FigureKind::ClusterTable, _) => Interactive,
        (
            FigureKind::Map | FigureKind::MonthlyCycle | FigureKind::DailyCycle,
            ChartGrammar | Raster,
        ) => Raster,
        (FigureKind::Map | FigureKind::MonthlyCycle | FigureKind::DailyCycle, Interactive) => {
            Interactive
        }
        (FigureKind::ClusterPlot, ChartGrammar | Interactive) => Interactive,
        (FigureKind::ClusterPlot, Raster) => Raster,
        (FigureKind::Diagram, _) => Raster,
    }
}

/// Routes figure data to one back-end strategy per call.
pub struct RenderDispatcher {
    backends: IndexMap<BackendKind, Box<dyn FigureBackend>>,
}

impl Default for RenderDispatcher {
    fn default() -> Self {
        Self::empty()
            .with_backend(Box::new(ChartGrammarBackend))
            .with_backend(Box::new(InteractiveBackend))
            .with_backend(Box::new(RasterBackend))
    }
}

impl fmt::Debug for RenderDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderDispatcher")
            .field("backends", &self.backends.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RenderDispatcher {
    /// Dispatcher with the built-in back ends.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher without any back end.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            backends: IndexMap::new(),
        }
    }

    /// Registers a back end, replacing the one of the same kind.
    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn FigureBackend>) -> Self {
        self.backends.insert(backend.kind(), backend);
        self
    }

    pub fn render(&self, figure: &FigureData, context: &PlotContext) -> ChartResult<FigureHandle> {
        let kind = figure.kind();
        let effective = resolve_backend(kind, context.backend);
        if effective != context.backend {
            debug!(
                ?kind,
                requested = ?context.backend,
                effective = ?effective,
                "back end substituted for figure kind"
            );
        }

        let backend = self
            .backends
            .get(&effective)
            .filter(|backend| backend.supports(kind))
            .ok_or(ChartError::UnsupportedFigure {
                kind,
                backend: effective,
            })?;

        trace!(?kind, backend = ?effective, "dispatching figure");
        backend.render(figure, context)
    }

    /// Renders independent figures on the rayon pool; results keep the input order.
    #[cfg(feature = "parallel-render")]
    pub fn render_batch(
        &self,
        figures: &[FigureData],
        context: &PlotContext,
    ) -> Vec<ChartResult<FigureHandle>> {
        use rayon::prelude::*;

        figures
            .par_iter()
            .map(|figure| self.render(figure, context))
            .collect()
    }
}
