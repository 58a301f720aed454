//! climate-chart: figure pipeline for climate-scenario dashboards.
//!
//! Wide scenario tables are reshaped into long-format series, colored with
//! palettes chosen from the physical variable being shown, labeled with
//! adaptive precision and handed to one of several interchangeable
//! rendering back ends through a single dispatch table.

pub mod api;
pub mod core;
pub mod error;
pub mod geo;
pub mod render;
pub mod telemetry;

pub use api::{FigureData, FigureKind, PlotContext, RenderDispatcher, ReshapeMode, reshape};
pub use error::{ChartError, ChartResult};
pub use render::{BackendKind, FigureBackend, FigureHandle};
