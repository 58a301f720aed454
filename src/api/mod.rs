pub mod boundary_adapter;
pub mod cluster_layout;
pub mod context;
pub mod cycle_reshaper;
pub mod figure_data;
pub mod line_weight;
pub mod map_builder;
pub mod plot_labels;
pub mod render_dispatcher;
pub mod series_reshaper;
pub mod stats_table;
pub mod taylor_diagram;

pub use boundary_adapter::{BoundaryAnnotation, LocationMarker, boundary, location_markers};
pub use cluster_layout::{
    ClusterAssignment, ClusterPlot, ClusterPoint, ClusterTable, ClusterTableRow, cluster_plot,
    cluster_table,
};
pub use context::{
    MapLocation, MapStatistic, Platform, PlotContext, SimulationInfo, Variable, View,
};
pub use cycle_reshaper::{DailyCycle, MonthlyCycle, MonthlyRow, daily_cycle, monthly_cycle};
pub use figure_data::{FigureData, FigureKind};
pub use line_weight::{LineWeight, LineWeights, line_weights};
pub use map_builder::{HeatMap, heat_map};
pub use plot_labels::{plot_code, plot_title, value_axis_label};
pub use render_dispatcher::{RenderDispatcher, resolve_backend};
pub use series_reshaper::{ReshapeMode, ReshapedSeries, SeriesBundle, SeriesValues, reshape};
pub use stats_table::{StatKind, StatRecord, StatsRow, StatsTable, stats_table};
pub use taylor_diagram::{TaylorDiagram, TaylorRow, taylor_diagram};
