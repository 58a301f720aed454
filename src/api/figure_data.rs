use serde::{Deserialize, Serialize};

use crate::api::cluster_layout::{ClusterPlot, ClusterTable};
use crate::api::cycle_reshaper::{DailyCycle, MonthlyCycle};
use crate::api::map_builder::HeatMap;
use crate::api::series_reshaper::SeriesBundle;
use crate::api::stats_table::StatsTable;
use crate::api::taylor_diagram::TaylorDiagram;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    TimeSeries,
    Table,
    Map,
    MonthlyCycle,
    DailyCycle,
    ClusterTable,
    ClusterPlot,
    Diagram,
}

impl FigureKind {
    pub const ALL: [Self; 8] = [
        Self::TimeSeries,
        Self::Table,
        Self::Map,
        Self::MonthlyCycle,
        Self::DailyCycle,
        Self::ClusterTable,
        Self::ClusterPlot,
        Self::Diagram,
    ];
}

/// Data handed to a back end, one variant per figure kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum FigureData {
    TimeSeries(SeriesBundle),
    Table(StatsTable),
    Map(HeatMap),
    MonthlyCycle(MonthlyCycle),
    DailyCycle(DailyCycle),
    ClusterTable(ClusterTable),
    ClusterPlot(ClusterPlot),
    Diagram(TaylorDiagram),
}

impl FigureData {
    #[must_use]
    pub fn kind(&self) -> FigureKind {
        match self {
            Self::TimeSeries(_) => FigureKind::TimeSeries,
            Self::Table(_) => FigureKind::Table,
            Self::Map(_) => FigureKind::Map,
            Self::MonthlyCycle(_) => FigureKind::MonthlyCycle,
            Self::DailyCycle(_) => FigureKind::DailyCycle,
            Self::ClusterTable(_) => FigureKind::ClusterTable,
            Self::ClusterPlot(_) => FigureKind::ClusterPlot,
            Self::Diagram(_) => FigureKind::Diagram,
        }
    }
}
