use serde_json::{Value, json};
use tracing::trace;

use crate::api::cluster_layout::{ClusterPlot, ClusterTable};
use crate::api::context::PlotContext;
use crate::api::cycle_reshaper::{DailyCycle, MonthlyCycle};
use crate::api::map_builder::HeatMap;
use crate::api::plot_labels::{plot_code, plot_title, value_axis_label};
use crate::api::series_reshaper::{SeriesBundle, SeriesValues};
use crate::api::stats_table::StatsTable;
use crate::api::{FigureData, FigureKind};
use crate::core::color::Color;
use crate::core::palette::{ColorRef, PaletteSource};
use crate::error::{ChartError, ChartResult};
use crate::render::{BackendKind, FigureBackend, FigureHandle};

const AREA_ALPHA: f64 = 0.3;
const CURVE_ALPHA: f64 = 0.7;
const TABLE_WIDTH: u32 = 700;
const TABLE_HEIGHT: u32 = 210;
const CLUSTER_TABLE_HEADER_HEIGHT: usize = 50;
const CLUSTER_TABLE_ROW_HEIGHT: usize = 23;

/// Interactive overlays with hover tooltips; every kind but diagrams.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveBackend;

pub(crate) fn color_json(color: &ColorRef) -> Value {
    match color {
        ColorRef::Rgb { color } => json!(color.to_hex()),
        ColorRef::Native { palette, position } => json!({ "palette": palette, "position": position }),
    }
}

fn titles(context: &PlotContext) -> Value {
    json!([plot_title(context), plot_code(context)])
}

impl InteractiveBackend {
    fn time_series(bundle: &SeriesBundle, context: &PlotContext) -> Value {
        let mut elements = Vec::new();
        for series in &bundle.series {
            if let SeriesValues::Envelope { min, max, .. } = &series.values {
                elements.push(json!({
                    "element": "area",
                    "label": series.label,
                    "x": series.time,
                    "lower": min,
                    "upper": max,
                    "color": series.color.to_hex(),
                    "alpha": AREA_ALPHA,
                }));
            }
        }
        for series in &bundle.series {
            for (name, values) in series.curves() {
                elements.push(json!({
                    "element": "curve",
                    "label": name,
                    "group": series.label,
                    "x": series.time,
                    "y": values,
                    "color": series.color.to_hex(),
                    "line_width": series.weight.width(),
                    "hover": [bundle.time_key, "value"],
                }));
            }
        }
        json!({
            "type": "overlay",
            "title": titles(context),
            "x_label": bundle.time_key,
            "y_label": value_axis_label(context),
            "x_range": [bundle.time_range.0, bundle.time_range.1],
            "y_range": [bundle.value_range.0, bundle.value_range.1],
            "legend": { "position": "top_left", "click_policy": "hide" },
            "elements": elements,
        })
    }

    fn table(table: &StatsTable, context: &PlotContext) -> Value {
        let mut header = vec!["Statistic".to_owned()];
        header.extend(table.columns.iter().cloned());
        let cells: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.statistic.clone())
                    .chain(row.cells.iter().cloned())
                    .collect()
            })
            .collect();
        json!({
            "type": "table",
            "title": titles(context),
            "header": header,
            "cells": cells,
            "align": "right",
            "width": TABLE_WIDTH,
            "height": TABLE_HEIGHT,
        })
    }

    fn map(map: &HeatMap, context: &PlotContext) -> Value {
        let colormap = match (&map.palette.source, &map.palette.scale) {
            (PaletteSource::Gradient { .. }, Some(scale)) => json!({
                "levels": scale.levels().iter().map(|c| c.to_hex()).collect::<Vec<_>>(),
            }),
            _ => json!({ "name": map.palette.name, "levels": map.palette.cluster_count }),
        };
        json!({
            "type": "quadmesh",
            "title": titles(context),
            "x": map.grid.longitudes,
            "y": map.grid.latitudes,
            "z": map.grid.values,
            "colormap": colormap,
            "clim": [map.palette.value_range.0, map.palette.value_range.1],
            "colorbar": {
                "label": value_axis_label(context),
                "ticks": map.palette.ticks,
                "tick_labels": map.palette.tick_labels,
            },
            "extent": map.extent,
            "boundary": map.boundary,
            "locations": map.locations,
            "hover": ["longitude", "latitude", "value"],
        })
    }

    fn monthly_cycle(cycle: &MonthlyCycle, context: &PlotContext) -> Value {
        json!({
            "type": "box",
            "title": titles(context),
            "by": "month",
            "y_label": value_axis_label(context),
            "box_fill_color": Color::WHITE.to_hex(),
            "rows": cycle.rows,
            "hover": ["month", "value"],
        })
    }

    fn daily_cycle(cycle: &DailyCycle, context: &PlotContext) -> Value {
        json!({
            "type": "overlay",
            "title": titles(context),
            "x_label": "day",
            "y_label": value_axis_label(context),
            "elements": [
                {
                    "element": "area",
                    "x": cycle.day,
                    "lower": cycle.min,
                    "upper": cycle.max,
                    "color": Color::DARK_GREY.to_hex(),
                    "alpha": AREA_ALPHA,
                },
                {
                    "element": "curve",
                    "x": cycle.day,
                    "y": cycle.mean,
                    "color": Color::BLACK.to_hex(),
                    "alpha": CURVE_ALPHA,
                    "hover": ["day", "min", "mean", "max"],
                },
            ],
        })
    }

    fn cluster_table(table: &ClusterTable) -> Value {
        let rows: Vec<Value> = table
            .rows
            .iter()
            .map(|row| {
                json!({
                    "cells": [row.simulation, row.scenario, row.group],
                    "font_color": color_json(&row.color),
                })
            })
            .collect();
        json!({
            "type": "table",
            "title": format!("Simulation clusters = f({})", table.variables.join(", ")),
            "header": ["Simulation", "Scenario", "Group"],
            "rows": rows,
            "align": "right",
            "width": TABLE_WIDTH,
            "height": CLUSTER_TABLE_HEADER_HEIGHT + CLUSTER_TABLE_ROW_HEIGHT * table.rows.len(),
        })
    }

    fn cluster_plot(plot: &ClusterPlot) -> Value {
        let (x_label, y_label) = plot.axis_labels();
        let points: Vec<Value> = plot
            .points
            .iter()
            .map(|point| {
                json!({
                    "simulation": point.simulation,
                    "group": point.group,
                    "x": point.x,
                    "y": point.y,
                    "color": color_json(&point.color),
                    "legend": { "x": point.legend_x, "y": point.legend_y, "text": point.group.to_string() },
                })
            })
            .collect();
        json!({
            "type": "scatter",
            "title": format!("Simulation clusters = f({}, {})", plot.x_variable.code, plot.y_variable.code),
            "x_label": x_label,
            "y_label": y_label,
            "legend_anchor": [plot.legend_anchor.0, plot.legend_anchor.1],
            "points": points,
            "hover": ["simulation", "group"],
        })
    }
}

impl FigureBackend for InteractiveBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Interactive
    }

    fn supports(&self, figure: FigureKind) -> bool {
        figure != FigureKind::Diagram
    }

    fn render(&self, figure: &FigureData, context: &PlotContext) -> ChartResult<FigureHandle> {
        let spec = match figure {
            FigureData::TimeSeries(bundle) => Self::time_series(bundle, context),
            FigureData::Table(table) => Self::table(table, context),
            FigureData::Map(map) => Self::map(map, context),
            FigureData::MonthlyCycle(cycle) => Self::monthly_cycle(cycle, context),
            FigureData::DailyCycle(cycle) => Self::daily_cycle(cycle, context),
            FigureData::ClusterTable(table) => Self::cluster_table(table),
            FigureData::ClusterPlot(plot) => Self::cluster_plot(plot),
            FigureData::Diagram(_) => {
                return Err(ChartError::UnsupportedFigure {
                    kind: FigureKind::Diagram,
                    backend: BackendKind::Interactive,
                });
            }
        };
        trace!(kind = ?figure.kind(), "interactive overlay built");
        Ok(FigureHandle::Interactive(spec))
    }
}
