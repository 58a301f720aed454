use serde_json::{Value, json};
use tracing::trace;

use crate::api::context::{Platform, PlotContext};
use crate::api::plot_labels::{plot_code, plot_title, value_axis_label};
use crate::api::series_reshaper::{ReshapedSeries, SeriesBundle, SeriesValues};
use crate::api::{FigureData, FigureKind};
use crate::error::{ChartError, ChartResult};
use crate::render::{BackendKind, FigureBackend, FigureHandle};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const WIDTH: u32 = 650;
const HEIGHT: u32 = 300;
const STREAMLIT_HEIGHT: u32 = 362;
const AREA_OPACITY: f64 = 0.3;
const SCENARIO_FIELD: &str = "scenario";

/// Declarative grammar-of-graphics spec; supports time series only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartGrammarBackend;

impl ChartGrammarBackend {
    fn time_series(bundle: &SeriesBundle, context: &PlotContext) -> Value {
        let x_field = bundle.time_key.as_str();
        let y_scale = json!({ "domain": [bundle.value_range.0, bundle.value_range.1] });
        let color = json!({
            "field": SCENARIO_FIELD,
            "type": "nominal",
            "scale": {
                "domain": bundle.series.iter().map(|s| s.label.clone()).collect::<Vec<_>>(),
                "range": bundle.series.iter().map(|s| s.color.to_hex()).collect::<Vec<_>>(),
            },
            "legend": { "title": "", "orient": "top-left", "direction": "horizontal", "symbolType": "stroke" },
        });
        let x = json!({ "field": x_field, "type": "quantitative", "axis": { "format": "d" } });

        let mut layers = Vec::new();
        for series in bundle.series.iter().filter(|series| series.area) {
            if let SeriesValues::Envelope { min, max, .. } = &series.values {
                let values: Vec<Value> = series
                    .time
                    .iter()
                    .zip(min.iter().zip(max))
                    .map(|(t, (lower, upper))| {
                        json!({ x_field: t, SCENARIO_FIELD: series.label, "min": lower, "max": upper })
                    })
                    .collect();
                layers.push(json!({
                    "data": { "values": values },
                    "mark": { "type": "area", "opacity": AREA_OPACITY },
                    "encoding": {
                        "x": x,
                        "y": { "field": "min", "type": "quantitative", "scale": y_scale },
                        "y2": { "field": "max" },
                        "color": color,
                    },
                }));
            }
        }

        for series in &bundle.series {
            layers.extend(Self::curve_layers(series, x_field, &x, &y_scale, &color));
        }

        let height = if context.platform == Platform::Streamlit {
            STREAMLIT_HEIGHT
        } else {
            HEIGHT
        };

        json!({
            "$schema": SCHEMA,
            "title": { "text": [plot_title(context), plot_code(context)], "anchor": "start", "offset": 0 },
            "width": WIDTH,
            "height": height,
            "layer": layers,
            "config": { "axis": { "grid": false } },
            "axis_labels": { "x": x_field, "y": value_axis_label(context) },
        })
    }

    fn curve_layers(
        series: &ReshapedSeries,
        x_field: &str,
        x: &Value,
        y_scale: &Value,
        color: &Value,
    ) -> Vec<Value> {
        series
            .curves()
            .into_iter()
            .map(|(name, values)| {
                let rows: Vec<Value> = series
                    .time
                    .iter()
                    .zip(values)
                    .map(|(t, value)| json!({ x_field: t, SCENARIO_FIELD: series.label, "value": value, "curve": name }))
                    .collect();
                json!({
                    "data": { "values": rows },
                    "mark": { "type": "line", "size": series.weight.width(), "color": series.color.to_hex() },
                    "encoding": {
                        "x": x,
                        "y": { "field": "value", "type": "quantitative", "scale": y_scale },
                        "color": color,
                        "tooltip": [x_field, SCENARIO_FIELD, "value"],
                    },
                })
            })
            .collect()
    }
}

impl FigureBackend for ChartGrammarBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ChartGrammar
    }

    fn supports(&self, figure: FigureKind) -> bool {
        figure == FigureKind::TimeSeries
    }

    fn render(&self, figure: &FigureData, context: &PlotContext) -> ChartResult<FigureHandle> {
        match figure {
            FigureData::TimeSeries(bundle) => {
                let spec = Self::time_series(bundle, context);
                trace!(series = bundle.series.len(), "chart-grammar spec built");
                Ok(FigureHandle::ChartGrammar(spec))
            }
            other => Err(ChartError::UnsupportedFigure {
                kind: other.kind(),
                backend: BackendKind::ChartGrammar,
            }),
        }
    }
}
