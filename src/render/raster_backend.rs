use std::f64::consts::PI;

use tracing::{trace, warn};

use crate::api::boundary_adapter::LocationMarker;
use crate::api::cluster_layout::ClusterPlot;
use crate::api::context::{Platform, PlotContext};
use crate::api::cycle_reshaper::{DailyCycle, MonthlyCycle};
use crate::api::map_builder::HeatMap;
use crate::api::plot_labels::{plot_code, plot_title, value_axis_label};
use crate::api::series_reshaper::{SeriesBundle, SeriesValues};
use crate::api::taylor_diagram::TaylorDiagram;
use crate::api::{FigureData, FigureKind};
use crate::core::color::Color;
use crate::core::geometry::SINGLE_CELL_SPREAD;
use crate::core::palette::{ColorRef, PaletteSpec};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    BackendKind, BandPrimitive, BoxPrimitive, FigureBackend, FigureHandle, FigureSize,
    MarkerPrimitive, MarkerShape, OutlinePrimitive, PolylinePrimitive, Primitive, RasterFigure,
    RectPrimitive, TextPrimitive,
};

const AREA_ALPHA: f64 = 0.3;
const ARC_SEGMENTS: u32 = 64;

fn figure_size(kind: FigureKind, platform: Platform) -> FigureSize {
    let streamlit = platform == Platform::Streamlit;
    match kind {
        FigureKind::Map if streamlit => FigureSize::new(9.0, 4.45),
        FigureKind::Map => FigureSize::new(10.0, 7.5),
        FigureKind::MonthlyCycle | FigureKind::DailyCycle => {
            FigureSize::new(9.95, if streamlit { 5.45 } else { 5.15 })
        }
        _ if streamlit => FigureSize::new(9.0, 4.4),
        _ => FigureSize::new(10.6, 4.8),
    }
}

/// Static figures as data-space primitive lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterBackend;

impl RasterBackend {
    fn base(kind: FigureKind, context: &PlotContext) -> RasterFigure {
        RasterFigure::new(figure_size(kind, context.platform))
            .with_titles(plot_title(context), plot_code(context))
    }

    fn time_series(bundle: &SeriesBundle, context: &PlotContext) -> RasterFigure {
        let mut figure = Self::base(FigureKind::TimeSeries, context)
            .with_axis_labels(bundle.time_key.clone(), value_axis_label(context))
            .with_x_range(bundle.time_range)
            .with_y_range(bundle.value_range);

        for series in bundle.series.iter().filter(|series| series.area) {
            if let SeriesValues::Envelope { min, max, .. } = &series.values {
                figure.push(Primitive::Band(BandPrimitive {
                    x: series.time.clone(),
                    lower: min.clone(),
                    upper: max.clone(),
                    color: series.color.with_alpha(AREA_ALPHA),
                }));
            }
        }
        for series in &bundle.series {
            for (label, values) in series.curves() {
                figure.push(Primitive::Polyline(PolylinePrimitive {
                    label: label.to_owned(),
                    x: series.time.clone(),
                    y: values.to_vec(),
                    stroke_width: series.weight.width(),
                    color: series.color,
                }));
            }
        }
        figure
    }

    fn cell_fill(palette: &PaletteSpec, value: f64) -> ColorRef {
        let (min, max) = palette.value_range;
        match &palette.scale {
            Some(scale) => ColorRef::rgb(scale.color_for(value, palette.value_range)),
            None => {
                let span = max - min;
                let position = if span > 0.0 { (value - min) / span } else { 0.0 };
                ColorRef::Native {
                    palette: palette.name.clone(),
                    position: position.clamp(0.0, 1.0),
                }
            }
        }
    }

    fn map(map: &HeatMap, context: &PlotContext) -> RasterFigure {
        let mut figure = Self::base(FigureKind::Map, context)
            .with_axis_labels("longitude", "latitude")
            .with_x_range((map.extent.x_min, map.extent.x_max))
            .with_y_range((map.extent.y_min, map.extent.y_max));

        let width = grid_step(&map.grid.longitudes);
        let height = grid_step(&map.grid.latitudes);
        for (row, latitude) in map.grid.latitudes.iter().enumerate() {
            for (column, longitude) in map.grid.longitudes.iter().enumerate() {
                let value = map.grid.values[row][column];
                if value.is_nan() {
                    continue;
                }
                figure.push(Primitive::Rect(RectPrimitive {
                    x: longitude - width / 2.0,
                    y: latitude - height / 2.0,
                    width,
                    height,
                    fill: Self::cell_fill(&map.palette, value),
                }));
            }
        }

        if let Some(boundary) = &map.boundary {
            for ring in &boundary.rings {
                figure.push(Primitive::Outline(OutlinePrimitive {
                    points: ring.clone(),
                    color: boundary.edge_color,
                }));
            }
        }
        push_locations(&mut figure, &map.locations);
        figure
    }

    fn monthly_cycle(cycle: &MonthlyCycle, context: &PlotContext) -> RasterFigure {
        let mut figure = Self::base(FigureKind::MonthlyCycle, context)
            .with_axis_labels("month", value_axis_label(context));
        for (index, (label, values)) in cycle.by_month().into_iter().enumerate() {
            match BoxPrimitive::from_values(label.clone(), (index + 1) as f64, &values) {
                Some(summary) => figure.push(Primitive::Box(summary)),
                None => warn!(month = %label, "month has no values, box omitted"),
            }
        }
        figure
    }

    fn daily_cycle(cycle: &DailyCycle, context: &PlotContext) -> RasterFigure {
        let mut figure = Self::base(FigureKind::DailyCycle, context)
            .with_axis_labels("day", value_axis_label(context))
            .with_primitive(Primitive::Band(BandPrimitive {
                x: cycle.day.clone(),
                lower: cycle.min.clone(),
                upper: cycle.max.clone(),
                color: Color::DARK_GREY,
            }))
            .with_primitive(Primitive::Polyline(PolylinePrimitive {
                label: "mean".to_owned(),
                x: cycle.day.clone(),
                y: cycle.mean.clone(),
                stroke_width: 1.0,
                color: Color::BLACK,
            }));
        if let (Some(first), Some(last)) = (cycle.day.first(), cycle.day.last()) {
            figure = figure.with_x_range((*first, *last));
        }
        figure
    }

    fn cluster_plot(plot: &ClusterPlot, context: &PlotContext) -> RasterFigure {
        let (x_label, y_label) = plot.axis_labels();
        let mut figure = Self::base(FigureKind::ClusterPlot, context)
            .with_titles(
                format!(
                    "Simulation clusters = f({}, {})",
                    plot.x_variable.code, plot.y_variable.code
                ),
                String::new(),
            )
            .with_axis_labels(x_label, y_label);
        for point in &plot.points {
            figure.push(Primitive::Marker(MarkerPrimitive {
                x: point.x,
                y: point.y,
                shape: MarkerShape::Circle,
                color: point.color.clone(),
            }));
            figure.push(Primitive::Text(TextPrimitive::new(
                point.group.to_string(),
                point.legend_x,
                point.legend_y,
                point.color.clone(),
            )));
        }
        figure
    }

    fn diagram(diagram: &TaylorDiagram, context: &PlotContext) -> RasterFigure {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let mut figure = RasterFigure::new(FigureSize::new(diagram.width, diagram.height))
            .with_titles(plot_title(context), plot_code(context))
            .with_axis_labels("standard deviation", "standard deviation");

        let reference_sd = diagram
            .rows
            .first()
            .map_or(0.0, |row| row.standard_deviation);
        for tick in diagram.rms_ticks.iter().filter(|tick| **tick > 0.0) {
            let (x, y): (Vec<f64>, Vec<f64>) = (0..=ARC_SEGMENTS)
                .map(|step| {
                    let angle = PI * f64::from(step) / f64::from(ARC_SEGMENTS);
                    (reference_sd + tick * angle.cos(), tick * angle.sin())
                })
                .unzip();
            figure.push(Primitive::Polyline(PolylinePrimitive {
                label: format!("rmsd {tick}"),
                x,
                y,
                stroke_width: 1.0,
                color: Color::DARK_GREY,
            }));
        }

        for row in &diagram.rows {
            let angle = row.correlation.clamp(-1.0, 1.0).acos();
            let x = row.standard_deviation * angle.cos();
            let y = row.standard_deviation * angle.sin();
            figure.push(Primitive::Marker(MarkerPrimitive {
                x,
                y,
                shape: MarkerShape::Circle,
                color: ColorRef::rgb(red),
            }));
            figure.push(Primitive::Text(TextPrimitive::new(
                row.simulation.clone(),
                x,
                y,
                ColorRef::rgb(red),
            )));
        }
        figure
    }
}

fn push_locations(figure: &mut RasterFigure, locations: &[LocationMarker]) {
    for location in locations {
        figure.push(Primitive::Marker(MarkerPrimitive {
            x: location.position.longitude,
            y: location.position.latitude,
            shape: MarkerShape::HollowCircle,
            color: ColorRef::rgb(Color::BLACK),
        }));
        figure.push(Primitive::Text(
            TextPrimitive::new(
                location.name.clone(),
                location.label_position.longitude,
                location.label_position.latitude,
                ColorRef::rgb(Color::BLACK),
            )
            .italic(),
        ));
    }
}

/// Smallest spacing between sorted grid coordinates.
fn grid_step(coordinates: &[f64]) -> f64 {
    coordinates
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|step| *step > 0.0)
        .fold(None, |smallest: Option<f64>, step| {
            Some(smallest.map_or(step, |s| s.min(step)))
        })
        .unwrap_or(SINGLE_CELL_SPREAD)
}

impl FigureBackend for RasterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Raster
    }

    fn supports(&self, figure: FigureKind) -> bool {
        !matches!(figure, FigureKind::Table | FigureKind::ClusterTable)
    }

    fn render(&self, figure: &FigureData, context: &PlotContext) -> ChartResult<FigureHandle> {
        let raster = match figure {
            FigureData::TimeSeries(bundle) => Self::time_series(bundle, context),
            FigureData::Map(map) => Self::map(map, context),
            FigureData::MonthlyCycle(cycle) => Self::monthly_cycle(cycle, context),
            FigureData::DailyCycle(cycle) => Self::daily_cycle(cycle, context),
            FigureData::ClusterPlot(plot) => Self::cluster_plot(plot, context),
            FigureData::Diagram(diagram) => Self::diagram(diagram, context),
            FigureData::Table(_) | FigureData::ClusterTable(_) => {
                return Err(ChartError::UnsupportedFigure {
                    kind: figure.kind(),
                    backend: BackendKind::Raster,
                });
            }
        };
        raster.validate()?;
        trace!(
            kind = ?figure.kind(),
            primitives = raster.primitives.len(),
            "raster figure built"
        );
        Ok(FigureHandle::Raster(raster))
    }
}
