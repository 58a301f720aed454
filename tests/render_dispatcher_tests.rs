use climate_chart::api::boundary_adapter::boundary;
use climate_chart::api::context::{MapLocation, Platform, Variable, View};
use climate_chart::api::map_builder::heat_map;
use climate_chart::api::render_dispatcher::resolve_backend;
use climate_chart::api::stats_table::{StatKind, StatRecord, stats_table};
use climate_chart::api::taylor_diagram::{TaylorRow, taylor_diagram};
use climate_chart::core::geometry::{LonLat, MapCell};
use climate_chart::core::table::ScenarioTable;
use climate_chart::render::{MarkerShape, NullBackend, Primitive};
use climate_chart::{
    BackendKind, ChartError, FigureBackend, FigureData, FigureKind, PlotContext,
    RenderDispatcher, ReshapeMode, reshape,
};

fn context() -> PlotContext {
    PlotContext::new(Variable::new("tas", "Mean temperature", "°C"))
}

fn time_series() -> FigureData {
    let table = ScenarioTable::new("year", vec![1990.0, 2000.0])
        .with_column("ref", vec![1.0, 2.0])
        .and_then(|t| t.with_column("rcp45_lower", vec![0.5, 1.5]))
        .and_then(|t| t.with_column("rcp45_middle", vec![1.0, 2.0]))
        .and_then(|t| t.with_column("rcp45_upper", vec![1.5, 2.5]))
        .expect("table");
    FigureData::TimeSeries(reshape(&table, ReshapeMode::Aggregate, &context()).expect("reshape"))
}

fn stats() -> FigureData {
    let mut records = Vec::new();
    for scenario in ["rcp26", "rcp45", "rcp85"] {
        for (stat, centile) in [
            (StatKind::Min, None),
            (StatKind::Max, None),
            (StatKind::Mean, None),
            (StatKind::Centile, Some(10)),
            (StatKind::Centile, Some(50)),
            (StatKind::Centile, Some(90)),
        ] {
            records.push(StatRecord {
                scenario: scenario.to_owned(),
                horizon: "2041-2070".to_owned(),
                stat,
                centile,
                value: 1.0,
            });
        }
    }
    let ctx = context().with_horizon("2041-2070");
    FigureData::Table(stats_table(&records, &ctx).expect("table"))
}

fn diagram() -> FigureData {
    let rows = vec![
        TaylorRow {
            simulation: "ref".to_owned(),
            standard_deviation: 1.0,
            centered_rmsd: 0.0,
            correlation: 1.0,
        },
        TaylorRow {
            simulation: "CanESM2_CRCM5".to_owned(),
            standard_deviation: 1.2,
            centered_rmsd: 0.4,
            correlation: 0.9,
        },
    ];
    FigureData::Diagram(taylor_diagram(&rows).expect("diagram"))
}

#[test]
fn resolution_table_matches_every_kind_and_request() {
    use BackendKind::{ChartGrammar as G, Interactive as I, Raster as R};
    let expected = [
        (FigureKind::TimeSeries, [G, I, R]),
        (FigureKind::Table, [I, I, I]),
        (FigureKind::Map, [R, I, R]),
        (FigureKind::MonthlyCycle, [R, I, R]),
        (FigureKind::DailyCycle, [R, I, R]),
        (FigureKind::ClusterTable, [I, I, I]),
        (FigureKind::ClusterPlot, [I, I, R]),
        (FigureKind::Diagram, [R, R, R]),
    ];
    assert_eq!(expected.len(), FigureKind::ALL.len());
    for (kind, row) in expected {
        for (requested, effective) in BackendKind::ALL.into_iter().zip(row) {
            assert_eq!(
                resolve_backend(kind, requested),
                effective,
                "{kind:?} requested on {requested:?}"
            );
        }
    }
}

#[test]
fn time_series_goes_to_the_requested_back_end() {
    let dispatcher = RenderDispatcher::new();
    let figure = time_series();

    let grammar = dispatcher.render(&figure, &context()).expect("render");
    assert_eq!(grammar.backend(), BackendKind::ChartGrammar);
    let spec = grammar.as_json().expect("json spec");
    assert_eq!(spec["width"], 650);
    assert_eq!(spec["height"], 300);

    let streamlit = dispatcher
        .render(&figure, &context().with_platform(Platform::Streamlit))
        .expect("render");
    assert_eq!(streamlit.as_json().expect("json spec")["height"], 362);

    let interactive = dispatcher
        .render(&figure, &context().with_backend(BackendKind::Interactive))
        .expect("render");
    assert_eq!(interactive.backend(), BackendKind::Interactive);
    assert_eq!(interactive.as_json().expect("json")["type"], "overlay");

    let raster = dispatcher
        .render(&figure, &context().with_backend(BackendKind::Raster))
        .expect("render");
    let raster = raster.as_raster().expect("raster figure");
    assert_eq!((raster.size.width, raster.size.height), (10.6, 4.8));
    let bands = raster
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Band(_)))
        .count();
    let lines = raster
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Polyline(_)))
        .count();
    assert_eq!((bands, lines), (1, 2));
}

#[test]
fn tables_are_always_interactive() {
    let dispatcher = RenderDispatcher::new();
    for backend in BackendKind::ALL {
        let handle = dispatcher
            .render(&stats(), &context().with_backend(backend).with_view(View::Table))
            .expect("render");
        assert_eq!(handle.backend(), BackendKind::Interactive);
        let spec = handle.as_json().expect("json");
        assert_eq!(spec["type"], "table");
        assert_eq!(spec["header"][1], "RCP 2.6");
    }
}

#[test]
fn diagrams_are_always_raster() {
    let dispatcher = RenderDispatcher::new();
    let handle = dispatcher
        .render(
            &diagram(),
            &context().with_backend(BackendKind::Interactive).with_view(View::Taylor),
        )
        .expect("render");
    let raster = handle.as_raster().expect("raster");
    assert_eq!((raster.size.width, raster.size.height), (7.5, 5.0));
    let markers = raster
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Marker(_)))
        .count();
    assert_eq!(markers, 2);
}

#[test]
fn missing_back_end_reports_unsupported_figure() {
    let err = RenderDispatcher::empty()
        .render(&time_series(), &context())
        .expect_err("no back end");
    assert!(matches!(
        err,
        ChartError::UnsupportedFigure {
            kind: FigureKind::TimeSeries,
            backend: BackendKind::ChartGrammar,
        }
    ));
}

#[test]
fn backends_reject_kinds_outside_their_capabilities() {
    let ctx = context();
    let err = climate_chart::render::RasterBackend
        .render(&stats(), &ctx)
        .expect_err("raster table");
    assert!(matches!(err, ChartError::UnsupportedFigure { .. }));
    assert!(!climate_chart::render::ChartGrammarBackend.supports(FigureKind::Map));
    assert!(!climate_chart::render::InteractiveBackend.supports(FigureKind::Diagram));
}

#[test]
fn registered_null_back_end_replaces_built_in() {
    let dispatcher =
        RenderDispatcher::new().with_backend(Box::new(NullBackend::new(BackendKind::Raster)));
    let handle = dispatcher
        .render(&stats(), &context())
        .expect("interactive table");
    assert_eq!(handle.backend(), BackendKind::Interactive);

    let handle = dispatcher
        .render(&diagram(), &context())
        .expect("null raster");
    let raster = handle.as_raster().expect("raster");
    assert!(raster.is_empty());
}

#[test]
fn null_back_end_counts_renders() {
    let backend = NullBackend::new(BackendKind::ChartGrammar);
    let ctx = context();
    for figure in [time_series(), stats(), diagram()] {
        assert!(backend.supports(figure.kind()));
        let handle = backend.render(&figure, &ctx).expect("render");
        assert_eq!(handle.backend(), BackendKind::ChartGrammar);
    }
    assert_eq!(backend.render_count(), 3);
}

#[test]
fn raster_map_draws_cells_outline_and_locations() {
    let cells = [
        MapCell { longitude: -70.0, latitude: 45.0, value: 1.0 },
        MapCell { longitude: -69.5, latitude: 45.0, value: 2.0 },
        MapCell { longitude: -70.0, latitude: 45.5, value: 3.0 },
    ];
    let vertices = [
        LonLat::new(-71.0, 44.0),
        LonLat::new(-69.0, 44.0),
        LonLat::new(-69.0, 46.0),
    ];
    let annotation = boundary(&vertices, &[vertices.to_vec()]).expect("boundary");
    let ctx = context()
        .with_view(View::Map)
        .with_backend(BackendKind::ChartGrammar)
        .with_locations(vec![MapLocation::new("Quebec", -70.0, 45.0)]);
    let map = heat_map(&cells, None, Some(annotation), &ctx).expect("map");

    let handle = RenderDispatcher::new()
        .render(&FigureData::Map(map), &ctx)
        .expect("render");
    let raster = handle.as_raster().expect("raster");
    assert_eq!((raster.size.width, raster.size.height), (10.0, 7.5));
    assert_eq!(raster.x_range, Some((-71.0, -69.0)));

    let rects = raster
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Rect(_)))
        .count();
    let outlines = raster
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Outline(_)))
        .count();
    assert_eq!((rects, outlines), (3, 1));

    let hollow = raster.primitives.iter().any(|p| {
        matches!(p, Primitive::Marker(marker) if marker.shape == MarkerShape::HollowCircle)
    });
    let italic_label = raster.primitives.iter().any(|p| {
        matches!(p, Primitive::Text(text) if text.italic && text.text == "Quebec")
    });
    assert!(hollow && italic_label);
}

#[cfg(feature = "parallel-render")]
#[test]
fn batch_keeps_input_order() {
    let figures = vec![time_series(), stats(), diagram()];
    let handles = RenderDispatcher::new().render_batch(&figures, &context());
    let backends: Vec<BackendKind> = handles
        .into_iter()
        .map(|handle| handle.expect("render").backend())
        .collect();
    assert_eq!(
        backends,
        vec![BackendKind::ChartGrammar, BackendKind::Interactive, BackendKind::Raster]
    );
}
