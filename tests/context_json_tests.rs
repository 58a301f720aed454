use climate_chart::api::context::{MapStatistic, Platform, Variable, View};
use climate_chart::core::palette::PaletteFamily;
use climate_chart::core::scenario::{ScenarioSelection, SimulationSelection};
use climate_chart::{BackendKind, ChartError, PlotContext};

#[test]
fn minimal_json_fills_defaults() {
    let ctx = PlotContext::from_json_str(
        r#"{
          "variable": {
            "code": "tasmax",
            "label": "Maximum temperature (°C)",
            "description": "Maximum temperature",
            "unit": "°C"
          }
        }"#,
    )
    .expect("context");

    assert_eq!(ctx.variable.precision, 1);
    assert_eq!(ctx.scenarios.len(), 4);
    assert_eq!(ctx.scenario, ScenarioSelection::None);
    assert_eq!(ctx.simulation, SimulationSelection::None);
    assert_eq!(ctx.view, View::TimeSeries);
    assert_eq!(ctx.backend, BackendKind::ChartGrammar);
    assert_eq!(ctx.platform, Platform::Script);
    assert_eq!(ctx.cluster_palette, "nipy_spectral");
    assert_eq!(ctx.table_centiles, vec![10, 90]);
    assert_eq!(ctx.time_unit, 1.0);
    assert!(ctx.palette_tables.families.contains_key(&PaletteFamily::WindIndex));
}

#[test]
fn selections_and_views_parse_from_snake_case() {
    let ctx = PlotContext::from_json_str(
        r#"{
          "variable": { "code": "pr", "label": "Precipitation (mm)", "description": "Precipitation", "unit": "mm", "precision": 0 },
          "scenario": { "specific": "rcp45" },
          "simulation": "all",
          "view": "bias",
          "backend": "interactive",
          "platform": "streamlit",
          "map_statistic": { "kind": "centile", "centile": 90 },
          "delta": true
        }"#,
    )
    .expect("context");

    assert_eq!(ctx.scenario, ScenarioSelection::specific("rcp45"));
    assert_eq!(ctx.simulation, SimulationSelection::All);
    assert_eq!(ctx.view, View::Bias);
    assert_eq!(ctx.backend, BackendKind::Interactive);
    assert_eq!(ctx.platform, Platform::Streamlit);
    assert_eq!(ctx.map_statistic, Some(MapStatistic::Centile { centile: 90 }));
    assert_eq!(ctx.variable.precision, 0);
    assert!(ctx.delta);
}

#[test]
fn pretty_json_round_trips() {
    let ctx = PlotContext::new(Variable::new("uas", "Eastward wind", "m/s"))
        .with_view(View::Map)
        .with_backend(BackendKind::Raster)
        .with_horizon("2071-2100")
        .with_map_statistic(MapStatistic::Max)
        .with_time_unit(5.0)
        .with_discrete_map(true);

    let json = ctx.to_json_pretty().expect("serialize");
    assert!(json.contains("\"view\": \"map\""));
    let restored = PlotContext::from_json_str(&json).expect("parse");
    assert_eq!(restored, ctx);
}

#[test]
fn invalid_contexts_are_rejected() {
    let malformed = PlotContext::from_json_str("{ not json").expect_err("malformed");
    assert!(
        matches!(&malformed, ChartError::InvalidData(message) if message.starts_with("failed to parse context"))
    );

    let mut ctx = PlotContext::new(Variable::new("tas", "Mean temperature", "°C"));
    ctx.time_unit = 0.0;
    assert!(ctx.validate().is_err());

    let json = PlotContext::new(Variable::new("tas", "Mean temperature", "°C"))
        .with_table_centiles(Vec::new())
        .to_json_pretty()
        .expect("serialize");
    assert!(PlotContext::from_json_str(&json).is_err());

    let bad_color = r##"{
      "variable": { "code": "tas", "label": "t", "description": "t", "unit": "°C" },
      "scenarios": [ { "code": "rcp45", "label": "RCP 4.5", "color": "#zzzzzz" } ]
    }"##;
    assert!(PlotContext::from_json_str(bad_color).is_err());

    let empty_code = PlotContext::new(Variable::new("", "Nothing", "-"));
    assert!(empty_code.validate().is_err());
}
