use climate_chart::api::context::{Variable, View};
use climate_chart::core::palette::{PaletteRequest, PaletteTables, select_palette};
use climate_chart::core::precision::adjust;
use climate_chart::core::table::{ScenarioTable, aggregate_scenarios};
use climate_chart::{PlotContext, ReshapeMode, reshape};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn scenario_table(years: usize) -> ScenarioTable {
    let time: Vec<f64> = (0..years).map(|i| 1950.0 + i as f64).collect();
    let curve = |offset: f64| -> Vec<f64> {
        time.iter()
            .map(|t| (t - 1950.0) * 0.02 + offset)
            .collect()
    };

    let mut table = ScenarioTable::new("year", time.clone());
    table.insert_column("ref", curve(0.0)).expect("ref column");
    for (scenario, shift) in [("rcp26", 0.5), ("rcp45", 1.0), ("rcp85", 2.0)] {
        for (role, spread) in [("lower", -0.5), ("middle", 0.0), ("upper", 0.5)] {
            table
                .insert_column(format!("{scenario}_{role}"), curve(shift + spread))
                .expect("envelope column");
        }
    }
    table
}

fn bench_adjust_colorbar_ticks(c: &mut Criterion) {
    let ticks: Vec<f64> = (0..=20).map(|i| -5.0 + f64::from(i) * 0.5).collect();

    c.bench_function("adjust_colorbar_ticks_21", |b| {
        b.iter(|| {
            let _ = adjust(black_box(&ticks), 4);
        })
    });
}

fn bench_select_continuous_palette(c: &mut Criterion) {
    let tables = PaletteTables::default();
    let request = PaletteRequest::new("pr", -3.0, 7.0).with_delta(true);

    c.bench_function("select_palette_continuous_512", |b| {
        b.iter(|| {
            let _ = select_palette(black_box(&request), &tables).expect("palette");
        })
    });
}

fn bench_reshape_aggregate_150y(c: &mut Criterion) {
    let table = scenario_table(150);
    let context = PlotContext::new(Variable::new("tas", "Mean temperature", "°C"));

    c.bench_function("reshape_aggregate_150y", |b| {
        b.iter(|| {
            let _ = reshape(black_box(&table), ReshapeMode::Aggregate, &context).expect("reshape");
        })
    });
}

fn bench_bias_aggregation_150y(c: &mut Criterion) {
    let table = scenario_table(150);
    let context =
        PlotContext::new(Variable::new("tas", "Mean temperature", "°C")).with_view(View::Bias);

    c.bench_function("aggregate_scenarios_150y", |b| {
        b.iter(|| {
            let _ = aggregate_scenarios(black_box(&table));
        })
    });

    c.bench_function("reshape_bias_150y", |b| {
        b.iter(|| {
            let _ = reshape(black_box(&table), ReshapeMode::Aggregate, &context).expect("reshape");
        })
    });
}

criterion_group!(
    benches,
    bench_adjust_colorbar_ticks,
    bench_select_continuous_palette,
    bench_reshape_aggregate_150y,
    bench_bias_aggregation_150y
);
criterion_main!(benches);
