use approx::assert_abs_diff_eq;
use climate_chart::core::palette::{
    ColorScale, PaletteFamily, PaletteRequest, PaletteSource, PaletteTables, SignIndex,
    MAX_CLUSTER_BASE, classify_variable, resolve_palette, sample_palette, select_palette, uniform_ticks,
};
use climate_chart::ChartError;
use climate_chart::core::{Color, ColorRef};
use proptest::prelude::*;

fn stops(name: &str) -> Vec<Color> {
    match resolve_palette(name).expect("palette") {
        PaletteSource::Gradient { stops } => stops.to_vec(),
        PaletteSource::Native { name } => panic!("`{name}` is not a gradient"),
    }
}

#[test]
fn straddling_delta_range_doubles_clusters_and_becomes_symmetric() {
    let request = PaletteRequest::new("tas", -2.0, 5.0)
        .with_delta(true)
        .with_discrete(true);
    let spec = select_palette(&request, &PaletteTables::default()).expect("palette");

    assert_eq!(spec.family, PaletteFamily::TemperatureVariable);
    assert_eq!(spec.sign_index, SignIndex::Straddling);
    assert_eq!(spec.name, "RdBu_r");
    assert_eq!(
        spec.source,
        PaletteSource::Native {
            name: "RdBu_r".to_owned()
        }
    );
    assert_eq!(spec.cluster_count, 20);
    assert_eq!(spec.value_range, (-5.0, 5.0));

    let ticks = spec.ticks.as_ref().expect("discrete ticks");
    assert_eq!(ticks.len(), 21);
    assert_eq!(spec.tick_labels.len(), 21);
    assert_eq!(spec.tick_labels[0], "-5.0");
    assert_eq!(spec.tick_labels[20], "5.0");
    assert!(spec.scale.is_none());
}

#[test]
fn continuous_gradient_is_sampled_at_every_level() {
    let request = PaletteRequest::new("pr", 1.0, 3.0).with_delta(true);
    let spec = select_palette(&request, &PaletteTables::default()).expect("palette");

    assert_eq!(spec.sign_index, SignIndex::Positive);
    assert_eq!(spec.name, "Turquoises");
    assert_eq!(spec.cluster_count, 256);
    assert!(!spec.is_discrete());

    let scale = spec.scale.expect("gradient scale");
    assert_eq!(scale.levels().len(), 256);
    assert_eq!(scale.levels()[0].to_hex(), "#ffffff");
    assert_eq!(scale.levels()[255].to_hex(), "#008080");
}

#[test]
fn negative_range_uses_reversed_gradient() {
    let request = PaletteRequest::new("pr", -3.0, -1.0)
        .with_delta(true)
        .with_discrete(true);
    let spec = select_palette(&request, &PaletteTables::default()).expect("palette");

    assert_eq!(spec.sign_index, SignIndex::Negative);
    assert_eq!(spec.name, "Browns_r");
    assert_eq!(spec.cluster_count, 10);
    let scale = spec.scale.expect("gradient scale");
    assert_eq!(scale.levels()[0].to_hex(), "#662506");
    assert_eq!(scale.levels()[9].to_hex(), "#ffffff");
}

#[test]
fn wind_variables_ignore_the_absolute_slot() {
    let spec = select_palette(&PaletteRequest::new("uas", 1.0, 5.0), &PaletteTables::default())
        .expect("palette");
    assert_eq!(spec.family, PaletteFamily::WindVariable);
    assert_eq!(spec.sign_index, SignIndex::Positive);
    assert_eq!(spec.name, "YlPu");
}

#[test]
fn unknown_variable_falls_back_to_default_table() {
    assert_eq!(classify_variable("not_a_variable"), PaletteFamily::Default);
    let spec = select_palette(
        &PaletteRequest::new("not_a_variable", 0.0, 1.0),
        &PaletteTables::default(),
    )
    .expect("palette");
    assert_eq!(spec.name, "viridis");
}

#[test]
fn family_tables_can_be_overridden() {
    let tables = PaletteTables::default().with_family(
        PaletteFamily::TemperatureVariable,
        ["YlOrRd", "GyWhRd", "YlGy", "YlOrRd"].map(str::to_owned),
    );
    let spec = select_palette(&PaletteRequest::new("tasmax", 10.0, 30.0), &tables)
        .expect("palette");
    assert_eq!(spec.name, "YlOrRd");
    assert_eq!(stops("YlOrRd").len(), 3);
}

#[test]
fn invalid_ranges_are_rejected() {
    let tables = PaletteTables::default();
    assert!(select_palette(&PaletteRequest::new("tas", 3.0, 1.0), &tables).is_err());
    assert!(select_palette(&PaletteRequest::new("tas", f64::NAN, 1.0), &tables).is_err());
    assert!(
        select_palette(&PaletteRequest::new("tas", 0.0, 1.0).with_cluster_base(0), &tables)
            .is_err()
    );
}

#[test]
fn cluster_base_is_capped() {
    let tables = PaletteTables::default();
    let straddling = |base| PaletteRequest::new("tas", -1.0, 1.0).with_cluster_base(base);

    let spec = select_palette(&straddling(MAX_CLUSTER_BASE).with_discrete(true), &tables)
        .expect("largest base");
    assert_eq!(spec.cluster_count, MAX_CLUSTER_BASE * 2);
    assert_eq!(spec.ticks.expect("ticks").len(), (MAX_CLUSTER_BASE * 2 + 1) as usize);

    for base in [MAX_CLUSTER_BASE + 1, u32::MAX / 2 + 1, u32::MAX] {
        let err = select_palette(&straddling(base), &tables).expect_err("oversized base");
        assert!(matches!(err, ChartError::InvalidData(_)), "{base}: {err}");
    }
}

#[test]
fn sampling_native_palette_defers_to_backend() {
    let color = sample_palette("nipy_spectral", 0.5).expect("color");
    assert_eq!(
        color,
        ColorRef::Native {
            palette: "nipy_spectral".to_owned(),
            position: 0.5
        }
    );
    let ColorRef::Rgb { color } = sample_palette("GyWhRd", 0.5).expect("color") else {
        panic!("expected rgb color");
    };
    assert_eq!(color.to_hex(), "#ffffff");
}

#[test]
fn reversing_two_stop_gradient_reverses_levels() {
    for name in ["Browns", "YlGr", "Turquoises", "LBlues", "YlPu"] {
        let forward = ColorScale::from_stops(&stops(name), 16).expect("scale");
        let reversed = ColorScale::from_stops(&stops(&format!("{name}_r")), 16).expect("scale");
        for (a, b) in forward.levels().iter().rev().zip(reversed.levels()) {
            assert_abs_diff_eq!(a.red, b.red, epsilon = 1e-12);
            assert_abs_diff_eq!(a.green, b.green, epsilon = 1e-12);
            assert_abs_diff_eq!(a.blue, b.blue, epsilon = 1e-12);
        }
    }
}

proptest! {
    #[test]
    fn straddling_ranges_double_and_mirror(
        min in -500.0f64..-0.001,
        max in 0.001f64..500.0,
        discrete in any::<bool>()
    ) {
        let request = PaletteRequest::new("pr", min, max)
            .with_delta(true)
            .with_discrete(discrete);
        let spec = select_palette(&request, &PaletteTables::default()).expect("palette");
        let base = if discrete { 10 } else { 256 };
        let bound = min.abs().max(max.abs());

        prop_assert_eq!(spec.cluster_count, base * 2);
        prop_assert!((spec.value_range.0 + bound).abs() <= 1e-9 * bound.max(1.0));
        prop_assert!((spec.value_range.1 - bound).abs() <= 1e-9 * bound.max(1.0));
    }

    #[test]
    fn ticks_are_uniform_and_one_more_than_clusters(
        low in -100.0f64..100.0,
        span in 0.1f64..100.0,
        count in 1u32..40
    ) {
        let ticks = uniform_ticks((low, low + span), count);
        prop_assert_eq!(ticks.len(), count as usize + 1);
        let step = span / f64::from(count);
        for pair in ticks.windows(2) {
            prop_assert!((pair[1] - pair[0] - step).abs() <= 1e-9);
        }
    }
}
