use climate_chart::core::precision::{
    AdjustedValue, DEFAULT_MAX_DECIMALS, PrecisionOutput, adjust, format_rounded, round_value,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn distinct_at(values: &[f64], decimals: u32) -> bool {
    let texts: Vec<String> = values.iter().map(|v| format_rounded(*v, decimals)).collect();
    texts.iter().collect::<HashSet<_>>().len() == texts.len()
}

#[test]
fn close_values_exhaust_the_bound() {
    let result = adjust(&[1.001, 1.002], 2);
    assert_eq!(result.decimals, 2);
    assert_eq!(result.formatted, vec!["1.00", "1.00"]);
    assert!(result.exhausted);
}

#[test]
fn stops_at_first_distinct_count() {
    let result = adjust(&[1.0, 1.5, 2.25], DEFAULT_MAX_DECIMALS);
    assert_eq!(result.decimals, 1);
    assert_eq!(result.formatted, vec!["1.0", "1.5", "2.2"]);
    assert!(!result.exhausted);
}

#[test]
fn empty_and_single_inputs_need_no_decimals() {
    assert_eq!(adjust(&[], 4).decimals, 0);
    let single = adjust(&[3.14159], 4);
    assert_eq!(single.decimals, 0);
    assert_eq!(single.formatted, vec!["3"]);
}

#[test]
fn nan_texts_compare_like_any_other_text() {
    let result = adjust(&[f64::NAN, f64::NAN], 3);
    assert_eq!(result.decimals, 3);
    assert!(result.exhausted);
    assert_eq!(result.formatted, vec!["nan", "nan"]);

    let mixed = adjust(&[f64::NAN, 1.0], 3);
    assert_eq!(mixed.decimals, 0);
    assert_eq!(mixed.formatted, vec!["nan", "1"]);
}

#[test]
fn negative_zero_prints_unsigned() {
    assert_eq!(format_rounded(-0.0, 2), "0.00");
    assert_eq!(format_rounded(-0.004, 2), "0.00");
    assert_eq!(format_rounded(-0.006, 2), "-0.01");
}

#[test]
fn conversion_happens_after_the_search() {
    let ints = adjust(&[1.0, 2.0], 4)
        .convert(PrecisionOutput::Int)
        .expect("integers");
    assert_eq!(ints, vec![AdjustedValue::Int(1), AdjustedValue::Int(2)]);

    let floats = adjust(&[0.25, 0.5], 4)
        .convert(PrecisionOutput::Float)
        .expect("floats");
    assert_eq!(floats, vec![AdjustedValue::Float(0.2), AdjustedValue::Float(0.5)]);

    let not_integral = adjust(&[0.25, 0.5], 4).convert(PrecisionOutput::Int);
    assert!(not_integral.is_err());
}

#[test]
fn round_value_uses_half_even_on_binary_value() {
    approx::assert_relative_eq!(round_value(2.5, 0), 2.0);
    approx::assert_relative_eq!(round_value(2.675, 2), 2.67);
    approx::assert_relative_eq!(round_value(-1.25, 1), -1.2);
    assert!(round_value(f64::NAN, 2).is_nan());
}

proptest! {
    #[test]
    fn chosen_count_is_minimal_or_bound(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 0..8),
        max_decimals in 0u32..5
    ) {
        let result = adjust(&values, max_decimals);
        prop_assert!(result.decimals <= max_decimals);
        prop_assert_eq!(result.formatted.len(), values.len());

        if result.exhausted {
            prop_assert_eq!(result.decimals, max_decimals);
            for decimals in 0..=max_decimals {
                prop_assert!(!distinct_at(&values, decimals));
            }
        } else {
            prop_assert!(distinct_at(&values, result.decimals));
            for decimals in 0..result.decimals {
                prop_assert!(!distinct_at(&values, decimals));
            }
        }
    }

    #[test]
    fn formatted_text_has_requested_fraction_digits(
        value in -10_000.0f64..10_000.0,
        decimals in 0u32..6
    ) {
        let text = format_rounded(value, decimals);
        let fraction = text.split('.').nth(1).map_or(0, str::len);
        prop_assert_eq!(fraction, decimals as usize);
    }
}
