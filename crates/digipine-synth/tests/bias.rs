use chrono::NaiveDate;
use digipine_synth::catalog::ReferenceCatalog;
use digipine_synth::data::bias::{
    apply_bias, apply_region_bias, apply_time_bias, time_window_scale, TrendingScale,
};
use digipine_synth::data::synth::synthesize_on;
use digipine_synth::selection::{SelectionKey, TimeWindow};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

fn catalog() -> ReferenceCatalog {
    ReferenceCatalog::builtin().expect("builtin catalog")
}

#[test]
fn default_selection_is_left_untouched() {
    let catalog = catalog();
    let key = SelectionKey::default();
    let raw = synthesize_on(&key, &catalog, as_of());
    assert_eq!(apply_bias(raw.clone(), &key, &catalog), raw);
}

#[test]
fn day_window_keeps_at_most_forty_percent_of_trending() {
    let catalog = catalog();
    for product in ["cocacola", "lays", "dairymilk", "redbull", "nescafe"] {
        for region in ["all", "mumbai", "pune"] {
            let key = SelectionKey::new(product, region, "24h", "all");
            let before = apply_region_bias(synthesize_on(&key, &catalog, as_of()), &key, &catalog);
            let after = apply_time_bias(before.clone(), &key);
            assert!(
                f64::from(after.kpis.trending) <= 0.4 * f64::from(before.kpis.trending),
                "{key}: {} -> {}",
                before.kpis.trending,
                after.kpis.trending
            );
            assert!(after.kpis.trending >= 20);
        }
    }
}

#[test]
fn quarter_window_at_least_doubles_trending() {
    let catalog = catalog();
    for product in ["cocacola", "lays", "dairymilk", "redbull", "nescafe"] {
        for platform in ["all", "zepto", "others"] {
            let key = SelectionKey::new(product, "delhi", "90days", platform);
            let before = apply_region_bias(synthesize_on(&key, &catalog, as_of()), &key, &catalog);
            let after = apply_time_bias(before.clone(), &key);
            assert!(
                f64::from(after.kpis.trending) >= 2.0 * f64::from(before.kpis.trending),
                "{key}: {} -> {}",
                before.kpis.trending,
                after.kpis.trending
            );
        }
    }
}

#[test]
fn month_window_scales_trending_by_one_point_six() {
    let catalog = catalog();
    let key = SelectionKey::new("lays", "all", "30days", "all");
    let before = synthesize_on(&key, &catalog, as_of());
    let after = apply_time_bias(before.clone(), &key);
    let expected = (f64::from(before.kpis.trending) * 1.6).round() as u32;
    assert_eq!(after.kpis.trending, expected);
    assert_eq!(after.kpis.total_tracked, before.kpis.total_tracked);
}

#[test]
fn concrete_region_overrides_top_region_label() {
    let catalog = catalog();
    for region in catalog.concrete_regions() {
        let key = SelectionKey::new("nescafe", region.id.as_str(), "7days", "all");
        let snapshot = apply_bias(synthesize_on(&key, &catalog, as_of()), &key, &catalog);
        assert_eq!(snapshot.kpis.top_region_label, region.label);
    }
}

#[test]
fn region_bias_scales_within_bounds() {
    let catalog = catalog();
    let key = SelectionKey::new("dairymilk", "hyderabad", "7days", "blinkit");
    let before = synthesize_on(&key, &catalog, as_of());
    let after = apply_region_bias(before.clone(), &key, &catalog);

    let total_ratio = f64::from(after.kpis.total_tracked) / f64::from(before.kpis.total_tracked);
    assert!((0.84..=1.26).contains(&total_ratio), "total ratio {total_ratio}");
    let growth_ratio = after.kpis.market_growth_pct / before.kpis.market_growth_pct;
    assert!((0.88..=1.22).contains(&growth_ratio), "growth ratio {growth_ratio}");
    assert!(after.kpis.trending >= 30);
    // Only KPIs move.
    assert_eq!(after.timeline, before.timeline);
    assert_eq!(after.regions, before.regions);
}

#[test]
fn unknown_region_and_window_apply_no_bias() {
    let catalog = catalog();
    let key = SelectionKey::new("cocacola", "atlantis", "fortnight", "all");
    let raw = synthesize_on(&key, &catalog, as_of());
    assert_eq!(key.time_window(), None);
    assert_eq!(apply_bias(raw.clone(), &key, &catalog), raw);
}

#[test]
fn trending_scale_applies_floor() {
    let scale = TrendingScale {
        factor: 0.35,
        floor: Some(20),
    };
    assert_eq!(scale.apply(10), 20);
    assert_eq!(scale.apply(200), 70);
}

#[test]
fn only_non_default_windows_have_a_scale() {
    assert!(time_window_scale(TimeWindow::Week).is_none());
    for window in [TimeWindow::Day, TimeWindow::Month, TimeWindow::Quarter] {
        assert!(time_window_scale(window).is_some(), "{window:?}");
    }
}
