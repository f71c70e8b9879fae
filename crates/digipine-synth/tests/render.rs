use chrono::NaiveDate;
use digipine_synth::catalog::ReferenceCatalog;
use digipine_synth::data::snapshot::{Snapshot, TimelineMetric};
use digipine_synth::data::synth::generate_on;
use digipine_synth::render::{format_pct, format_thousands, JsonRenderer, Renderer, TextRenderer};
use digipine_synth::selection::SelectionKey;
use digipine_synth::stats::summarize;

fn snapshot(catalog: &ReferenceCatalog) -> Snapshot {
    generate_on(
        &SelectionKey::default(),
        catalog,
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
    )
}

#[test]
fn thousands_separator() {
    assert_eq!(format_thousands(0), "0");
    assert_eq!(format_thousands(999), "999");
    assert_eq!(format_thousands(2465), "2,465");
    assert_eq!(format_thousands(1_234_567), "1,234,567");
}

#[test]
fn percentages_drop_trailing_zero() {
    assert_eq!(format_pct(19.5), "19.5%");
    assert_eq!(format_pct(23.0), "23%");
}

#[test]
fn text_renderer_binds_kpis_and_competitors() {
    let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
    let text = TextRenderer::new(&catalog, TimelineMetric::Sales)
        .render(&snapshot(&catalog))
        .expect("render");
    assert!(text.contains("Products tracked: 2,465"), "{text}");
    assert!(text.contains("Top region: Pune"), "{text}");
    assert!(text.contains("Market growth: 19.5%"), "{text}");
    assert!(text.contains("Zepto: 34%"), "{text}");
    assert!(text.contains("Pepsi: Metro discounts; college fests; bundle offers"));
    assert!(text.contains("Sales Volume (30 days)"), "{text}");
}

#[test]
fn json_renderer_emits_parseable_snapshot() {
    let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
    let original = snapshot(&catalog);
    let text = JsonRenderer { pretty: false }
        .render(&original)
        .expect("render json");
    assert!(!text.contains('\n'));
    let parsed: Snapshot = serde_json::from_str(&text).expect("parse json");
    assert_eq!(parsed.kpis, original.kpis);
    assert_eq!(parsed.timeline.labels, original.timeline.labels);
    assert_eq!(parsed.regions.len(), 5);
}

#[test]
fn timeline_metric_selection() {
    assert_eq!(TimelineMetric::parse_lenient("growth"), TimelineMetric::Growth);
    assert_eq!(TimelineMetric::parse_lenient("market-share"), TimelineMetric::MarketShare);
    assert_eq!(TimelineMetric::parse_lenient("marketShare"), TimelineMetric::MarketShare);
    assert_eq!(TimelineMetric::parse_lenient("bogus"), TimelineMetric::Sales);
    assert_eq!(TimelineMetric::Growth.label(), "Growth Rate (%)");

    let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
    let snap = snapshot(&catalog);
    assert_eq!(snap.timeline.series(TimelineMetric::Growth), snap.timeline.growth_pct);
    assert_eq!(snap.timeline.series(TimelineMetric::Sales).len(), 30);
}

#[test]
fn summarize_series() {
    assert!(summarize(&[]).is_none());
    let summary = summarize(&[4.0, 1.0, 3.0, 2.0]).expect("summary");
    assert_eq!(summary.count, 4);
    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.max, 4.0);
    assert_eq!(summary.mean, 2.5);
    assert_eq!(summary.median, 2.5);
    assert_eq!(summarize(&[5.0, 1.0, 3.0]).expect("summary").median, 3.0);
}
