use std::collections::BTreeSet;

use thiserror::Error;

use crate::catalog::ReferenceCatalog;
use crate::data::bias::time_window_scale;
use crate::data::ranges::TIMELINE_DAYS;
use crate::data::snapshot::Snapshot;
use crate::selection::SelectionKey;

/// Allowed distance of the platform share total from 100.
pub const SHARE_SUM_TOLERANCE: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Violation {
    #[error("trending {trending} exceeds total tracked {total}")]
    TrendingExceedsTotal { trending: u32, total: u32 },
    #[error("platform share has {found} entries, catalog lists {expected} platforms")]
    PlatformShareLength { expected: usize, found: usize },
    #[error("platform share[{index}] is negative: {value}")]
    NegativePlatformShare { index: usize, value: f64 },
    #[error("platform share sums to {sum}, expected 100 +/- 0.5")]
    PlatformShareSum { sum: f64 },
    #[error("category trend labels {found:?} do not match product categories {expected:?}")]
    CategoryLabels {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("category trend has {labels} labels but {values} values")]
    CategoryLength { labels: usize, values: usize },
    #[error("forecast series lengths differ: labels={labels} current={current} forecast={forecast}")]
    ForecastLength {
        labels: usize,
        current: usize,
        forecast: usize,
    },
    #[error("forecast[{index}] = {forecast} is below current {current}")]
    ForecastBelowCurrent {
        index: usize,
        current: u32,
        forecast: u32,
    },
    #[error("{series} has {found} points, expected {expected}")]
    SeriesLength {
        series: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("region stats mismatch: missing {missing:?}, unexpected {unexpected:?}")]
    RegionSet {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("competitor list does not match product '{product}'")]
    Competitors { product: String },
    #[error("top region label '{found}' should be '{expected}'")]
    TopRegionLabel { expected: String, found: String },
    #[error("time window {window} moved trending from {before} to {after}")]
    TimeBiasBounds {
        window: &'static str,
        before: u32,
        after: u32,
    },
    #[error("fingerprint changed between runs: {first} vs {second}")]
    NonDeterministic { first: String, second: String },
}

/// Checks a biased snapshot against the invariants every generation must hold.
pub fn check_snapshot(
    snapshot: &Snapshot,
    key: &SelectionKey,
    catalog: &ReferenceCatalog,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let product = catalog
        .product(&key.product)
        .unwrap_or_else(|| catalog.default_product());

    let kpis = &snapshot.kpis;
    if kpis.trending > kpis.total_tracked {
        violations.push(Violation::TrendingExceedsTotal {
            trending: kpis.trending,
            total: kpis.total_tracked,
        });
    }

    check_platform_share(&snapshot.platform_share, catalog, &mut violations);

    let trend = &snapshot.category_trend;
    if trend.labels != product.categories {
        violations.push(Violation::CategoryLabels {
            expected: product.categories.clone(),
            found: trend.labels.clone(),
        });
    }
    if trend.labels.len() != trend.change_pct.len() {
        violations.push(Violation::CategoryLength {
            labels: trend.labels.len(),
            values: trend.change_pct.len(),
        });
    }

    let forecast = &snapshot.forecast;
    if forecast.current_values.len() != forecast.labels.len()
        || forecast.forecast_values.len() != forecast.labels.len()
    {
        violations.push(Violation::ForecastLength {
            labels: forecast.labels.len(),
            current: forecast.current_values.len(),
            forecast: forecast.forecast_values.len(),
        });
    }
    for (index, (current, projected)) in forecast
        .current_values
        .iter()
        .zip(&forecast.forecast_values)
        .enumerate()
    {
        if projected < current {
            violations.push(Violation::ForecastBelowCurrent {
                index,
                current: *current,
                forecast: *projected,
            });
        }
    }

    let timeline = &snapshot.timeline;
    for (series, found) in [
        ("timeline.labels", timeline.labels.len()),
        ("timeline.sales", timeline.sales.len()),
        ("timeline.growth_pct", timeline.growth_pct.len()),
        ("timeline.share_pct", timeline.share_pct.len()),
        ("delivery.series", snapshot.delivery.series.len()),
    ] {
        if found != TIMELINE_DAYS {
            violations.push(Violation::SeriesLength {
                series,
                expected: TIMELINE_DAYS,
                found,
            });
        }
    }

    let expected_regions: BTreeSet<&str> =
        catalog.concrete_regions().map(|r| r.id.as_str()).collect();
    let found_regions: BTreeSet<&str> = snapshot.regions.keys().map(String::as_str).collect();
    if expected_regions != found_regions {
        violations.push(Violation::RegionSet {
            missing: expected_regions
                .difference(&found_regions)
                .map(|id| id.to_string())
                .collect(),
            unexpected: found_regions
                .difference(&expected_regions)
                .map(|id| id.to_string())
                .collect(),
        });
    }

    if snapshot.competitors != product.competitors {
        violations.push(Violation::Competitors {
            product: product.id.clone(),
        });
    }

    if let Some(region) = catalog.region(&key.region).filter(|r| r.is_concrete()) {
        if kpis.top_region_label != region.label {
            violations.push(Violation::TopRegionLabel {
                expected: region.label.clone(),
                found: kpis.top_region_label.clone(),
            });
        }
    }

    violations
}

fn check_platform_share(shares: &[f64], catalog: &ReferenceCatalog, out: &mut Vec<Violation>) {
    if shares.len() != catalog.platforms().len() {
        out.push(Violation::PlatformShareLength {
            expected: catalog.platforms().len(),
            found: shares.len(),
        });
    }
    for (index, value) in shares.iter().copied().enumerate() {
        if value < 0.0 {
            out.push(Violation::NegativePlatformShare { index, value });
        }
    }
    let sum: f64 = shares.iter().sum();
    if (sum - 100.0).abs() > SHARE_SUM_TOLERANCE {
        out.push(Violation::PlatformShareSum { sum });
    }
}

/// Checks the time-window bias bounds: the day window keeps at most 40% of
/// the trending count, the quarter window at least doubles it.
pub fn check_time_bias(before: &Snapshot, after: &Snapshot, key: &SelectionKey) -> Option<Violation> {
    let window = key.time_window()?;
    let before_trending = before.kpis.trending;
    let after_trending = after.kpis.trending;
    let within = match time_window_scale(window) {
        None => after_trending == before_trending,
        Some(scale) if scale.factor < 1.0 => {
            f64::from(after_trending) <= 0.4 * f64::from(before_trending)
        }
        Some(scale) if scale.factor >= 2.0 => {
            f64::from(after_trending) >= 2.0 * f64::from(before_trending)
        }
        Some(_) => after_trending >= before_trending,
    };
    (!within).then(|| Violation::TimeBiasBounds {
        window: window.as_str(),
        before: before_trending,
        after: after_trending,
    })
}

pub fn check_determinism(first: &str, second: &str) -> Option<Violation> {
    (first != second).then(|| Violation::NonDeterministic {
        first: first.to_string(),
        second: second.to_string(),
    })
}
