use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, warn};

use super::bias::apply_bias;
use super::ranges::{
    self, round_tenths, RangeSpec, PLATFORM_BOOST, PLATFORM_REMAINDER_FLOOR,
    PLATFORM_SHARE_RANGES, PLATFORM_SHRINK, TIMELINE_DAYS, TRENDING_FLOOR,
};
use super::rng::XorShift32;
use super::snapshot::{
    CategoryTrend, Delivery, Forecast, Fraud, Kpis, RegionStats, Snapshot, Timeline,
};
use crate::catalog::{Product, ReferenceCatalog};
use crate::error::{SynthError, SynthResult};
use crate::selection::SelectionKey;

const TOP_REGION_CANDIDATES: [&str; 5] = [
    "Mumbai North",
    "Delhi NCR",
    "Bengaluru",
    "Hyderabad",
    "Pune",
];

const FORECAST_LABELS: [&str; 6] = [
    "Electronics",
    "Groceries",
    "Fashion",
    "Beauty",
    "Home",
    "Food",
];

const NOTE_CHOICES: [(&str, &str); 2] = [
    ("Weekend uplift expected (+8–15%)", "Mid-week promo lift likely"),
    ("North cluster to lead sales", "Tier-1 metros > Tier-2 by ~1.3x"),
];

const TIMELINE_LABEL_FORMAT: &str = "%b %-d";

/// Unbiased snapshot for `key`, with the timeline ending today.
pub fn synthesize(key: &SelectionKey, catalog: &ReferenceCatalog) -> Snapshot {
    synthesize_on(key, catalog, Local::now().date_naive())
}

/// Unbiased snapshot for `key` with the timeline ending on `today`.
///
/// Unknown products fall back to the catalog's default product.
pub fn synthesize_on(key: &SelectionKey, catalog: &ReferenceCatalog, today: NaiveDate) -> Snapshot {
    let product = catalog.product(&key.product).unwrap_or_else(|| {
        let fallback = catalog.default_product();
        warn!(
            product = %key.product,
            fallback = %fallback.id,
            "unknown product, using default"
        );
        fallback
    });
    build_snapshot(key, catalog, product, today)
}

/// Like [`synthesize_on`] but rejects products missing from the catalog.
pub fn try_synthesize_on(
    key: &SelectionKey,
    catalog: &ReferenceCatalog,
    today: NaiveDate,
) -> SynthResult<Snapshot> {
    let product = catalog
        .product(&key.product)
        .ok_or_else(|| SynthError::UnknownProduct(key.product.clone()))?;
    Ok(build_snapshot(key, catalog, product, today))
}

/// Synthesis followed by the region and time-window bias.
pub fn generate_on(key: &SelectionKey, catalog: &ReferenceCatalog, today: NaiveDate) -> Snapshot {
    apply_bias(synthesize_on(key, catalog, today), key, catalog)
}

pub fn generate(key: &SelectionKey, catalog: &ReferenceCatalog) -> Snapshot {
    generate_on(key, catalog, Local::now().date_naive())
}

fn build_snapshot(
    key: &SelectionKey,
    catalog: &ReferenceCatalog,
    product: &Product,
    today: NaiveDate,
) -> Snapshot {
    let seed_key = key.seed_key();
    let mut rng = XorShift32::from_text(&seed_key);
    debug!(selection = %seed_key, product = %product.id, "synthesizing snapshot");

    // Draw order is part of the output contract: every value below depends
    // on how many draws came before it.
    let kpis = draw_kpis(&mut rng);
    let platform_share = draw_platform_share(&mut rng, boosted_platform(key, catalog));

    let category_trend = CategoryTrend {
        labels: product.categories.clone(),
        change_pct: draw_many(&mut rng, ranges::CATEGORY_CHANGE, product.categories.len()),
    };

    let current_values: Vec<u32> = (0..FORECAST_LABELS.len())
        .map(|_| ranges::FORECAST_CURRENT.draw_u32(&mut rng))
        .collect();
    let forecast_values: Vec<u32> = current_values
        .iter()
        .map(|current| current + ranges::FORECAST_DELTA.draw_u32(&mut rng))
        .collect();

    let labels = timeline_labels(today);
    let timeline = Timeline {
        sales: (0..TIMELINE_DAYS)
            .map(|_| ranges::TIMELINE_SALES.draw_u32(&mut rng))
            .collect(),
        growth_pct: draw_many(&mut rng, ranges::TIMELINE_GROWTH, TIMELINE_DAYS),
        share_pct: draw_many(&mut rng, ranges::TIMELINE_SHARE, TIMELINE_DAYS),
        labels,
    };

    let delivery = Delivery {
        avg_time_minutes: ranges::DELIVERY_AVG_TIME.draw(&mut rng),
        on_time_pct: ranges::DELIVERY_ON_TIME.draw(&mut rng),
        series: draw_many(&mut rng, ranges::DELIVERY_SERIES, TIMELINE_DAYS),
    };

    let fraud = Fraud {
        verified_count: ranges::FRAUD_VERIFIED.draw_u32(&mut rng),
        flagged_count: ranges::FRAUD_FLAGGED.draw_u32(&mut rng),
    };

    let mut regions = BTreeMap::new();
    for region in catalog.concrete_regions() {
        let products_tracked = ranges::REGION_PRODUCTS.draw_u32(&mut rng);
        let fraction = ranges::REGION_TRENDING_FRACTION.draw(&mut rng);
        let trending_count = (f64::from(products_tracked) * fraction).round() as u32;
        let growth_pct = ranges::REGION_GROWTH.draw(&mut rng);
        regions.insert(
            region.id.clone(),
            RegionStats {
                products_tracked,
                trending_count,
                growth_pct,
            },
        );
    }

    let notes = NOTE_CHOICES
        .iter()
        .map(|(high, low)| {
            if rng.next_f64() > 0.5 {
                high.to_string()
            } else {
                low.to_string()
            }
        })
        .collect();

    Snapshot {
        kpis,
        platform_share,
        category_trend,
        forecast: Forecast {
            labels: FORECAST_LABELS.iter().map(|l| l.to_string()).collect(),
            current_values,
            forecast_values,
            notes,
        },
        timeline,
        delivery,
        fraud,
        regions,
        competitors: product.competitors.clone(),
    }
}

fn draw_kpis(rng: &mut XorShift32) -> Kpis {
    let total_tracked = ranges::TOTAL_TRACKED.draw_u32(rng);
    let fraction = ranges::TRENDING_FRACTION.draw(rng);
    let trending = ((f64::from(total_tracked) * fraction).floor() as u32).max(TRENDING_FLOOR);
    let top_region_label = TOP_REGION_CANDIDATES[rng.pick_index(TOP_REGION_CANDIDATES.len())];
    Kpis {
        total_tracked,
        trending,
        top_region_label: top_region_label.to_string(),
        market_growth_pct: ranges::MARKET_GROWTH.draw(rng),
    }
}

fn draw_many(rng: &mut XorShift32, spec: RangeSpec, count: usize) -> Vec<f64> {
    (0..count).map(|_| spec.draw(rng)).collect()
}

/// Index of the platform whose tab is active, if selecting it boosts its share.
fn boosted_platform(key: &SelectionKey, catalog: &ReferenceCatalog) -> Option<usize> {
    if !key.has_platform_filter() {
        return None;
    }
    match catalog.platform_index(&key.platform) {
        Some(idx) if catalog.platforms()[idx].boostable => Some(idx),
        Some(_) => None,
        None => {
            warn!(platform = %key.platform, "unknown platform, no share boost applied");
            None
        }
    }
}

fn draw_platform_share(rng: &mut XorShift32, boosted: Option<usize>) -> Vec<f64> {
    let mut raw: Vec<f64> = PLATFORM_SHARE_RANGES.iter().map(|spec| spec.draw(rng)).collect();
    let leading: f64 = raw.iter().sum();
    raw.push((100.0 - leading).max(PLATFORM_REMAINDER_FLOOR));

    let mut shares: Vec<f64> = raw.into_iter().map(round_tenths).collect();
    if let Some(idx) = boosted {
        for (i, share) in shares.iter_mut().enumerate() {
            let factor = if i == idx { PLATFORM_BOOST } else { PLATFORM_SHRINK };
            *share = round_tenths(*share * factor);
        }
    }
    renormalize(&mut shares);
    shares
}

/// Rescales `shares` to sum to 100, one decimal each.
fn renormalize(shares: &mut [f64]) {
    let sum: f64 = shares.iter().sum();
    if sum <= 0.0 {
        return;
    }
    for share in shares.iter_mut() {
        *share = round_tenths(*share * 100.0 / sum).max(0.0);
    }
}

fn timeline_labels(today: NaiveDate) -> Vec<String> {
    (0..TIMELINE_DAYS)
        .rev()
        .map(|days_back| {
            (today - Duration::days(days_back as i64))
                .format(TIMELINE_LABEL_FORMAT)
                .to_string()
        })
        .collect()
}
