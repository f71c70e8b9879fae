use tracing::{debug, warn};

use super::ranges::{
    round_tenths, REGION_BIAS_GROWTH, REGION_BIAS_TOTAL, REGION_BIAS_TRENDING,
    REGION_BIAS_TRENDING_FLOOR,
};
use super::rng::XorShift32;
use super::snapshot::Snapshot;
use crate::catalog::ReferenceCatalog;
use crate::selection::{SelectionKey, TimeWindow};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendingScale {
    pub factor: f64,
    pub floor: Option<u32>,
}

impl TrendingScale {
    pub fn apply(&self, trending: u32) -> u32 {
        let scaled = (f64::from(trending) * self.factor).round() as u32;
        match self.floor {
            Some(floor) => scaled.max(floor),
            None => scaled,
        }
    }
}

/// Trending multiplier for a window; `None` for the default week.
pub fn time_window_scale(window: TimeWindow) -> Option<TrendingScale> {
    match window {
        TimeWindow::Day => Some(TrendingScale {
            factor: 0.35,
            floor: Some(20),
        }),
        TimeWindow::Week => None,
        TimeWindow::Month => Some(TrendingScale {
            factor: 1.6,
            floor: None,
        }),
        TimeWindow::Quarter => Some(TrendingScale {
            factor: 2.6,
            floor: None,
        }),
    }
}

/// Region bias then time-window bias.
pub fn apply_bias(snapshot: Snapshot, key: &SelectionKey, catalog: &ReferenceCatalog) -> Snapshot {
    let snapshot = apply_region_bias(snapshot, key, catalog);
    apply_time_bias(snapshot, key)
}

pub fn apply_region_bias(
    mut snapshot: Snapshot,
    key: &SelectionKey,
    catalog: &ReferenceCatalog,
) -> Snapshot {
    if !key.has_region_filter() {
        return snapshot;
    }
    let Some(region) = catalog.region(&key.region).filter(|r| r.is_concrete()) else {
        warn!(region = %key.region, "unknown region, no region bias applied");
        return snapshot;
    };

    let unit = XorShift32::from_text(&key.region_seed_key()).next_f64();
    let kpis = &mut snapshot.kpis;
    kpis.total_tracked =
        (f64::from(kpis.total_tracked) * REGION_BIAS_TOTAL.at(unit)).round() as u32;
    kpis.trending = ((f64::from(kpis.trending) * REGION_BIAS_TRENDING.at(unit)).round() as u32)
        .max(REGION_BIAS_TRENDING_FLOOR);
    kpis.top_region_label = region.label.clone();
    kpis.market_growth_pct = round_tenths(kpis.market_growth_pct * REGION_BIAS_GROWTH.at(unit));
    debug!(region = %region.id, unit, "applied region bias");
    snapshot
}

pub fn apply_time_bias(mut snapshot: Snapshot, key: &SelectionKey) -> Snapshot {
    let Some(window) = key.time_window() else {
        warn!(time_window = %key.time_window, "unknown time window, no time bias applied");
        return snapshot;
    };
    if let Some(scale) = time_window_scale(window) {
        snapshot.kpis.trending = scale.apply(snapshot.kpis.trending);
        debug!(window = window.as_str(), factor = scale.factor, "applied time-window bias");
    }
    snapshot
}
