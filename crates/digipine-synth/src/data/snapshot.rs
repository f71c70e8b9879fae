use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::Competitor;
use crate::error::SynthResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_tracked: u32,
    pub trending: u32,
    pub top_region_label: String,
    pub market_growth_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
    pub labels: Vec<String>,
    pub change_pct: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub labels: Vec<String>,
    pub current_values: Vec<u32>,
    pub forecast_values: Vec<u32>,
    pub notes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub labels: Vec<String>,
    pub sales: Vec<u32>,
    pub growth_pct: Vec<f64>,
    pub share_pct: Vec<f64>,
}

impl Timeline {
    pub fn series(&self, metric: TimelineMetric) -> Vec<f64> {
        match metric {
            TimelineMetric::Sales => self.sales.iter().copied().map(f64::from).collect(),
            TimelineMetric::Growth => self.growth_pct.clone(),
            TimelineMetric::MarketShare => self.share_pct.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub avg_time_minutes: f64,
    pub on_time_pct: f64,
    pub series: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraud {
    pub verified_count: u32,
    pub flagged_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub products_tracked: u32,
    pub trending_count: u32,
    pub growth_pct: f64,
}

impl RegionStats {
    /// Map color score: growth plus one point per twenty trending products.
    pub fn performance_score(&self) -> f64 {
        self.growth_pct + f64::from(self.trending_count) / 20.0
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kpis: Kpis,
    pub platform_share: Vec<f64>,
    pub category_trend: CategoryTrend,
    pub forecast: Forecast,
    pub timeline: Timeline,
    pub delivery: Delivery,
    pub fraud: Fraud,
    pub regions: BTreeMap<String, RegionStats>,
    pub competitors: Vec<Competitor>,
}

impl Snapshot {
    /// Lowercase hex SHA-256 of the snapshot's JSON encoding.
    pub fn fingerprint(&self) -> SynthResult<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(format!("{digest:x}"))
    }
}

/// Which timeline series a chart shows.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineMetric {
    #[default]
    Sales,
    Growth,
    MarketShare,
}

impl TimelineMetric {
    /// Unknown names fall back to sales, like the dashboard's metric toggle.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "growth" => Self::Growth,
            "market-share" | "marketShare" | "market_share" => Self::MarketShare,
            _ => Self::Sales,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sales => "Sales Volume",
            Self::Growth => "Growth Rate (%)",
            Self::MarketShare => "Market Share (%)",
        }
    }
}
