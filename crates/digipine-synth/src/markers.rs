use serde::{Deserialize, Serialize};

use crate::catalog::ReferenceCatalog;
use crate::data::snapshot::{RegionStats, Snapshot};
use crate::selection::SelectionKey;

const MARKER_MIN_PX: f64 = 24.0;
const MARKER_MAX_PX: f64 = 44.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTier {
    Low,
    Mid,
    High,
}

impl ColorTier {
    pub fn from_score(score: f64) -> Self {
        if score < 15.0 {
            Self::Low
        } else if score < 20.0 {
            Self::Mid
        } else {
            Self::High
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#ef4444",
            Self::Mid => "#f59e0b",
            Self::High => "#10b981",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub region_id: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub display_value: u32,
    pub color_tier: ColorTier,
    pub size_px: f64,
    pub stats: RegionStats,
}

/// One marker per concrete region, in catalog order.
pub fn map_markers(snapshot: &Snapshot, catalog: &ReferenceCatalog) -> Vec<MapMarker> {
    catalog
        .concrete_regions()
        .filter_map(|region| {
            let stats = snapshot.regions.get(&region.id)?;
            let (latitude, longitude) = region.coordinates()?;
            Some(MapMarker {
                region_id: region.id.clone(),
                label: region.label.clone(),
                latitude,
                longitude,
                display_value: stats.products_tracked,
                color_tier: ColorTier::from_score(stats.performance_score()),
                size_px: (f64::from(stats.products_tracked) / 15.0)
                    .clamp(MARKER_MIN_PX, MARKER_MAX_PX),
                stats: stats.clone(),
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneBadge {
    Active,
    Review,
    Critical,
}

impl ZoneBadge {
    pub fn from_growth(growth_pct: f64) -> Self {
        if growth_pct > 22.0 {
            Self::Active
        } else if growth_pct > 17.0 {
            Self::Review
        } else {
            Self::Critical
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Review => "Review",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneCard {
    pub code: String,
    pub badge: ZoneBadge,
    pub orders: u32,
    pub avg_time_minutes: f64,
    pub top_category: String,
}

pub fn zone_cards(snapshot: &Snapshot, catalog: &ReferenceCatalog) -> Vec<ZoneCard> {
    let categories = &snapshot.category_trend.labels;
    catalog
        .concrete_regions()
        .filter_map(|region| snapshot.regions.get(&region.id).map(|stats| (region, stats)))
        .enumerate()
        .map(|(i, (region, stats))| ZoneCard {
            code: region.id.to_uppercase(),
            badge: ZoneBadge::from_growth(stats.growth_pct),
            orders: stats.products_tracked,
            avg_time_minutes: snapshot.delivery.avg_time_minutes,
            top_category: if categories.is_empty() {
                String::new()
            } else {
                categories[i % categories.len()].clone()
            },
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    High,
    Medium,
    Low,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub description: String,
    pub time_ago: String,
}

pub fn alerts(key: &SelectionKey, catalog: &ReferenceCatalog) -> Vec<Alert> {
    let product = catalog
        .product(&key.product)
        .unwrap_or_else(|| catalog.default_product());
    let region_label = catalog
        .region(&key.region)
        .map(|region| region.label.as_str())
        .unwrap_or("metros");
    let delay_region = catalog
        .region("bangalore")
        .or_else(|| catalog.concrete_regions().next())
        .map(|region| region.label.as_str())
        .unwrap_or("metros");

    vec![
        Alert {
            level: AlertLevel::High,
            title: "High Demand Alert".to_string(),
            description: format!("{} spike in {region_label}", product.label),
            time_ago: "2 mins ago".to_string(),
        },
        Alert {
            level: AlertLevel::Medium,
            title: "Delivery Delays".to_string(),
            description: format!("{delay_region} south zone affected"),
            time_ago: "15 mins ago".to_string(),
        },
        Alert {
            level: AlertLevel::Low,
            title: "New Trend Detected".to_string(),
            description: "Organic products rising".to_string(),
            time_ago: "1 hour ago".to_string(),
        },
    ]
}

/// Markers, zones and alerts together, as handed to a map/grid renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub markers: Vec<MapMarker>,
    pub zones: Vec<ZoneCard>,
    pub alerts: Vec<Alert>,
}

pub fn map_view(snapshot: &Snapshot, key: &SelectionKey, catalog: &ReferenceCatalog) -> MapView {
    MapView {
        markers: map_markers(snapshot, catalog),
        zones: zone_cards(snapshot, catalog),
        alerts: alerts(key, catalog),
    }
}
