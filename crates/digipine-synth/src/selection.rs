use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ALL_REGIONS_ID;
use crate::error::{SynthError, SynthResult};

pub const ALL_PLATFORMS_ID: &str = "all";

/// The four dashboard filters. Every generated value is derived from this
/// tuple, so two equal keys always produce the same snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    pub product: String,
    pub region: String,
    pub time_window: String,
    pub platform: String,
}

impl Default for SelectionKey {
    fn default() -> Self {
        Self {
            product: "cocacola".to_string(),
            region: ALL_REGIONS_ID.to_string(),
            time_window: TimeWindow::Week.as_str().to_string(),
            platform: ALL_PLATFORMS_ID.to_string(),
        }
    }
}

impl SelectionKey {
    pub fn new(
        product: impl Into<String>,
        region: impl Into<String>,
        time_window: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            region: region.into(),
            time_window: time_window.into(),
            platform: platform.into(),
        }
    }

    pub fn seed_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.product, self.region, self.time_window, self.platform
        )
    }

    pub fn region_seed_key(&self) -> String {
        format!("{}|region", self.seed_key())
    }

    pub fn has_region_filter(&self) -> bool {
        self.region != ALL_REGIONS_ID
    }

    pub fn has_platform_filter(&self) -> bool {
        self.platform != ALL_PLATFORMS_ID
    }

    /// `None` for identifiers outside the known windows.
    pub fn time_window(&self) -> Option<TimeWindow> {
        TimeWindow::parse(&self.time_window).ok()
    }

    /// File-name friendly form, e.g. `cocacola-all-7days-all`.
    pub fn slug(&self) -> String {
        [
            &self.product,
            &self.region,
            &self.time_window,
            &self.platform,
        ]
        .iter()
        .map(|part| {
            part.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '_') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("-")
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.seed_key())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7days")]
    Week,
    #[serde(rename = "30days")]
    Month,
    #[serde(rename = "90days")]
    Quarter,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [Self::Day, Self::Week, Self::Month, Self::Quarter];

    pub fn parse(value: &str) -> SynthResult<Self> {
        match value {
            "24h" => Ok(Self::Day),
            "7days" => Ok(Self::Week),
            "30days" => Ok(Self::Month),
            "90days" => Ok(Self::Quarter),
            other => Err(SynthError::InvalidArgument(format!(
                "unknown time_window '{other}' (expected one of: 24h, 7days, 30days, 90days)"
            ))),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7days",
            Self::Month => "30days",
            Self::Quarter => "90days",
        }
    }
}
