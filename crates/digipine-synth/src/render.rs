use std::fmt::Write as _;

use crate::catalog::ReferenceCatalog;
use crate::data::snapshot::{Snapshot, TimelineMetric};
use crate::error::SynthResult;
use crate::stats::summarize;

pub trait Renderer {
    fn render(&self, snapshot: &Snapshot) -> SynthResult<String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, snapshot: &Snapshot) -> SynthResult<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(snapshot)?
        } else {
            serde_json::to_string(snapshot)?
        };
        Ok(text)
    }
}

/// Plain-text KPI board, the same strings the dashboard binds into its cards.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    pub metric: TimelineMetric,
    pub platform_labels: Vec<String>,
}

impl TextRenderer {
    pub fn new(catalog: &ReferenceCatalog, metric: TimelineMetric) -> Self {
        Self {
            metric,
            platform_labels: catalog.platforms().iter().map(|p| p.label.clone()).collect(),
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&self, snapshot: &Snapshot) -> SynthResult<String> {
        let mut out = String::new();
        let kpis = &snapshot.kpis;
        let _ = writeln!(out, "Products tracked: {}", format_thousands(kpis.total_tracked));
        let _ = writeln!(out, "Trending: {}", kpis.trending);
        let _ = writeln!(out, "Top region: {}", kpis.top_region_label);
        let _ = writeln!(out, "Market growth: {}", format_pct(kpis.market_growth_pct));

        let _ = writeln!(out, "\nPlatform share");
        for (i, share) in snapshot.platform_share.iter().enumerate() {
            let label = self
                .platform_labels
                .get(i)
                .map(String::as_str)
                .unwrap_or("?");
            let _ = writeln!(out, "  {label}: {}", format_pct(*share));
        }

        let _ = writeln!(out, "\nCategory growth");
        for (label, change) in snapshot
            .category_trend
            .labels
            .iter()
            .zip(&snapshot.category_trend.change_pct)
        {
            let _ = writeln!(out, "  {label}: +{}", format_pct(*change));
        }

        let _ = writeln!(out, "\nForecast insights");
        for note in &snapshot.forecast.notes {
            let _ = writeln!(out, "  - {note}");
        }

        let series = snapshot.timeline.series(self.metric);
        if let Some(summary) = summarize(&series) {
            let _ = writeln!(
                out,
                "\n{} ({} days): min {} / max {} / mean {:.1} / median {}",
                self.metric.label(),
                summary.count,
                summary.min,
                summary.max,
                summary.mean,
                summary.median
            );
        }

        let delivery = &snapshot.delivery;
        let _ = writeln!(out, "\nAvg delivery time: {} min", delivery.avg_time_minutes);
        let _ = writeln!(out, "On-time rate: {}", format_pct(delivery.on_time_pct));
        let _ = writeln!(
            out,
            "Verified: {} / Flagged: {}",
            format_thousands(snapshot.fraud.verified_count),
            format_thousands(snapshot.fraud.flagged_count)
        );

        let _ = writeln!(out, "\nCompetitors");
        for competitor in &snapshot.competitors {
            let _ = writeln!(out, "  {}: {}", competitor.name, competitor.strategy);
        }
        Ok(out)
    }
}

/// `2345` -> `"2,345"`.
pub fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_pct(value: f64) -> String {
    format!("{value}%")
}
