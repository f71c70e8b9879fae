use super::rng::XorShift32;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rounding {
    /// Keep the raw value; used for scale factors.
    Raw,
    Floor,
    Nearest,
    /// One decimal place.
    Tenths,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Raw => value,
            Self::Floor => value.floor(),
            Self::Nearest => value.round(),
            Self::Tenths => round_tenths(value),
        }
    }
}

/// One decimal place, rounded on the exact decimal expansion of `value` with
/// ties away from zero. Scaling by ten first can itself round onto a tie.
pub fn round_tenths(value: f64) -> f64 {
    // Only multiples of 0.25 sit exactly on a tie, and those scale exactly.
    if (value * 4.0).fract() == 0.0 {
        return (value * 10.0).round() / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSpec {
    pub min: f64,
    pub span: f64,
    pub rounding: Rounding,
}

impl RangeSpec {
    pub const fn new(min: f64, span: f64, rounding: Rounding) -> Self {
        Self {
            min,
            span,
            rounding,
        }
    }

    pub fn max(&self) -> f64 {
        self.min + self.span
    }

    /// Maps an already drawn unit value into the range.
    pub fn at(&self, unit: f64) -> f64 {
        self.rounding.apply(self.min + unit * self.span)
    }

    pub fn draw(&self, rng: &mut XorShift32) -> f64 {
        self.at(rng.next_f64())
    }

    /// Draw for integer-valued ranges. All such ranges are non-negative.
    pub fn draw_u32(&self, rng: &mut XorShift32) -> u32 {
        self.draw(rng) as u32
    }
}

pub const TOTAL_TRACKED: RangeSpec = RangeSpec::new(2400.0, 900.0, Rounding::Floor);
pub const TRENDING_FRACTION: RangeSpec = RangeSpec::new(0.07, 0.06, Rounding::Raw);
pub const TRENDING_FLOOR: u32 = 60;
pub const MARKET_GROWTH: RangeSpec = RangeSpec::new(10.0, 18.0, Rounding::Tenths);

/// Shares of every platform but the last; the last takes the remainder.
pub const PLATFORM_SHARE_RANGES: [RangeSpec; 3] = [
    RangeSpec::new(28.0, 14.0, Rounding::Raw),
    RangeSpec::new(24.0, 12.0, Rounding::Raw),
    RangeSpec::new(18.0, 12.0, Rounding::Raw),
];
pub const PLATFORM_REMAINDER_FLOOR: f64 = 8.0;
pub const PLATFORM_BOOST: f64 = 1.18;
pub const PLATFORM_SHRINK: f64 = 0.92;

pub const CATEGORY_CHANGE: RangeSpec = RangeSpec::new(15.0, 25.0, Rounding::Tenths);

pub const FORECAST_CURRENT: RangeSpec = RangeSpec::new(180.0, 220.0, Rounding::Nearest);
pub const FORECAST_DELTA: RangeSpec = RangeSpec::new(40.0, 120.0, Rounding::Nearest);

pub const TIMELINE_DAYS: usize = 30;
pub const TIMELINE_SALES: RangeSpec = RangeSpec::new(200.0, 500.0, Rounding::Nearest);
pub const TIMELINE_GROWTH: RangeSpec = RangeSpec::new(1.0, 6.0, Rounding::Tenths);
pub const TIMELINE_SHARE: RangeSpec = RangeSpec::new(5.0, 10.0, Rounding::Tenths);

pub const DELIVERY_AVG_TIME: RangeSpec = RangeSpec::new(10.5, 6.0, Rounding::Tenths);
pub const DELIVERY_ON_TIME: RangeSpec = RangeSpec::new(90.0, 8.0, Rounding::Tenths);
pub const DELIVERY_SERIES: RangeSpec = RangeSpec::new(9.0, 8.0, Rounding::Tenths);

pub const FRAUD_VERIFIED: RangeSpec = RangeSpec::new(2400.0, 1200.0, Rounding::Nearest);
pub const FRAUD_FLAGGED: RangeSpec = RangeSpec::new(40.0, 120.0, Rounding::Nearest);

pub const REGION_PRODUCTS: RangeSpec = RangeSpec::new(350.0, 600.0, Rounding::Nearest);
pub const REGION_TRENDING_FRACTION: RangeSpec = RangeSpec::new(0.08, 0.07, Rounding::Raw);
pub const REGION_GROWTH: RangeSpec = RangeSpec::new(12.0, 14.0, Rounding::Tenths);

pub const REGION_BIAS_TOTAL: RangeSpec = RangeSpec::new(0.85, 0.4, Rounding::Raw);
pub const REGION_BIAS_TRENDING: RangeSpec = RangeSpec::new(0.80, 0.5, Rounding::Raw);
pub const REGION_BIAS_TRENDING_FLOOR: u32 = 30;
pub const REGION_BIAS_GROWTH: RangeSpec = RangeSpec::new(0.90, 0.3, Rounding::Raw);

/// Named view of the table, in draw order.
pub fn table() -> Vec<(&'static str, RangeSpec)> {
    vec![
        ("total_tracked", TOTAL_TRACKED),
        ("trending_fraction", TRENDING_FRACTION),
        ("market_growth_pct", MARKET_GROWTH),
        ("platform_share[0]", PLATFORM_SHARE_RANGES[0]),
        ("platform_share[1]", PLATFORM_SHARE_RANGES[1]),
        ("platform_share[2]", PLATFORM_SHARE_RANGES[2]),
        ("category_change_pct", CATEGORY_CHANGE),
        ("forecast_current", FORECAST_CURRENT),
        ("forecast_delta", FORECAST_DELTA),
        ("timeline_sales", TIMELINE_SALES),
        ("timeline_growth_pct", TIMELINE_GROWTH),
        ("timeline_share_pct", TIMELINE_SHARE),
        ("delivery_avg_time_minutes", DELIVERY_AVG_TIME),
        ("delivery_on_time_pct", DELIVERY_ON_TIME),
        ("delivery_series", DELIVERY_SERIES),
        ("fraud_verified", FRAUD_VERIFIED),
        ("fraud_flagged", FRAUD_FLAGGED),
        ("region_products", REGION_PRODUCTS),
        ("region_trending_fraction", REGION_TRENDING_FRACTION),
        ("region_growth_pct", REGION_GROWTH),
        ("region_bias_total", REGION_BIAS_TOTAL),
        ("region_bias_trending", REGION_BIAS_TRENDING),
        ("region_bias_growth", REGION_BIAS_GROWTH),
    ]
}
