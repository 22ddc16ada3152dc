use serde::{Deserialize, Serialize};

/// One sample of the price history, oldest first in a series.
///
/// `high`/`low` are optional: the chart endpoint only guarantees a price.
/// Engines that need a range synthesize one around the price with
/// [`PricePoint::high_or`] / [`PricePoint::low_or`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Display label; not guaranteed to be a parseable date.
    pub date: String,
    /// Close price.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
}

impl PricePoint {
    /// Create a point with only a close price.
    pub fn new(date: impl Into<String>, price: f64) -> Self {
        Self {
            date: date.into(),
            price,
            high: None,
            low: None,
        }
    }

    /// Create a point with a real high/low range.
    pub fn with_range(date: impl Into<String>, price: f64, high: f64, low: f64) -> Self {
        Self {
            date: date.into(),
            price,
            high: Some(high),
            low: Some(low),
        }
    }

    /// High price, or `price * (1 + range)` when the sample has none.
    pub fn high_or(&self, range: f64) -> f64 {
        self.high.unwrap_or(self.price * (1.0 + range))
    }

    /// Low price, or `price * (1 - range)` when the sample has none.
    pub fn low_or(&self, range: f64) -> f64 {
        self.low.unwrap_or(self.price * (1.0 - range))
    }
}

/// Resolved high/low/close for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Resolve a whole series into bars, synthesizing missing ranges.
pub fn resolve_bars(points: &[PricePoint], synthetic_range: f64) -> Vec<Bar> {
    points
        .iter()
        .map(|p| Bar {
            high: p.high_or(synthetic_range),
            low: p.low_or(synthetic_range),
            close: p.price,
        })
        .collect()
}
