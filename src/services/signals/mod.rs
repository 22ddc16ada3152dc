//! Trading signals service module.
//!
//! Provides technical indicator calculations, composite scoring,
//! and the heuristic sentiment and prediction scorers.

pub mod engine;
pub mod indicators;
pub mod predictions;
pub mod sentiment;

pub use engine::{MarketReport, SignalEngine};
pub use predictions::predict;
pub use sentiment::score_sentiment;

use crate::types::{
    Crossover, PricePoint, SignalCategory, SignalDirection, SignalOutput,
};

/// Trait for implementing technical indicators.
pub trait Signal: Send + Sync {
    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Category this indicator belongs to.
    fn category(&self) -> SignalCategory;

    /// Minimum number of price points required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the signal from a price history.
    /// Returns None if there is not enough history.
    fn calculate(&self, points: &[PricePoint]) -> Option<SignalOutput>;
}

/// Helper to create a SignalOutput.
pub fn make_signal_output(
    name: &str,
    category: SignalCategory,
    value: f64,
    score: i8,
) -> SignalOutput {
    SignalOutput {
        name: name.to_string(),
        category,
        value,
        score,
        direction: SignalDirection::from_score(score),
    }
}

/// Clamp a value to i8 range.
pub fn clamp_score(value: f64) -> i8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(-100.0, 100.0) as i8
}

/// Detect line `a` crossing line `b` between the previous and current bar.
///
/// The previous bar compares non-strictly and the current bar strictly, so
/// touching and then moving through counts as a cross, while merely touching
/// does not.
pub fn crossover(prev_a: f64, prev_b: f64, cur_a: f64, cur_b: f64) -> Crossover {
    if prev_a <= prev_b && cur_a > cur_b {
        Crossover::Bullish
    } else if prev_a >= prev_b && cur_a < cur_b {
        Crossover::Bearish
    } else {
        Crossover::None
    }
}
