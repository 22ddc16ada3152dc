//! Average Directional Index (ADX) indicator.

use super::smoothing::{safe_div, wilder_smooth};
use crate::error::{Result, SignalError};
use crate::services::signals::{clamp_score, crossover, make_signal_output, Signal};
use crate::types::{
    resolve_bars, Bar, Crossover, PricePoint, SignalCategory, SignalOutput, Trend,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// ADX values for one bar. DI lines start at `period - 1`, ADX at `2 * period - 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdxPoint {
    pub date: String,
    pub price: f64,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
}

/// Trend strength bands read off the ADX value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
}

impl TrendStrength {
    pub fn from_adx(adx: f64) -> Self {
        if adx >= 50.0 {
            TrendStrength::VeryStrong
        } else if adx >= 25.0 {
            TrendStrength::Strong
        } else if adx >= 20.0 {
            TrendStrength::Moderate
        } else {
            TrendStrength::Weak
        }
    }
}

/// Classification of the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdxAnalysis {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub strength: TrendStrength,
    pub direction: Trend,
    pub signal: Crossover,
}

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength (not direction):
/// - Below 20: Weak trend / ranging market
/// - 20-25: Moderate
/// - 25-50: Strong
/// - Above 50: Very strong
///
/// Combined with +DI and -DI for direction.
pub struct Adx {
    period: usize,
    synthetic_range: f64,
    name: String,
}

impl Default for Adx {
    fn default() -> Self {
        Self {
            period: 14,
            synthetic_range: crate::config::DEFAULT_SYNTHETIC_RANGE,
            name: "ADX (14)".to_string(),
        }
    }
}

impl Adx {
    pub fn new(period: usize, synthetic_range: f64) -> Result<Self> {
        if period == 0 {
            return Err(SignalError::invalid_period("adx", period));
        }
        Ok(Self {
            period,
            synthetic_range,
            name: format!("ADX ({})", period),
        })
    }

    /// Calculate True Range.
    fn true_range(current: &Bar, previous: &Bar) -> f64 {
        let hl = current.high - current.low;
        let hc = (current.high - previous.close).abs();
        let lc = (current.low - previous.close).abs();
        hl.max(hc).max(lc)
    }

    /// Per-bar ADX and DI lines, index-aligned with `points`.
    /// Empty when there is less than `2 * period` bars of history.
    pub fn series(&self, points: &[PricePoint]) -> Vec<AdxPoint> {
        if points.len() < self.min_periods() {
            debug!(
                "ADX needs {} points, have {}",
                self.min_periods(),
                points.len()
            );
            return Vec::new();
        }

        self.compute(points).unwrap_or_else(|e| {
            warn!("ADX calculation failed: {}", e);
            Vec::new()
        })
    }

    fn compute(&self, points: &[PricePoint]) -> Result<Vec<AdxPoint>> {
        let bars = resolve_bars(points, self.synthetic_range);
        let n = bars.len();
        let period = self.period;

        let mut tr = vec![0.0; n];
        let mut plus_dm = vec![0.0; n];
        let mut minus_dm = vec![0.0; n];

        // First bar has no previous close
        tr[0] = bars[0].high - bars[0].low;

        for i in 1..n {
            let current = &bars[i];
            let previous = &bars[i - 1];

            let up_move = current.high - previous.high;
            let down_move = previous.low - current.low;

            if up_move > down_move && up_move > 0.0 {
                plus_dm[i] = up_move;
            }
            if down_move > up_move && down_move > 0.0 {
                minus_dm[i] = down_move;
            }

            tr[i] = Self::true_range(current, previous);
        }

        let smoothed_tr = wilder_smooth(&tr, period)?;
        let smoothed_plus_dm = wilder_smooth(&plus_dm, period)?;
        let smoothed_minus_dm = wilder_smooth(&minus_dm, period)?;

        let mut plus_di = vec![0.0; n];
        let mut minus_di = vec![0.0; n];
        let mut dx = vec![0.0; n];

        for i in (period - 1)..n {
            plus_di[i] = 100.0 * safe_div(smoothed_plus_dm[i], smoothed_tr[i]);
            minus_di[i] = 100.0 * safe_div(smoothed_minus_dm[i], smoothed_tr[i]);
            dx[i] = 100.0 * safe_div((plus_di[i] - minus_di[i]).abs(), plus_di[i] + minus_di[i]);
        }

        // DX is smoothed with the same accumulator, so the result is scaled
        // back down by the period once the second warm-up has passed.
        let adx_sum = wilder_smooth(&dx, period)?;
        let adx_start = 2 * period - 2;

        let result = points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let di_valid = i + 1 >= period;
                AdxPoint {
                    date: point.date.clone(),
                    price: point.price,
                    adx: (i >= adx_start).then(|| adx_sum[i] / period as f64),
                    plus_di: di_valid.then_some(plus_di[i]),
                    minus_di: di_valid.then_some(minus_di[i]),
                }
            })
            .collect();

        Ok(result)
    }

    /// Classify the latest bar. `None` when there is not enough history.
    pub fn analyze(&self, points: &[PricePoint]) -> Option<AdxAnalysis> {
        let series = self.series(points);
        let current = series.last()?;
        let previous = series.get(series.len().checked_sub(2)?)?;

        let adx = current.adx?;
        let plus_di = current.plus_di?;
        let minus_di = current.minus_di?;

        let signal = match (previous.plus_di, previous.minus_di) {
            (Some(prev_plus), Some(prev_minus)) => {
                crossover(prev_plus, prev_minus, plus_di, minus_di)
            }
            _ => Crossover::None,
        };

        Some(AdxAnalysis {
            adx,
            plus_di,
            minus_di,
            strength: TrendStrength::from_adx(adx),
            direction: Trend::compare(plus_di, minus_di),
            signal,
        })
    }

    /// Score an analysis produced by [`Adx::analyze`].
    pub fn signal(&self, analysis: &AdxAnalysis) -> SignalOutput {
        // ADX < 20 means no tradable trend. Above that, direction from the
        // DI lines scaled by strength (ADX 50 = full signal).
        let trend_strength = (analysis.adx / 50.0).min(1.0);
        let direction = match analysis.direction {
            Trend::Bullish => 1.0,
            Trend::Bearish => -1.0,
            Trend::Neutral => 0.0,
        };

        let score = if analysis.strength == TrendStrength::Weak {
            0.0
        } else {
            direction * trend_strength * 100.0
        };

        make_signal_output(
            self.name(),
            self.category(),
            analysis.adx,
            clamp_score(score),
        )
    }
}

impl Signal for Adx {
    fn id(&self) -> &str {
        "adx"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Trend
    }

    fn min_periods(&self) -> usize {
        self.period * 2
    }

    fn calculate(&self, points: &[PricePoint]) -> Option<SignalOutput> {
        self.analyze(points).map(|analysis| self.signal(&analysis))
    }
}
