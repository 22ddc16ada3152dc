//! Commodity Channel Index (CCI) indicator.

use super::smoothing::{is_flat, mean_deviation};
use crate::error::{Result, SignalError};
use crate::services::signals::{clamp_score, crossover, make_signal_output, Signal};
use crate::types::{resolve_bars, Bar, Crossover, PricePoint, SignalCategory, SignalOutput};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lambert's constant: scales CCI so most readings fall within ±100.
const CCI_CONSTANT: f64 = 0.015;

/// CCI values for one bar; `cci` is `None` during the first `period - 1` bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CciPoint {
    pub date: String,
    pub price: f64,
    pub typical_price: f64,
    pub cci: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CciZone {
    ExtremeOverbought,
    Overbought,
    Neutral,
    Oversold,
    ExtremeOversold,
}

impl CciZone {
    pub fn from_cci(cci: f64) -> Self {
        if cci > 200.0 {
            CciZone::ExtremeOverbought
        } else if cci > 100.0 {
            CciZone::Overbought
        } else if cci < -200.0 {
            CciZone::ExtremeOversold
        } else if cci < -100.0 {
            CciZone::Oversold
        } else {
            CciZone::Neutral
        }
    }
}

/// Classification of the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CciAnalysis {
    pub cci: f64,
    pub previous: Option<f64>,
    pub zone: CciZone,
    pub signal: Crossover,
}

/// CCI (Commodity Channel Index) indicator.
///
/// Measures the current price level relative to an average price level:
/// CCI = (TP - SMA) / (0.015 * Mean Deviation)
/// where TP = Typical Price = (High + Low + Close) / 3
///
/// Signals:
/// - Crossing back above -100: bullish
/// - Crossing back below +100: bearish
pub struct Cci {
    period: usize,
    synthetic_range: f64,
    name: String,
}

impl Default for Cci {
    fn default() -> Self {
        Self {
            period: 20,
            synthetic_range: crate::config::DEFAULT_SYNTHETIC_RANGE,
            name: "CCI (20)".to_string(),
        }
    }
}

impl Cci {
    pub fn new(period: usize, synthetic_range: f64) -> Result<Self> {
        if period == 0 {
            return Err(SignalError::invalid_period("cci", period));
        }
        Ok(Self {
            period,
            synthetic_range,
            name: format!("CCI ({})", period),
        })
    }

    /// Calculate typical price.
    fn typical_price(bar: &Bar) -> f64 {
        (bar.high + bar.low + bar.close) / 3.0
    }

    /// Per-bar CCI, index-aligned with `points`.
    /// Empty when there are fewer than `period` points.
    pub fn series(&self, points: &[PricePoint]) -> Vec<CciPoint> {
        if points.len() < self.period {
            debug!("CCI needs {} points, have {}", self.period, points.len());
            return Vec::new();
        }

        let typical: Vec<f64> = resolve_bars(points, self.synthetic_range)
            .iter()
            .map(Self::typical_price)
            .collect();

        points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let cci = (i + 1 >= self.period).then(|| {
                    let window = &typical[i + 1 - self.period..=i];
                    let tp_sma = window.iter().sum::<f64>() / self.period as f64;
                    let mean_dev = mean_deviation(window, tp_sma);
                    if is_flat(mean_dev, tp_sma) {
                        0.0
                    } else {
                        (typical[i] - tp_sma) / (CCI_CONSTANT * mean_dev)
                    }
                });
                CciPoint {
                    date: point.date.clone(),
                    price: point.price,
                    typical_price: typical[i],
                    cci,
                }
            })
            .collect()
    }

    /// Classify the latest bar. `None` when there is not enough history.
    pub fn analyze(&self, points: &[PricePoint]) -> Option<CciAnalysis> {
        let series = self.series(points);
        let cci = series.last()?.cci?;
        let previous = series
            .len()
            .checked_sub(2)
            .and_then(|i| series[i].cci);

        let signal = match previous {
            Some(prev) => match (
                crossover(prev, -100.0, cci, -100.0),
                crossover(prev, 100.0, cci, 100.0),
            ) {
                (Crossover::Bullish, _) => Crossover::Bullish,
                (_, Crossover::Bearish) => Crossover::Bearish,
                _ => Crossover::None,
            },
            None => Crossover::None,
        };

        Some(CciAnalysis {
            cci,
            previous,
            zone: CciZone::from_cci(cci),
            signal,
        })
    }

    /// Score an analysis produced by [`Cci::analyze`].
    pub fn signal(&self, analysis: &CciAnalysis) -> SignalOutput {
        let cci = analysis.cci;

        // Below -100 = oversold = bullish
        // Above +100 = overbought = bearish
        let mut score = if cci <= -100.0 {
            ((-100.0 - cci) / 100.0 * 50.0 + 50.0).min(100.0)
        } else if cci >= 100.0 {
            (-((cci - 100.0) / 100.0 * 50.0 + 50.0)).max(-100.0)
        } else {
            -cci / 100.0 * 50.0
        };

        // A fresh exit from an extreme zone is the actionable event
        match analysis.signal {
            Crossover::Bullish => score += 40.0,
            Crossover::Bearish => score -= 40.0,
            Crossover::None => {}
        }

        make_signal_output(
            self.name(),
            self.category(),
            cci,
            clamp_score(score),
        )
    }
}

impl Signal for Cci {
    fn id(&self) -> &str {
        "cci"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, points: &[PricePoint]) -> Option<SignalOutput> {
        self.analyze(points).map(|analysis| self.signal(&analysis))
    }
}
