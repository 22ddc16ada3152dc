//! Bollinger Bands indicator.

use super::smoothing::{is_flat, safe_div, sma, std_dev};
use crate::error::{Result, SignalError};
use crate::services::signals::{clamp_score, make_signal_output, Signal};
use crate::types::{PricePoint, SignalCategory, SignalOutput};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Bandwidths averaged for the squeeze and volatility reading.
const BANDWIDTH_LOOKBACK: usize = 20;

/// Bars that must all hug one band to count as walking it.
const WALK_BARS: usize = 5;

/// Band values for one bar; `None` during the first `period - 1` bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerPoint {
    pub date: String,
    pub price: f64,
    pub middle: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub std_dev: Option<f64>,
    /// (upper - lower) / middle, in percent.
    pub bandwidth: Option<f64>,
    /// Position of price inside the bands, in percent (0 = lower, 100 = upper).
    pub percent_b: Option<f64>,
}

impl BollingerPoint {
    fn is_valid(&self) -> bool {
        self.middle.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandZone {
    Overbought,
    NearUpper,
    Neutral,
    NearLower,
    Oversold,
}

impl BandZone {
    pub fn from_percent_b(percent_b: f64) -> Self {
        if percent_b > 80.0 {
            BandZone::Overbought
        } else if percent_b < 20.0 {
            BandZone::Oversold
        } else if percent_b > 60.0 {
            BandZone::NearUpper
        } else if percent_b < 40.0 {
            BandZone::NearLower
        } else {
            BandZone::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Volatility {
    Low,
    Normal,
    High,
}

/// Price riding one band for several bars in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandWalk {
    WalkingUpper,
    WalkingLower,
    None,
}

/// Classification of the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerAnalysis {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth: f64,
    pub percent_b: f64,
    /// Mean of the last (up to) 20 bandwidths.
    pub average_bandwidth: f64,
    pub zone: BandZone,
    pub squeeze: bool,
    pub volatility: Volatility,
    pub walk: BandWalk,
}

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// Signals:
/// - Price near lower band = oversold (bullish)
/// - Price near upper band = overbought (bearish)
/// - Band squeeze = low volatility, potential breakout
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Result<Self> {
        if period == 0 {
            return Err(SignalError::invalid_period("bollinger", period));
        }
        Ok(Self {
            period,
            std_dev_multiplier,
        })
    }

    /// Per-bar bands, index-aligned with `points`.
    /// Empty when there are fewer than `period` points.
    pub fn series(&self, points: &[PricePoint]) -> Vec<BollingerPoint> {
        if points.len() < self.period {
            debug!("Bollinger needs {} points, have {}", self.period, points.len());
            return Vec::new();
        }

        self.compute(points).unwrap_or_else(|e| {
            warn!("Bollinger calculation failed: {}", e);
            Vec::new()
        })
    }

    fn compute(&self, points: &[PricePoint]) -> Result<Vec<BollingerPoint>> {
        let closes: Vec<f64> = points.iter().map(|p| p.price).collect();
        let middles = sma(&closes, self.period)?;
        let deviations = std_dev(&closes, self.period, &middles)?;

        let result = points
            .iter()
            .zip(middles.iter().zip(deviations.iter()))
            .map(|(point, (middle, sd))| match (middle, sd) {
                (Some(middle), Some(sd)) => {
                    let sd = if is_flat(*sd, *middle) { 0.0 } else { *sd };
                    let upper = middle + self.std_dev_multiplier * sd;
                    let lower = middle - self.std_dev_multiplier * sd;
                    BollingerPoint {
                        date: point.date.clone(),
                        price: point.price,
                        middle: Some(*middle),
                        upper: Some(upper),
                        lower: Some(lower),
                        std_dev: Some(sd),
                        bandwidth: Some(safe_div(upper - lower, *middle) * 100.0),
                        percent_b: Some(safe_div(point.price - lower, upper - lower) * 100.0),
                    }
                }
                _ => BollingerPoint {
                    date: point.date.clone(),
                    price: point.price,
                    middle: None,
                    upper: None,
                    lower: None,
                    std_dev: None,
                    bandwidth: None,
                    percent_b: None,
                },
            })
            .collect();

        Ok(result)
    }

    /// Filtered variant of [`series`](Self::series) without the warm-up bars.
    pub fn valid_series(&self, points: &[PricePoint]) -> Vec<BollingerPoint> {
        self.series(points)
            .into_iter()
            .filter(BollingerPoint::is_valid)
            .collect()
    }

    /// Classify the latest bar. `None` when there is not enough history.
    pub fn analyze(&self, points: &[PricePoint]) -> Option<BollingerAnalysis> {
        let valid = self.valid_series(points);
        let current = valid.last()?;

        let bandwidth = current.bandwidth?;
        let percent_b = current.percent_b?;

        let recent = &valid[valid.len().saturating_sub(BANDWIDTH_LOOKBACK)..];
        let average_bandwidth = recent.iter().filter_map(|p| p.bandwidth).sum::<f64>()
            / recent.len() as f64;

        let volatility = if bandwidth < 0.7 * average_bandwidth {
            Volatility::Low
        } else if bandwidth > 1.3 * average_bandwidth {
            Volatility::High
        } else {
            Volatility::Normal
        };

        let walk = if valid.len() >= WALK_BARS {
            let last = &valid[valid.len() - WALK_BARS..];
            if last.iter().all(|p| p.percent_b.is_some_and(|b| b > 70.0)) {
                BandWalk::WalkingUpper
            } else if last.iter().all(|p| p.percent_b.is_some_and(|b| b < 30.0)) {
                BandWalk::WalkingLower
            } else {
                BandWalk::None
            }
        } else {
            BandWalk::None
        };

        Some(BollingerAnalysis {
            upper: current.upper?,
            middle: current.middle?,
            lower: current.lower?,
            bandwidth,
            percent_b,
            average_bandwidth,
            zone: BandZone::from_percent_b(percent_b),
            squeeze: bandwidth < 0.6 * average_bandwidth,
            volatility,
            walk,
        })
    }

    /// Score an analysis produced by [`BollingerBands::analyze`].
    pub fn signal(&self, analysis: &BollingerAnalysis) -> SignalOutput {
        // Collapsed bands carry no %B information
        let score = if is_flat(analysis.upper - analysis.lower, analysis.middle) {
            0.0
        } else {
            // Mean reversion reading: below the lower band is a buy, above the
            // upper band a sell, linear in between. A walk overrides it, since
            // price hugging a band is trend continuation.
            let percent_b = analysis.percent_b / 100.0;
            match analysis.walk {
                BandWalk::WalkingUpper => 50.0,
                BandWalk::WalkingLower => -50.0,
                BandWalk::None if percent_b <= 0.0 => 100.0,
                BandWalk::None if percent_b >= 1.0 => -100.0,
                BandWalk::None => (0.5 - percent_b) * 200.0,
            }
        };

        make_signal_output(
            self.name(),
            self.category(),
            analysis.percent_b,
            clamp_score(score),
        )
    }
}

impl Signal for BollingerBands {
    fn id(&self) -> &str {
        "bollinger"
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Volatility
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, points: &[PricePoint]) -> Option<SignalOutput> {
        self.analyze(points).map(|analysis| self.signal(&analysis))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalDirection;

    fn points_from(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(format!("d{}", i), *p))
            .collect()
    }

    #[test]
    fn test_bollinger_insufficient_data() {
        let bands = BollingerBands::default();
        let points = points_from(&[100.0; 19]);
        assert!(bands.series(&points).is_empty());
        assert!(bands.analyze(&points).is_none());
    }

    #[test]
    fn test_bollinger_warmup_and_alignment() {
        let bands = BollingerBands::default();
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 4) as f64).collect();
        let series = bands.series(&points_from(&prices));
        assert_eq!(series.len(), 30);
        assert!(series[18].middle.is_none());
        assert!(series[19].middle.is_some());
        assert_eq!(bands.valid_series(&points_from(&prices)).len(), 11);
    }

    #[test]
    fn test_bollinger_band_math() {
        let bands = BollingerBands::new(4, 2.0).unwrap();
        let points = points_from(&[1.0, 2.0, 3.0, 4.0]);
        let last = bands.series(&points).pop().unwrap();
        let sd = 1.25f64.sqrt();
        assert!((last.middle.unwrap() - 2.5).abs() < 1e-9);
        assert!((last.upper.unwrap() - (2.5 + 2.0 * sd)).abs() < 1e-9);
        assert!((last.lower.unwrap() - (2.5 - 2.0 * sd)).abs() < 1e-9);
        let expected_b = (4.0 - (2.5 - 2.0 * sd)) / (4.0 * sd) * 100.0;
        assert!((last.percent_b.unwrap() - expected_b).abs() < 1e-9);
        assert!((last.bandwidth.unwrap() - 4.0 * sd / 2.5 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_series_has_no_nan() {
        let bands = BollingerBands::default();
        let analysis = bands.analyze(&points_from(&[42.0; 25])).unwrap();
        assert_eq!(analysis.bandwidth, 0.0);
        assert_eq!(analysis.percent_b, 0.0);
        assert!(!analysis.squeeze);
    }

    #[test]
    fn test_flat_series_signal_is_neutral() {
        let bands = BollingerBands::default();
        let output = bands.calculate(&points_from(&[42.0; 80])).unwrap();
        assert_eq!(output.score, 0);
        assert_eq!(output.direction, SignalDirection::Neutral);
    }

    #[test]
    fn test_zone_thresholds() {
        assert_eq!(BandZone::from_percent_b(85.0), BandZone::Overbought);
        assert_eq!(BandZone::from_percent_b(65.0), BandZone::NearUpper);
        assert_eq!(BandZone::from_percent_b(50.0), BandZone::Neutral);
        assert_eq!(BandZone::from_percent_b(35.0), BandZone::NearLower);
        assert_eq!(BandZone::from_percent_b(10.0), BandZone::Oversold);
    }

    #[test]
    fn test_walking_upper_band() {
        let bands = BollingerBands::default();
        let prices: Vec<f64> = (0..40).map(|i| 100.0 * 1.03f64.powi(i)).collect();
        let analysis = bands.analyze(&points_from(&prices)).unwrap();
        assert_eq!(analysis.walk, BandWalk::WalkingUpper);
        assert_eq!(analysis.zone, BandZone::Overbought);
    }

    #[test]
    fn test_bollinger_score_range() {
        let bands = BollingerBands::default();
        let prices: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
        let output = bands.calculate(&points_from(&prices)).unwrap();
        assert!(output.score >= -100 && output.score <= 100);
    }
}
