//! Ichimoku Cloud indicator.

use crate::error::{Result, SignalError};
use crate::services::signals::{clamp_score, crossover, make_signal_output, Signal};
use crate::types::{resolve_bars, Bar, Crossover, PricePoint, SignalCategory, SignalOutput, Trend};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One slot of the displaced Ichimoku chart.
///
/// The chart is `displacement` slots longer than the input: slots past the
/// last input bar carry only the forward-shifted Senkou spans, so `date` and
/// `price` are `None` there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IchimokuPoint {
    pub date: Option<String>,
    pub price: Option<f64>,
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub senkou_a: Option<f64>,
    pub senkou_b: Option<f64>,
    pub chikou: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudPosition {
    AboveCloud,
    InCloud,
    BelowCloud,
}

impl CloudPosition {
    pub fn classify(price: f64, span_a: f64, span_b: f64) -> Self {
        if price > span_a.max(span_b) {
            CloudPosition::AboveCloud
        } else if price < span_a.min(span_b) {
            CloudPosition::BelowCloud
        } else {
            CloudPosition::InCloud
        }
    }
}

/// Classification of the latest input bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IchimokuAnalysis {
    pub price: f64,
    pub tenkan: f64,
    pub kijun: f64,
    /// Cloud plotted at the current bar, i.e. spans computed `displacement` bars ago.
    pub senkou_a: Option<f64>,
    pub senkou_b: Option<f64>,
    /// Tenkan relative to Kijun.
    pub trend: Trend,
    pub position: Option<CloudPosition>,
    pub signal: Crossover,
    /// Span A relative to Span B for the current cloud.
    pub cloud_color: Option<Trend>,
    /// Span A relative to Span B for the cloud being formed now.
    pub cloud_ahead: Option<Trend>,
    /// Current close relative to the price `displacement` bars back.
    pub chikou_confirmation: Option<Trend>,
}

/// Ichimoku Cloud indicator.
///
/// - Tenkan-sen: (9-period high + 9-period low) / 2
/// - Kijun-sen: (26-period high + 26-period low) / 2
/// - Senkou Span A: (Tenkan + Kijun) / 2, plotted 26 periods ahead
/// - Senkou Span B: (52-period high + 52-period low) / 2, plotted 26 periods ahead
/// - Chikou Span: close plotted 26 periods behind
pub struct Ichimoku {
    tenkan_period: usize,
    kijun_period: usize,
    senkou_b_period: usize,
    displacement: usize,
    synthetic_range: f64,
}

impl Default for Ichimoku {
    fn default() -> Self {
        Self {
            tenkan_period: 9,
            kijun_period: 26,
            senkou_b_period: 52,
            displacement: 26,
            synthetic_range: crate::config::DEFAULT_SYNTHETIC_RANGE,
        }
    }
}

impl Ichimoku {
    pub fn new(
        tenkan_period: usize,
        kijun_period: usize,
        senkou_b_period: usize,
        displacement: usize,
        synthetic_range: f64,
    ) -> Result<Self> {
        for (name, period) in [
            ("ichimoku_tenkan", tenkan_period),
            ("ichimoku_kijun", kijun_period),
            ("ichimoku_senkou_b", senkou_b_period),
        ] {
            if period == 0 {
                return Err(SignalError::invalid_period(name, period));
            }
        }
        Ok(Self {
            tenkan_period,
            kijun_period,
            senkou_b_period,
            displacement,
            synthetic_range,
        })
    }

    /// Midpoint of the highest high and lowest low over the `period` bars
    /// ending at `idx`.
    fn midline(bars: &[Bar], idx: usize, period: usize) -> Option<f64> {
        if idx + 1 < period {
            return None;
        }
        let window = &bars[idx + 1 - period..=idx];
        let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        Some((highest + lowest) / 2.0)
    }

    /// Displaced Ichimoku chart of length `points.len() + displacement`.
    /// Empty when there is less history than the longest period.
    pub fn series(&self, points: &[PricePoint]) -> Vec<IchimokuPoint> {
        if points.len() < self.min_periods() {
            debug!(
                "Ichimoku needs {} points, have {}",
                self.min_periods(),
                points.len()
            );
            return Vec::new();
        }

        let bars = resolve_bars(points, self.synthetic_range);
        let n = bars.len();
        let d = self.displacement;

        let mut chart: Vec<IchimokuPoint> = (0..n + d)
            .map(|i| IchimokuPoint {
                date: points.get(i).map(|p| p.date.clone()),
                price: points.get(i).map(|p| p.price),
                ..Default::default()
            })
            .collect();

        for i in 0..n {
            let tenkan = Self::midline(&bars, i, self.tenkan_period);
            let kijun = Self::midline(&bars, i, self.kijun_period);
            chart[i].tenkan = tenkan;
            chart[i].kijun = kijun;

            if let (Some(t), Some(k)) = (tenkan, kijun) {
                chart[i + d].senkou_a = Some((t + k) / 2.0);
            }
            chart[i + d].senkou_b = Self::midline(&bars, i, self.senkou_b_period);

            if i >= d {
                chart[i - d].chikou = Some(bars[i].close);
            }
        }

        chart
    }

    /// Classify the latest input bar. `None` when there is not enough history.
    pub fn analyze(&self, points: &[PricePoint]) -> Option<IchimokuAnalysis> {
        let chart = self.series(points);
        let current_idx = points.len().checked_sub(1)?;
        let current = chart.get(current_idx)?;

        let price = current.price?;
        let tenkan = current.tenkan?;
        let kijun = current.kijun?;

        // Spans at the current slot were computed `displacement` bars ago;
        // this is the cloud price is trading against now.
        let cloud = current.senkou_a.zip(current.senkou_b);

        let signal = current_idx
            .checked_sub(1)
            .and_then(|i| chart[i].tenkan.zip(chart[i].kijun))
            .map(|(prev_tenkan, prev_kijun)| crossover(prev_tenkan, prev_kijun, tenkan, kijun))
            .unwrap_or(Crossover::None);

        let cloud_ahead = chart
            .get(current_idx + self.displacement)
            .and_then(|slot| slot.senkou_a.zip(slot.senkou_b))
            .map(|(a, b)| Trend::compare(a, b));

        let chikou_confirmation = current_idx
            .checked_sub(self.displacement)
            .and_then(|i| chart[i].price)
            .map(|past| Trend::compare(price, past));

        Some(IchimokuAnalysis {
            price,
            tenkan,
            kijun,
            senkou_a: current.senkou_a,
            senkou_b: current.senkou_b,
            trend: Trend::compare(tenkan, kijun),
            position: cloud.map(|(a, b)| CloudPosition::classify(price, a, b)),
            signal,
            cloud_color: cloud.map(|(a, b)| Trend::compare(a, b)),
            cloud_ahead,
            chikou_confirmation,
        })
    }

    /// Score an analysis produced by [`Ichimoku::analyze`].
    pub fn signal(&self, analysis: &IchimokuAnalysis) -> SignalOutput {
        let trend = match analysis.trend {
            Trend::Bullish => 30.0,
            Trend::Bearish => -30.0,
            Trend::Neutral => 0.0,
        };
        let position = match analysis.position {
            Some(CloudPosition::AboveCloud) => 40.0,
            Some(CloudPosition::BelowCloud) => -40.0,
            _ => 0.0,
        };
        let cross = match analysis.signal {
            Crossover::Bullish => 30.0,
            Crossover::Bearish => -30.0,
            Crossover::None => 0.0,
        };

        make_signal_output(
            self.name(),
            self.category(),
            analysis.tenkan - analysis.kijun,
            clamp_score(trend + position + cross),
        )
    }
}

impl Signal for Ichimoku {
    fn id(&self) -> &str {
        "ichimoku"
    }

    fn name(&self) -> &str {
        "Ichimoku Cloud"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Trend
    }

    fn min_periods(&self) -> usize {
        self.tenkan_period
            .max(self.kijun_period)
            .max(self.senkou_b_period)
    }

    fn calculate(&self, points: &[PricePoint]) -> Option<SignalOutput> {
        self.analyze(points).map(|analysis| self.signal(&analysis))
    }
}
