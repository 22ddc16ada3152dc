//! Signal engine: runs every indicator and scorer over one history/snapshot pair.

use crate::config::{IndicatorConfig, ScoringConfig};
use crate::error::Result;
use crate::services::signals::indicators::{
    adx::AdxAnalysis, bollinger::BollingerAnalysis, cci::CciAnalysis, ichimoku::IchimokuAnalysis,
    Adx, BollingerBands, Cci, Ichimoku,
};
use crate::services::signals::{predict, score_sentiment, Signal};
use crate::services::source::{PriceHistorySource, SnapshotSource};
use crate::types::{
    IndicatorSummary, MarketSnapshot, PredictionResult, PricePoint, SentimentResult,
    SignalCategory, SignalDirection, SignalOutput,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Everything the dashboard widgets render for one refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    pub adx: Option<AdxAnalysis>,
    pub bollinger: Option<BollingerAnalysis>,
    pub cci: Option<CciAnalysis>,
    pub ichimoku: Option<IchimokuAnalysis>,
    /// `None` when no indicator had enough history.
    pub summary: Option<IndicatorSummary>,
    pub sentiment: SentimentResult,
    /// `None` when the snapshot price is unusable.
    pub prediction: Option<PredictionResult>,
}

/// Runs the configured indicators and scorers. Holds no market state.
pub struct SignalEngine {
    adx: Adx,
    bollinger: BollingerBands,
    cci: Cci,
    ichimoku: Ichimoku,
    scoring: ScoringConfig,
}

impl SignalEngine {
    /// Create a new signal engine.
    pub fn new(indicators: &IndicatorConfig, scoring: &ScoringConfig) -> Result<Self> {
        let range = scoring.synthetic_range;
        Ok(Self {
            adx: Adx::new(indicators.adx_period, range)?,
            bollinger: BollingerBands::new(
                indicators.bollinger_period,
                indicators.bollinger_multiplier,
            )?,
            cci: Cci::new(indicators.cci_period, range)?,
            ichimoku: Ichimoku::new(
                indicators.tenkan_period,
                indicators.kijun_period,
                indicators.senkou_b_period,
                indicators.displacement,
                range,
            )?,
            scoring: scoring.clone(),
        })
    }

    pub fn adx(&self) -> &Adx {
        &self.adx
    }

    pub fn bollinger(&self) -> &BollingerBands {
        &self.bollinger
    }

    pub fn cci(&self) -> &Cci {
        &self.cci
    }

    pub fn ichimoku(&self) -> &Ichimoku {
        &self.ichimoku
    }

    /// The configured engines: trend, then momentum, then volatility.
    pub fn indicators(&self) -> [&dyn Signal; 4] {
        [&self.adx, &self.ichimoku, &self.cci, &self.bollinger]
    }

    /// Evaluate every indicator that has enough history and blend the scores.
    pub fn summarize(&self, points: &[PricePoint]) -> Option<IndicatorSummary> {
        let signals: Vec<SignalOutput> = self
            .indicators()
            .into_iter()
            .filter(|indicator| points.len() >= indicator.min_periods())
            .filter_map(|indicator| indicator.calculate(points))
            .collect();

        Self::blend(signals, points.len())
    }

    /// Category averages and the weighted composite over already-scored signals.
    fn blend(signals: Vec<SignalOutput>, history_len: usize) -> Option<IndicatorSummary> {
        if signals.is_empty() {
            debug!("No indicator had enough history ({} points)", history_len);
            return None;
        }

        let trend_score = Self::calculate_category_score(&signals, SignalCategory::Trend);
        let momentum_score = Self::calculate_category_score(&signals, SignalCategory::Momentum);
        let volatility_score =
            Self::calculate_category_score(&signals, SignalCategory::Volatility);

        // Renormalize over the categories that produced at least one signal
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for (category, score) in [
            (SignalCategory::Trend, trend_score),
            (SignalCategory::Momentum, momentum_score),
            (SignalCategory::Volatility, volatility_score),
        ] {
            if signals.iter().any(|s| s.category == category) {
                debug!("{} score {}", category.name(), score);
                weighted_sum += score as f64 * category.weight();
                total_weight += category.weight();
            }
        }
        let composite_score = if total_weight > 0.0 {
            (weighted_sum / total_weight) as i8
        } else {
            0
        };

        Some(IndicatorSummary {
            signals,
            trend_score,
            momentum_score,
            volatility_score,
            composite_score,
            direction: SignalDirection::from_score(composite_score),
        })
    }

    /// Calculate composite score for a category.
    fn calculate_category_score(signals: &[SignalOutput], category: SignalCategory) -> i8 {
        let scores: Vec<f64> = signals
            .iter()
            .filter(|s| s.category == category)
            .map(|s| s.score as f64)
            .collect();

        if scores.is_empty() {
            return 0;
        }

        (scores.iter().sum::<f64>() / scores.len() as f64) as i8
    }

    /// Build the full report for a price history and snapshot.
    pub fn report(&self, points: &[PricePoint], snapshot: &MarketSnapshot) -> MarketReport {
        debug!("Building market report from {} points", points.len());

        let prediction = match predict(snapshot, &self.scoring) {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                warn!("Skipping prediction: {}", e);
                None
            }
        };

        let adx = self.adx.analyze(points);
        let ichimoku = self.ichimoku.analyze(points);
        let cci = self.cci.analyze(points);
        let bollinger = self.bollinger.analyze(points);

        // Score the analyses computed above
        let signals = [
            adx.as_ref().map(|a| self.adx.signal(a)),
            ichimoku.as_ref().map(|a| self.ichimoku.signal(a)),
            cci.as_ref().map(|a| self.cci.signal(a)),
            bollinger.as_ref().map(|a| self.bollinger.signal(a)),
        ]
        .into_iter()
        .flatten()
        .collect();

        MarketReport {
            summary: Self::blend(signals, points.len()),
            adx,
            bollinger,
            cci,
            ichimoku,
            sentiment: score_sentiment(snapshot, &self.scoring),
            prediction,
        }
    }

    /// Fetch from the given sources, then build the report.
    pub fn report_from(
        &self,
        history: &dyn PriceHistorySource,
        snapshot: &dyn SnapshotSource,
    ) -> Result<MarketReport> {
        let points = history.price_history()?;
        let snapshot = snapshot.snapshot()?;
        Ok(self.report(&points, &snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SignalEngine {
        SignalEngine::new(&IndicatorConfig::default(), &ScoringConfig::default()).unwrap()
    }

    fn uptrend(count: usize) -> Vec<PricePoint> {
        (0..count)
            .map(|i| PricePoint::new(format!("d{}", i), 10.0 + i as f64 * 0.2))
            .collect()
    }

    #[test]
    fn test_summary_skips_short_history() {
        let engine = engine();
        assert!(engine.summarize(&uptrend(10)).is_none());

        // Enough for Bollinger and CCI, not for ADX or Ichimoku
        let summary = engine.summarize(&uptrend(22)).unwrap();
        assert_eq!(summary.signals.len(), 2);
        assert_eq!(summary.trend_score, 0);
    }

    #[test]
    fn test_summary_all_indicators() {
        let engine = engine();
        let summary = engine.summarize(&uptrend(80)).unwrap();
        assert_eq!(summary.signals.len(), 4);
        assert!(summary.trend_score > 0);
        assert!(summary.composite_score >= -100 && summary.composite_score <= 100);
    }

    #[test]
    fn test_report_summary_matches_summarize() {
        let engine = engine();
        let points = uptrend(80);
        let report = engine.report(&points, &MarketSnapshot::default());
        assert_eq!(report.summary, engine.summarize(&points));

        let ids: Vec<&str> = engine.indicators().into_iter().map(|i| i.id()).collect();
        assert_eq!(ids, ["adx", "ichimoku", "cci", "bollinger"]);
    }

    #[test]
    fn test_flat_history_is_neutral() {
        let engine = engine();
        let points: Vec<PricePoint> = (0..80)
            .map(|i| PricePoint::new(format!("d{}", i), 42.0))
            .collect();
        let summary = engine.summarize(&points).unwrap();
        assert_eq!(summary.volatility_score, 0);
        assert_eq!(summary.direction, SignalDirection::Neutral);
    }

    #[test]
    fn test_report_with_bad_price_still_scores_sentiment() {
        let engine = engine();
        let snapshot = MarketSnapshot {
            price_usd: "oops".to_string(),
            ..Default::default()
        };
        let report = engine.report(&uptrend(60), &snapshot);
        assert!(report.prediction.is_none());
        assert!(report.adx.is_some());
        assert!(report.ichimoku.is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = IndicatorConfig {
            adx_period: 0,
            ..IndicatorConfig::default()
        };
        assert!(SignalEngine::new(&config, &ScoringConfig::default()).is_err());
    }
}
