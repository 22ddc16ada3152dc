//! Integration tests for the sentiment and prediction scorers

use lgns_signals::services::StaticSource;
use lgns_signals::{
    predict, score_sentiment, IndicatorConfig, Liquidity, MarketSnapshot, PriceChange, PricePoint,
    Recommendation, ScoringConfig, SentimentFactor, SentimentLevel, SignalEngine, TxnCounts, Txns,
    Volume,
};

fn bullish_snapshot() -> MarketSnapshot {
    MarketSnapshot {
        price_usd: "11.82".to_string(),
        price_change_24h: 12.0,
        price_change: PriceChange {
            h1: Some(1.0),
            h6: Some(2.0),
            h24: Some(12.0),
        },
        volume: Volume { h24: 70_000_000.0 },
        liquidity: Liquidity { usd: 400_000_000.0 },
        txns: Some(Txns {
            h24: TxnCounts { buys: 70, sells: 30 },
        }),
    }
}

#[test]
fn test_sentiment_bullish_scenario() {
    let result = score_sentiment(&bullish_snapshot(), &ScoringConfig::default());

    let points = |factor: SentimentFactor| {
        result
            .signals
            .iter()
            .find(|s| s.factor == factor)
            .map(|s| s.points)
            .unwrap()
    };
    assert_eq!(points(SentimentFactor::PriceChange), 25);
    assert_eq!(points(SentimentFactor::Volume), 15);
    assert_eq!(points(SentimentFactor::BuyPressure), 20);
    assert_eq!(points(SentimentFactor::Liquidity), 15);
    assert_eq!(points(SentimentFactor::Momentum), 10);

    assert_eq!(result.score, 85);
    assert_eq!(result.level, SentimentLevel::VeryBullish);
    assert!(!result.summary.is_empty());
}

#[test]
fn test_sentiment_momentum_needs_h6() {
    let mut snapshot = bullish_snapshot();
    snapshot.price_change.h1 = Some(5.0);
    snapshot.price_change.h6 = None;

    let result = score_sentiment(&snapshot, &ScoringConfig::default());
    let momentum = result
        .signals
        .iter()
        .find(|s| s.factor == SentimentFactor::Momentum)
        .unwrap();
    assert_eq!(momentum.points, 0);
    assert_eq!(result.score, 75);
}

#[test]
fn test_sentiment_score_bounded() {
    let config = ScoringConfig::default();
    for change in [-80.0, -7.0, -1.0, 0.0, 3.0, 40.0] {
        for (buys, sells) in [(0, 100), (50, 50), (100, 0), (0, 0)] {
            for volume in [0.0, 30_000_000.0, 1e12] {
                let snapshot = MarketSnapshot {
                    price_usd: "1".to_string(),
                    price_change_24h: change,
                    price_change: PriceChange {
                        h1: Some(change / 10.0),
                        h6: Some(-change / 5.0),
                        h24: None,
                    },
                    volume: Volume { h24: volume },
                    liquidity: Liquidity { usd: volume * 5.0 },
                    txns: Some(Txns {
                        h24: TxnCounts { buys, sells },
                    }),
                };
                let result = score_sentiment(&snapshot, &config);
                assert!((-100..=100).contains(&result.score));
            }
        }
    }
}

#[test]
fn test_sentiment_is_deterministic() {
    let config = ScoringConfig::default();
    let first = score_sentiment(&bullish_snapshot(), &config);
    let second = score_sentiment(&bullish_snapshot(), &config);
    assert_eq!(first, second);
}

#[test]
fn test_prediction_bullish_snapshot() {
    let result = predict(&bullish_snapshot(), &ScoringConfig::default()).unwrap();

    assert!(result.overall_score > 0.0);
    assert!(matches!(
        result.recommendation,
        Recommendation::Buy | Recommendation::StrongBuy
    ));
    let blended = 0.3 * result.short_term.score
        + 0.4 * result.medium_term.score
        + 0.3 * result.long_term.score;
    assert!((result.overall_score - blended).abs() < 1e-9);

    for forecast in [&result.short_term, &result.medium_term, &result.long_term] {
        assert!(forecast.support < result.current_price);
        assert!(forecast.resistance > result.current_price);
        assert!(forecast.target_price > result.current_price);
        assert!(forecast.score >= -100.0 && forecast.score <= 100.0);
    }
    assert_eq!(result.short_term.label, "24h");
    assert_eq!(result.long_term.label, "30d");

    // Bands widen with the horizon
    assert!(result.long_term.support < result.medium_term.support);
    assert!(result.medium_term.support < result.short_term.support);
}

#[test]
fn test_prediction_flags_risks() {
    let snapshot = MarketSnapshot {
        price_usd: "9.10".to_string(),
        price_change_24h: -14.0,
        price_change: PriceChange {
            h1: Some(0.8),
            h6: Some(-4.0),
            h24: None,
        },
        volume: Volume { h24: 8_000_000.0 },
        liquidity: Liquidity { usd: 150_000_000.0 },
        txns: Some(Txns {
            h24: TxnCounts { buys: 20, sells: 80 },
        }),
    };
    let result = predict(&snapshot, &ScoringConfig::default()).unwrap();
    assert_eq!(result.risk_factors.len(), 5);
    assert!(result.overall_score < 0.0);
}

#[test]
fn test_engine_report_from_sources() {
    let history: Vec<PricePoint> = (0..80)
        .map(|i| PricePoint::new(format!("day {}", i + 1), 8.0 + (i as f64 * 0.2).sin()))
        .collect();
    let source = StaticSource::new(history, bullish_snapshot());

    let engine = SignalEngine::new(&IndicatorConfig::default(), &ScoringConfig::default()).unwrap();
    let report = engine.report_from(&source, &source).unwrap();

    assert!(report.adx.is_some());
    assert!(report.bollinger.is_some());
    assert!(report.cci.is_some());
    assert!(report.ichimoku.is_some());
    assert_eq!(report.summary.as_ref().unwrap().signals.len(), 4);
    assert_eq!(report.sentiment.score, 85);
    assert!(report.prediction.is_some());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("sentiment").is_some());
    assert_eq!(json["sentiment"]["level"], "very_bullish");
}
