//! Heuristic market sentiment score.
//!
//! Five independent factors each add a fixed number of points; the sum is
//! clamped to [-100, 100] and mapped to a five-level label. Thresholds are
//! calibrated against the volume and liquidity baselines in [`ScoringConfig`].

use crate::config::ScoringConfig;
use crate::types::{
    MarketSnapshot, SentimentFactor, SentimentLevel, SentimentResult, SentimentSignal,
};
use tracing::debug;

fn price_change_points(change_24h: f64) -> i32 {
    match change_24h {
        c if c > 10.0 => 25,
        c if c > 5.0 => 20,
        c if c > 2.0 => 15,
        c if c > 0.0 => 10,
        c if c > -2.0 => 0,
        c if c > -5.0 => -10,
        c if c > -10.0 => -20,
        _ => -25,
    }
}

fn momentum_points(momentum: f64) -> i32 {
    if momentum > 0.5 {
        10
    } else if momentum < -0.5 {
        -10
    } else {
        0
    }
}

fn volume_points(ratio: f64) -> i32 {
    match ratio {
        r if r > 1.5 => 15,
        r if r > 1.2 => 10,
        r if r > 0.8 => 5,
        r if r > 0.5 => -5,
        _ => -10,
    }
}

fn buy_pressure_points(buy_ratio: f64) -> i32 {
    match buy_ratio {
        r if r > 60.0 => 20,
        r if r > 55.0 => 15,
        r if r > 50.0 => 5,
        r if r > 45.0 => -5,
        r if r > 40.0 => -15,
        _ => -20,
    }
}

fn liquidity_points(ratio: f64) -> i32 {
    match ratio {
        r if r > 1.1 => 15,
        r if r > 0.9 => 10,
        r if r > 0.7 => 0,
        _ => -10,
    }
}

fn summary_for(level: SentimentLevel) -> &'static str {
    match level {
        SentimentLevel::VeryBullish => {
            "Strong buying interest across price, volume and order flow."
        }
        SentimentLevel::Bullish => "Market conditions lean positive.",
        SentimentLevel::Neutral => "Mixed signals; no clear directional bias.",
        SentimentLevel::Bearish => "Market conditions lean negative.",
        SentimentLevel::VeryBearish => "Broad selling pressure and weakening market depth.",
    }
}

/// Score a market snapshot.
///
/// Missing transaction counts read as a 50% buy ratio and a missing 1h or 6h
/// change leaves momentum at zero points.
pub fn score_sentiment(snapshot: &MarketSnapshot, config: &ScoringConfig) -> SentimentResult {
    let mut signals = Vec::with_capacity(5);

    let change = snapshot.price_change_24h;
    signals.push(SentimentSignal {
        factor: SentimentFactor::PriceChange,
        value: change,
        points: price_change_points(change),
        detail: format!("24h price change {:+.2}%", change),
    });

    let momentum = snapshot.momentum();
    signals.push(SentimentSignal {
        factor: SentimentFactor::Momentum,
        value: momentum.unwrap_or(0.0),
        points: momentum.map(momentum_points).unwrap_or(0),
        detail: match momentum {
            Some(m) if m > 0.5 => format!("Momentum accelerating ({:+.2})", m),
            Some(m) if m < -0.5 => format!("Momentum fading ({:+.2})", m),
            Some(m) => format!("Momentum steady ({:+.2})", m),
            None => "Momentum unavailable".to_string(),
        },
    });

    let volume_ratio = snapshot.volume_ratio(config.volume_baseline);
    signals.push(SentimentSignal {
        factor: SentimentFactor::Volume,
        value: volume_ratio,
        points: volume_points(volume_ratio),
        detail: format!("Volume at {:.0}% of baseline", volume_ratio * 100.0),
    });

    let buy_ratio = snapshot.buy_ratio();
    signals.push(SentimentSignal {
        factor: SentimentFactor::BuyPressure,
        value: buy_ratio,
        points: buy_pressure_points(buy_ratio),
        detail: format!("Buys are {:.1}% of 24h transactions", buy_ratio),
    });

    let liquidity_ratio = snapshot.liquidity_ratio(config.liquidity_baseline);
    signals.push(SentimentSignal {
        factor: SentimentFactor::Liquidity,
        value: liquidity_ratio,
        points: liquidity_points(liquidity_ratio),
        detail: format!("Liquidity at {:.0}% of baseline", liquidity_ratio * 100.0),
    });

    let raw: i32 = signals.iter().map(|s| s.points).sum();
    let score = raw.clamp(-100, 100);
    let level = SentimentLevel::from_score(score);

    debug!("Sentiment score {} ({:?})", score, level);

    SentimentResult {
        score,
        level,
        signals,
        summary: summary_for(level).to_string(),
    }
}
