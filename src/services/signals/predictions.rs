//! Multi-horizon price prediction from a single market snapshot.
//!
//! Each horizon weighs the same raw factors differently: the short horizon
//! leans on momentum and the 1h move, the long horizon on trend agreement and
//! liquidity. All coefficients live in [`HORIZON_MODELS`].

use crate::config::ScoringConfig;
use crate::error::{Result, SignalError};
use crate::types::{
    Horizon, HorizonForecast, MarketSnapshot, PredictionResult, Recommendation, Scenario,
    Scenarios, Trend, VolatilityLevel,
};
use tracing::{debug, warn};

/// Blend of the horizon scores into the overall score.
const SHORT_WEIGHT: f64 = 0.3;
const MEDIUM_WEIGHT: f64 = 0.4;
const LONG_WEIGHT: f64 = 0.3;

/// Horizon score beyond which the forecast is directional.
const DIRECTION_THRESHOLD: f64 = 10.0;

/// Coefficients for one horizon.
#[derive(Debug, Clone, Copy)]
struct HorizonModel {
    horizon: Horizon,
    momentum: f64,
    trend: f64,
    buy_pressure: f64,
    volume: f64,
    liquidity: f64,
    /// Weight on the price change matching the horizon (1h, 6h, 24h).
    price_change: f64,
    confidence_base: f64,
    confidence_factor: f64,
    confidence_min: f64,
    confidence_max: f64,
    /// Percent move per score point.
    move_per_point: f64,
    /// Extra band width around support/resistance, as a fraction of price.
    band_offset: f64,
}

const HORIZON_MODELS: [HorizonModel; 3] = [
    HorizonModel {
        horizon: Horizon::Short,
        momentum: 6.0,
        trend: 4.0,
        buy_pressure: 1.0,
        volume: 0.15,
        liquidity: 0.0,
        price_change: 3.0,
        confidence_base: 45.0,
        confidence_factor: 0.4,
        confidence_min: 30.0,
        confidence_max: 85.0,
        move_per_point: 0.05,
        band_offset: 0.01,
    },
    HorizonModel {
        horizon: Horizon::Medium,
        momentum: 3.0,
        trend: 6.0,
        buy_pressure: 0.8,
        volume: 0.1,
        liquidity: 0.1,
        price_change: 1.5,
        confidence_base: 40.0,
        confidence_factor: 0.35,
        confidence_min: 25.0,
        confidence_max: 80.0,
        move_per_point: 0.15,
        band_offset: 0.03,
    },
    HorizonModel {
        horizon: Horizon::Long,
        momentum: 0.0,
        trend: 5.0,
        buy_pressure: 0.4,
        volume: 0.05,
        liquidity: 0.3,
        price_change: 1.0,
        confidence_base: 35.0,
        confidence_factor: 0.3,
        confidence_min: 20.0,
        confidence_max: 75.0,
        move_per_point: 0.4,
        band_offset: 0.08,
    },
];

/// Raw inputs shared by every horizon.
#[derive(Debug, Clone, Copy)]
struct Factors {
    h1: f64,
    h6: f64,
    h24: f64,
    momentum: f64,
    /// Sign vote over the 1h, 6h and 24h changes, in [-3, 3].
    trend_votes: f64,
    /// Buy ratio minus 50, in percentage points.
    buy_pressure: f64,
    /// Percent above/below the volume baseline, capped at ±100.
    volume: f64,
    /// Percent above/below the liquidity baseline, capped at ±100.
    liquidity: f64,
    volume_ratio: f64,
    liquidity_ratio: f64,
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Factors {
    fn from_snapshot(snapshot: &MarketSnapshot, config: &ScoringConfig) -> Self {
        let h1 = snapshot.price_change.h1.unwrap_or(0.0);
        let h6 = snapshot.price_change.h6.unwrap_or(0.0);
        let h24 = snapshot.price_change_24h;
        let volume_ratio = snapshot.volume_ratio(config.volume_baseline);
        let liquidity_ratio = snapshot.liquidity_ratio(config.liquidity_baseline);

        Self {
            h1,
            h6,
            h24,
            momentum: snapshot.momentum().unwrap_or(0.0),
            trend_votes: sign(h1) + sign(h6) + sign(h24),
            buy_pressure: snapshot.buy_ratio() - 50.0,
            volume: ((volume_ratio - 1.0) * 100.0).clamp(-100.0, 100.0),
            liquidity: ((liquidity_ratio - 1.0) * 100.0).clamp(-100.0, 100.0),
            volume_ratio,
            liquidity_ratio,
        }
    }
}

impl HorizonModel {
    fn score(&self, f: &Factors) -> f64 {
        let change = match self.horizon {
            Horizon::Short => f.h1,
            Horizon::Medium => f.h6,
            Horizon::Long => f.h24,
        };
        let raw = f.momentum * self.momentum
            + f.trend_votes * self.trend
            + f.buy_pressure * self.buy_pressure
            + f.volume * self.volume
            + f.liquidity * self.liquidity
            + change * self.price_change;
        raw.clamp(-100.0, 100.0)
    }

    fn forecast(&self, f: &Factors, price: f64, volatility: f64) -> HorizonForecast {
        let score = self.score(f);
        let confidence = (self.confidence_base + score.abs() * self.confidence_factor)
            .clamp(self.confidence_min, self.confidence_max);
        let expected_change = score * self.move_per_point;
        let band = volatility / 100.0 + self.band_offset;

        let direction = if score > DIRECTION_THRESHOLD {
            Trend::Bullish
        } else if score < -DIRECTION_THRESHOLD {
            Trend::Bearish
        } else {
            Trend::Neutral
        };

        HorizonForecast {
            horizon: self.horizon,
            label: self.horizon.label().to_string(),
            score,
            direction,
            confidence,
            expected_change,
            target_price: price * (1.0 + expected_change / 100.0),
            support: price * (1.0 - band),
            resistance: price * (1.0 + band),
        }
    }
}

fn scenarios(price: f64, overall: f64, volatility: f64, base_change: f64) -> Scenarios {
    let best_probability = (33.0 + overall * 0.3).clamp(10.0, 70.0);
    let worst_probability = (33.0 - overall * 0.3).clamp(10.0, 70.0);
    let swing = volatility * 2.0 + 5.0;

    let scenario = |probability: f64, price_change: f64| Scenario {
        probability,
        price_change,
        target_price: price * (1.0 + price_change / 100.0),
    };

    Scenarios {
        best: scenario(best_probability, swing),
        base: scenario(100.0 - best_probability - worst_probability, base_change),
        worst: scenario(worst_probability, -swing),
    }
}

fn risk_factors(f: &Factors, volatility: f64) -> Vec<String> {
    let mut risks = Vec::new();

    if f.liquidity_ratio < 0.7 {
        risks.push("Liquidity well below baseline; large orders move price".to_string());
    }
    if f.volume_ratio < 0.5 {
        risks.push("Thin trading volume".to_string());
    }
    if f.buy_pressure < -10.0 {
        risks.push("Sell transactions dominate order flow".to_string());
    }
    if volatility > 5.0 {
        risks.push("Elevated volatility".to_string());
    }
    if sign(f.h1) * sign(f.h24) < 0.0 {
        risks.push("Short-term momentum diverges from the daily trend".to_string());
    }

    risks
}

/// Build short/medium/long forecasts from a snapshot.
///
/// Fails only when `priceUsd` is not a positive number; every other missing
/// field falls back to a neutral reading.
pub fn predict(snapshot: &MarketSnapshot, config: &ScoringConfig) -> Result<PredictionResult> {
    let price = match snapshot.price() {
        Some(p) if p > 0.0 => p,
        _ => {
            warn!("Unusable priceUsd {:?}", snapshot.price_usd);
            return Err(SignalError::InvalidSnapshot(format!(
                "priceUsd must be a positive number, got {:?}",
                snapshot.price_usd
            )));
        }
    };

    let factors = Factors::from_snapshot(snapshot, config);
    let volatility = snapshot.price_change_24h.abs() * 0.5;

    let [short, medium, long] =
        HORIZON_MODELS.map(|model| model.forecast(&factors, price, volatility));

    let overall_score =
        SHORT_WEIGHT * short.score + MEDIUM_WEIGHT * medium.score + LONG_WEIGHT * long.score;

    debug!(
        "Prediction scores short={:.1} medium={:.1} long={:.1} overall={:.1}",
        short.score, medium.score, long.score, overall_score
    );

    Ok(PredictionResult {
        current_price: price,
        scenarios: scenarios(price, overall_score, volatility, medium.expected_change),
        short_term: short,
        medium_term: medium,
        long_term: long,
        overall_score,
        recommendation: Recommendation::from_score(overall_score),
        volatility,
        volatility_level: VolatilityLevel::from_volatility(volatility),
        risk_factors: risk_factors(&factors, volatility),
    })
}
