use serde::{Deserialize, Serialize};

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl SignalDirection {
    /// Create direction from a score (-100 to +100).
    pub fn from_score(score: i8) -> Self {
        match score {
            s if s >= 60 => SignalDirection::StrongBuy,
            s if s >= 20 => SignalDirection::Buy,
            s if s > -20 => SignalDirection::Neutral,
            s if s > -60 => SignalDirection::Sell,
            _ => SignalDirection::StrongSell,
        }
    }

    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::StrongBuy => "Strong Buy",
            SignalDirection::Buy => "Buy",
            SignalDirection::Neutral => "Neutral",
            SignalDirection::Sell => "Sell",
            SignalDirection::StrongSell => "Strong Sell",
        }
    }
}

/// Category of a trading signal indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Trend,
    Momentum,
    Volatility,
}

impl SignalCategory {
    /// Get display name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            SignalCategory::Trend => "Trend",
            SignalCategory::Momentum => "Momentum",
            SignalCategory::Volatility => "Volatility",
        }
    }

    /// Weight of this category in the composite score.
    pub fn weight(&self) -> f64 {
        match self {
            SignalCategory::Trend => 0.45,
            SignalCategory::Momentum => 0.35,
            SignalCategory::Volatility => 0.20,
        }
    }
}

/// Bullish/bearish reading shared by the trend classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    /// Compare two lines: `a` above `b` is bullish.
    pub fn compare(a: f64, b: f64) -> Self {
        if a > b {
            Trend::Bullish
        } else if a < b {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }
}

/// Crossover event between the last two bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossover {
    Bullish,
    Bearish,
    None,
}

/// Output from a single signal indicator calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalOutput {
    /// Indicator name (e.g., "ADX (14)").
    pub name: String,
    /// Category of this indicator.
    pub category: SignalCategory,
    /// Raw indicator value at the latest bar.
    pub value: f64,
    /// Normalized score from -100 (strong sell) to +100 (strong buy).
    pub score: i8,
    /// Signal direction derived from score.
    pub direction: SignalDirection,
}

/// Aggregated indicator signals for one price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    /// All individual indicator signals that had enough history.
    pub signals: Vec<SignalOutput>,
    /// Trend category composite score (-100 to +100).
    pub trend_score: i8,
    /// Momentum category composite score (-100 to +100).
    pub momentum_score: i8,
    /// Volatility category composite score (-100 to +100).
    pub volatility_score: i8,
    /// Weighted composite over the categories that produced signals.
    pub composite_score: i8,
    /// Overall signal direction.
    pub direction: SignalDirection,
}
