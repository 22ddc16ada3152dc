use serde::{Deserialize, Serialize};

/// Five-level sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLevel {
    VeryBullish,
    Bullish,
    Neutral,
    Bearish,
    VeryBearish,
}

impl SentimentLevel {
    /// Map a clamped score to its level.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 40 => SentimentLevel::VeryBullish,
            s if s >= 15 => SentimentLevel::Bullish,
            s if s >= -15 => SentimentLevel::Neutral,
            s if s >= -40 => SentimentLevel::Bearish,
            _ => SentimentLevel::VeryBearish,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentLevel::VeryBullish => "Very Bullish",
            SentimentLevel::Bullish => "Bullish",
            SentimentLevel::Neutral => "Neutral",
            SentimentLevel::Bearish => "Bearish",
            SentimentLevel::VeryBearish => "Very Bearish",
        }
    }
}

/// Input factor of the sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentFactor {
    PriceChange,
    Momentum,
    Volume,
    BuyPressure,
    Liquidity,
}

/// One factor's contribution, with the reading behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSignal {
    pub factor: SentimentFactor,
    /// Raw input the points were derived from (percent or ratio).
    pub value: f64,
    pub points: i32,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    /// Sum of factor points, clamped to [-100, 100].
    pub score: i32,
    pub level: SentimentLevel,
    pub signals: Vec<SentimentSignal>,
    pub summary: String,
}

/// Forecast horizon of the prediction scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

impl Horizon {
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::Short => "24h",
            Horizon::Medium => "7d",
            Horizon::Long => "30d",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        if score >= 40.0 {
            Recommendation::StrongBuy
        } else if score >= 15.0 {
            Recommendation::Buy
        } else if score > -15.0 {
            Recommendation::Hold
        } else if score > -40.0 {
            Recommendation::Sell
        } else {
            Recommendation::StrongSell
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl VolatilityLevel {
    pub fn from_volatility(volatility: f64) -> Self {
        if volatility < 2.0 {
            VolatilityLevel::Low
        } else if volatility < 5.0 {
            VolatilityLevel::Moderate
        } else if volatility < 10.0 {
            VolatilityLevel::High
        } else {
            VolatilityLevel::Extreme
        }
    }
}

/// Directional forecast for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonForecast {
    pub horizon: Horizon,
    pub label: String,
    /// Weighted directional score in [-100, 100].
    pub score: f64,
    pub direction: super::Trend,
    /// Confidence in percent.
    pub confidence: f64,
    /// Expected percent move over the horizon.
    pub expected_change: f64,
    pub target_price: f64,
    pub support: f64,
    pub resistance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Probability in percent.
    pub probability: f64,
    /// Percent price move.
    pub price_change: f64,
    pub target_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenarios {
    pub best: Scenario,
    pub base: Scenario,
    pub worst: Scenario,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub current_price: f64,
    pub short_term: HorizonForecast,
    pub medium_term: HorizonForecast,
    pub long_term: HorizonForecast,
    /// `0.3 * short + 0.4 * medium + 0.3 * long`.
    pub overall_score: f64,
    pub recommendation: Recommendation,
    /// Half the absolute 24h change, in percent.
    pub volatility: f64,
    pub volatility_level: VolatilityLevel,
    pub scenarios: Scenarios,
    pub risk_factors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_levels() {
        assert_eq!(SentimentLevel::from_score(40), SentimentLevel::VeryBullish);
        assert_eq!(SentimentLevel::from_score(15), SentimentLevel::Bullish);
        assert_eq!(SentimentLevel::from_score(-15), SentimentLevel::Neutral);
        assert_eq!(SentimentLevel::from_score(-40), SentimentLevel::Bearish);
        assert_eq!(SentimentLevel::from_score(-41), SentimentLevel::VeryBearish);
        assert_eq!(SentimentLevel::VeryBullish.label(), "Very Bullish");
    }

    #[test]
    fn test_recommendation_serializes_camel_case() {
        let json = serde_json::to_string(&Recommendation::StrongBuy).unwrap();
        assert_eq!(json, "\"strongBuy\"");
    }
}
