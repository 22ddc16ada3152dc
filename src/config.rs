use crate::error::{Result, SignalError};
use std::env;
use std::path::PathBuf;

/// 24h volume treated as "normal" for the token (ratio 1.0).
pub const DEFAULT_VOLUME_BASELINE: f64 = 40_000_000.0;

/// Pool liquidity treated as "normal" for the token (ratio 1.0).
pub const DEFAULT_LIQUIDITY_BASELINE: f64 = 350_000_000.0;

/// Half-width of the band synthesized around a price when high/low are missing.
pub const DEFAULT_SYNTHETIC_RANGE: f64 = 0.01;

/// Calibration constants for the market scorers.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Volume baseline used for the volume ratio.
    pub volume_baseline: f64,
    /// Liquidity baseline used for the liquidity ratio.
    pub liquidity_baseline: f64,
    /// Fraction of price used to synthesize high (`1 + r`) and low (`1 - r`).
    pub synthetic_range: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            volume_baseline: DEFAULT_VOLUME_BASELINE,
            liquidity_baseline: DEFAULT_LIQUIDITY_BASELINE,
            synthetic_range: DEFAULT_SYNTHETIC_RANGE,
        }
    }
}

/// Window lengths for the indicator engines.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub adx_period: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub cci_period: usize,
    pub tenkan_period: usize,
    pub kijun_period: usize,
    pub senkou_b_period: usize,
    pub displacement: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            adx_period: 14,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            cci_period: 20,
            tenkan_period: 9,
            kijun_period: 26,
            senkou_b_period: 52,
            displacement: 26,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Scorer calibration.
    pub scoring: ScoringConfig,
    /// Indicator periods.
    pub indicators: IndicatorConfig,
    /// JSON file holding the price history (chart endpoint payload).
    pub history_path: Option<PathBuf>,
    /// JSON file holding the market snapshot (dex endpoint payload).
    pub snapshot_path: Option<PathBuf>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let scoring_defaults = ScoringConfig::default();
        let indicator_defaults = IndicatorConfig::default();

        Self {
            scoring: ScoringConfig {
                volume_baseline: env_or("VOLUME_BASELINE", scoring_defaults.volume_baseline),
                liquidity_baseline: env_or(
                    "LIQUIDITY_BASELINE",
                    scoring_defaults.liquidity_baseline,
                ),
                synthetic_range: env_or("SYNTHETIC_RANGE", scoring_defaults.synthetic_range),
            },
            indicators: IndicatorConfig {
                adx_period: env_or("ADX_PERIOD", indicator_defaults.adx_period),
                bollinger_period: env_or("BOLLINGER_PERIOD", indicator_defaults.bollinger_period),
                bollinger_multiplier: env_or(
                    "BOLLINGER_MULTIPLIER",
                    indicator_defaults.bollinger_multiplier,
                ),
                cci_period: env_or("CCI_PERIOD", indicator_defaults.cci_period),
                tenkan_period: env_or("ICHIMOKU_TENKAN", indicator_defaults.tenkan_period),
                kijun_period: env_or("ICHIMOKU_KIJUN", indicator_defaults.kijun_period),
                senkou_b_period: env_or("ICHIMOKU_SENKOU_B", indicator_defaults.senkou_b_period),
                displacement: env_or("ICHIMOKU_DISPLACEMENT", indicator_defaults.displacement),
            },
            history_path: env::var("PRICE_HISTORY_PATH").ok().map(PathBuf::from),
            snapshot_path: env::var("MARKET_SNAPSHOT_PATH").ok().map(PathBuf::from),
        }
    }

    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("ADX_PERIOD", self.indicators.adx_period),
            ("BOLLINGER_PERIOD", self.indicators.bollinger_period),
            ("CCI_PERIOD", self.indicators.cci_period),
            ("ICHIMOKU_TENKAN", self.indicators.tenkan_period),
            ("ICHIMOKU_KIJUN", self.indicators.kijun_period),
            ("ICHIMOKU_SENKOU_B", self.indicators.senkou_b_period),
        ];
        if let Some((key, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(SignalError::InvalidConfig(format!("{} must be at least 1", key)));
        }

        if !(self.indicators.bollinger_multiplier > 0.0) {
            return Err(SignalError::InvalidConfig(
                "BOLLINGER_MULTIPLIER must be positive".to_string(),
            ));
        }
        if !(self.scoring.volume_baseline > 0.0) {
            return Err(SignalError::InvalidConfig(
                "VOLUME_BASELINE must be positive".to_string(),
            ));
        }
        if !(self.scoring.liquidity_baseline > 0.0) {
            return Err(SignalError::InvalidConfig(
                "LIQUIDITY_BASELINE must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.scoring.synthetic_range) {
            return Err(SignalError::InvalidConfig(
                "SYNTHETIC_RANGE must be in [0, 1)".to_string(),
            ));
        }

        Ok(())
    }
}
