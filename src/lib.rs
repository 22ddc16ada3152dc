//! LGNS signals - technical indicators and heuristic market scoring

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{Config, IndicatorConfig, ScoringConfig};
pub use error::{Result, SignalError};
pub use services::signals::indicators::{Adx, BollingerBands, Cci, Ichimoku};
pub use services::signals::{predict, score_sentiment, Signal};
pub use services::{MarketReport, SignalEngine};
pub use types::*;
