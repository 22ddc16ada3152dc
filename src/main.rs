use anyhow::Context;
use lgns_signals::services::{JsonFileSource, MarketReport, SignalEngine};
use lgns_signals::Config;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    generated_at: String,
    #[serde(flatten)]
    report: MarketReport,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lgns_signals=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env();
    config.validate()?;

    // CLI arguments take precedence over the environment
    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let history_path = args
        .next()
        .or(config.history_path.clone())
        .context("no price history path (argument 1 or PRICE_HISTORY_PATH)")?;
    let snapshot_path = args
        .next()
        .or(config.snapshot_path.clone())
        .context("no market snapshot path (argument 2 or MARKET_SNAPSHOT_PATH)")?;

    info!(
        "Analyzing {} with snapshot {}",
        history_path.display(),
        snapshot_path.display()
    );

    let engine = SignalEngine::new(&config.indicators, &config.scoring)?;
    let report = engine.report_from(
        &JsonFileSource::new(&history_path),
        &JsonFileSource::new(&snapshot_path),
    )?;

    if let Some(summary) = &report.summary {
        info!(
            "Indicators {} ({})",
            summary.composite_score,
            summary.direction.label()
        );
    }
    info!(
        "Sentiment {} ({})",
        report.sentiment.score,
        report.sentiment.level.label()
    );

    let output = Output {
        generated_at: chrono::Utc::now().to_rfc3339(),
        report,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
