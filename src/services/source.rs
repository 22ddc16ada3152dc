//! Data sources feeding the engine.
//!
//! Fetching lives outside this crate; these traits are the seam. The file
//! source reads the JSON bodies of the chart and dex endpoints as saved to disk.

use crate::error::{Result, SignalError};
use crate::types::{MarketSnapshot, PricePoint};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Provides an ordered price history, oldest first.
pub trait PriceHistorySource: Send + Sync {
    fn price_history(&self) -> Result<Vec<PricePoint>>;
}

/// Provides the latest market snapshot.
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self) -> Result<MarketSnapshot>;
}

/// In-memory source returning fixed values.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub history: Vec<PricePoint>,
    pub snapshot: Option<MarketSnapshot>,
}

impl StaticSource {
    pub fn new(history: Vec<PricePoint>, snapshot: MarketSnapshot) -> Self {
        Self {
            history,
            snapshot: Some(snapshot),
        }
    }
}

impl PriceHistorySource for StaticSource {
    fn price_history(&self) -> Result<Vec<PricePoint>> {
        Ok(self.history.clone())
    }
}

impl SnapshotSource for StaticSource {
    fn snapshot(&self) -> Result<MarketSnapshot> {
        self.snapshot
            .clone()
            .ok_or_else(|| SignalError::Source("no snapshot configured".to_string()))
    }
}

/// Chart payloads come either bare or wrapped in `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChartPayload {
    Bare(Vec<PricePoint>),
    Wrapped { data: Vec<PricePoint> },
}

/// Reads one JSON document per call from a file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read(&self) -> Result<String> {
        debug!("Reading {}", self.path.display());
        fs::read_to_string(&self.path).map_err(|e| {
            SignalError::Source(format!("failed to read {}: {}", self.path.display(), e))
        })
    }
}

impl PriceHistorySource for JsonFileSource {
    fn price_history(&self) -> Result<Vec<PricePoint>> {
        let payload: ChartPayload = serde_json::from_str(&self.read()?)?;
        Ok(match payload {
            ChartPayload::Bare(points) => points,
            ChartPayload::Wrapped { data } => data,
        })
    }
}

impl SnapshotSource for JsonFileSource {
    fn snapshot(&self) -> Result<MarketSnapshot> {
        Ok(serde_json::from_str(&self.read()?)?)
    }
}
