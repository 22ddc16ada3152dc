pub mod signals;
pub mod source;

pub use signals::{MarketReport, SignalEngine};
pub use source::{JsonFileSource, PriceHistorySource, SnapshotSource, StaticSource};
