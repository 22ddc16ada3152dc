//! Technical indicator implementations.

pub mod adx;
pub mod bollinger;
pub mod cci;
pub mod ichimoku;
pub mod smoothing;

pub use adx::Adx;
pub use bollinger::BollingerBands;
pub use cci::Cci;
pub use ichimoku::Ichimoku;
