pub mod market;
pub mod price;
pub mod scoring;
pub mod signals;

pub use market::*;
pub use price::*;
pub use scoring::*;
pub use signals::*;
