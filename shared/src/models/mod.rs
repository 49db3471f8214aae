//! Per-feature request records

mod crop;
mod irrigation;
mod price;
mod risk;
mod yield_prediction;

pub use crop::*;
pub use irrigation::*;
pub use price::*;
pub use risk::*;
pub use yield_prediction::*;
