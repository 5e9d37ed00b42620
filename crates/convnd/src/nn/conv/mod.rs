mod base;
mod checks;
mod config;
mod kind;
mod rank;

pub use base::*;
pub use config::*;
pub use kind::*;
pub use rank::*;

/// Name the weight is registered under.
pub const WEIGHT: &str = "weight";

/// Name the bias is registered under.
pub const BIAS: &str = "bias";
