/// Convolution layers.
pub mod conv;

mod initializer;

pub use initializer::*;
