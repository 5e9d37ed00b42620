mod base;
mod ops;
mod shape;

pub use base::*;
pub use ops::*;
pub use shape::*;
