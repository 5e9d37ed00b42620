mod base;
mod param;
mod registry;

pub use base::*;
pub use param::*;
pub use registry::*;
