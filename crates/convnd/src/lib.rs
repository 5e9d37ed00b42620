#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A generic N-dimensional convolution layer.
//!
//! The layer owns its learnable parameters, validates its configuration and the rank of its
//! inputs, and delegates the actual computation to the convolution primitives of a
//! [backend](backend::Backend).
//!
//! ```rust,ignore
//! use convnd::nn::conv::ConvConfig;
//!
//! let conv = ConvConfig::new(2, 3, 16, [3, 3])
//!     .with_padding([1])
//!     .init::<MyBackend>(&device)?;
//! let output = conv.forward(input)?;
//! ```

#[macro_use]
extern crate derive_new;

extern crate alloc;

/// Re-export serde for configuration consumers.
pub use serde;

/// The backend seam: tensor primitives and convolution kernels.
pub mod backend;

/// The configuration module.
pub mod config;

/// Module for the neural network module.
pub mod module;

/// Neural network layers.
pub mod nn;

mod error;

pub use error::{ConvError, ShapeError};

#[cfg(test)]
mod test_backend;

/// Backend for test cases
#[cfg(test)]
pub type TestBackend = test_backend::TestBackend;
