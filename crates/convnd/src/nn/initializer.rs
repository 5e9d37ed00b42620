use libm::sqrt;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, FloatTensor};

/// Enum specifying with what values a tensor should be initialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Initializer {
    /// Fills tensor with specified value everywhere
    Constant {
        /// The value to fill the tensor with
        value: f64,
    },
    /// Fills tensor with 1s everywhere
    Ones,
    /// Fills tensor with 0s everywhere
    Zeros,
    /// Fills tensor with values drawn uniformly between specified values
    Uniform {
        /// The minimum value to draw from
        min: f64,
        /// The maximum value to draw from
        max: f64,
    },
    /// Fills tensor with values drawn uniformly between -1/sqrt(fan_in) and 1/sqrt(fan_in).
    #[default]
    FanInUniform,
}

impl Initializer {
    /// Fills the tensor in place.
    ///
    /// # Params
    ///
    /// - tensor: the tensor to fill, of any shape.
    /// - fan_in: number of inputs feeding one output unit of the layer owning the tensor.
    pub fn fill<B: Backend>(&self, tensor: &mut FloatTensor<B>, fan_in: usize) {
        match self {
            Self::Constant { value } => B::float_fill(tensor, *value),
            Self::Ones => B::float_fill(tensor, 1.0),
            Self::Zeros => B::float_fill(tensor, 0.0),
            Self::Uniform { min, max } => B::float_fill_uniform(tensor, *min, *max),
            Self::FanInUniform => {
                let bound = fan_in_bound(fan_in);
                B::float_fill_uniform(tensor, -bound, bound)
            }
        }
    }
}

/// Bound of the uniform distribution scaled by the fan in, `1 / sqrt(fan_in)`.
pub fn fan_in_bound(fan_in: usize) -> f64 {
    1.0 / sqrt(fan_in as f64)
}
