use alloc::{string::String, vec::Vec};

/// Errors raised while building or running a convolution layer.
///
/// Every variant is raised synchronously where it is detected and is never retried: each one
/// traces back to a misconfiguration or to a misuse of the layer, not to a transient condition.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvError {
    /// The static configuration of the layer is invalid.
    #[error("Invalid convolution configuration: {0}")]
    Configuration(String),

    /// A tensor does not have the shape the layer expects.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The parameter bookkeeping of the layer is inconsistent.
    ///
    /// This indicates a misuse of the initialization lifecycle rather than bad user input.
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// Shape mismatches detected by the convolution layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The input tensor rank does not match the spatial rank of the layer.
    #[error("Expected an input tensor with {expected} dimensions, got {found}")]
    InputRank {
        /// Required rank, the spatial rank plus the batch and channel dimensions.
        expected: usize,
        /// Rank of the provided tensor.
        found: usize,
    },

    /// A parameter tensor does not have the shape derived from the configuration.
    #[error("Parameter `{name}` has shape {found:?}, expected {expected:?}")]
    Param {
        /// Registered name of the parameter.
        name: String,
        /// Shape derived from the configuration.
        expected: Vec<usize>,
        /// Shape of the provided tensor.
        found: Vec<usize>,
    },

    /// The axis to remove is out of range or is not of size one.
    #[error("Can't remove axis {axis} from a tensor of shape {dims:?}")]
    NarrowAxis {
        /// Axis that was requested.
        axis: usize,
        /// Shape of the tensor.
        dims: Vec<usize>,
    },
}
