use crate::backend::{Backend, ConvOptions, ConvTransposeOptions, FloatTensor};
use crate::ConvError;

use super::checks;

/// Signature of a plain convolution kernel.
pub type ConvFn<B, const N: usize> = fn(
    FloatTensor<B>,
    FloatTensor<B>,
    Option<FloatTensor<B>>,
    ConvOptions<N>,
) -> FloatTensor<B>;

/// Signature of a transposed convolution kernel.
pub type ConvTransposeFn<B, const N: usize> = fn(
    FloatTensor<B>,
    FloatTensor<B>,
    Option<FloatTensor<B>>,
    ConvTransposeOptions<N>,
) -> FloatTensor<B>;

/// The kind of convolution a layer performs, holding the backend kernel it delegates to.
///
/// One dimensional variants hold two dimensional kernels: their inputs and weights are widened
/// with a trailing axis of size one before the call.
pub enum ConvKind<B: Backend> {
    /// One dimensional convolution.
    Conv1d(ConvFn<B, 2>),
    /// Two dimensional convolution.
    Conv2d(ConvFn<B, 2>),
    /// Three dimensional convolution.
    Conv3d(ConvFn<B, 3>),
    /// One dimensional transposed convolution.
    ConvTranspose1d(ConvTransposeFn<B, 2>),
    /// Two dimensional transposed convolution.
    ConvTranspose2d(ConvTransposeFn<B, 2>),
    /// Three dimensional transposed convolution.
    ConvTranspose3d(ConvTransposeFn<B, 3>),
}

impl<B: Backend> ConvKind<B> {
    /// Resolve the kernel for the given spatial rank and mode.
    pub fn new(spatial_rank: usize, transposed: bool) -> Result<Self, ConvError> {
        let kind = match (spatial_rank, transposed) {
            (1, false) => Self::Conv1d(B::conv2d),
            (2, false) => Self::Conv2d(B::conv2d),
            (3, false) => Self::Conv3d(B::conv3d),
            (1, true) => Self::ConvTranspose1d(B::conv_transpose2d),
            (2, true) => Self::ConvTranspose2d(B::conv_transpose2d),
            (3, true) => Self::ConvTranspose3d(B::conv_transpose3d),
            (rank, _) => return Err(checks::unsupported_rank(rank)),
        };

        Ok(kind)
    }

    /// Number of spatial dimensions.
    pub fn spatial_rank(&self) -> usize {
        match self {
            Self::Conv1d(_) | Self::ConvTranspose1d(_) => 1,
            Self::Conv2d(_) | Self::ConvTranspose2d(_) => 2,
            Self::Conv3d(_) | Self::ConvTranspose3d(_) => 3,
        }
    }

    /// Rank of the inputs: the batch and channel dimensions followed by the spatial ones.
    pub fn input_rank(&self) -> usize {
        self.spatial_rank() + 2
    }

    /// Whether the convolution is transposed.
    pub fn is_transposed(&self) -> bool {
        matches!(
            self,
            Self::ConvTranspose1d(_) | Self::ConvTranspose2d(_) | Self::ConvTranspose3d(_)
        )
    }

    /// Name of the layer kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Conv1d(_) => "Conv1d",
            Self::Conv2d(_) => "Conv2d",
            Self::Conv3d(_) => "Conv3d",
            Self::ConvTranspose1d(_) => "ConvTranspose1d",
            Self::ConvTranspose2d(_) => "ConvTranspose2d",
            Self::ConvTranspose3d(_) => "ConvTranspose3d",
        }
    }
}

impl<B: Backend> Clone for ConvKind<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Backend> Copy for ConvKind<B> {}

impl<B: Backend> core::fmt::Debug for ConvKind<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
