use super::{Backend, Shape};

/// Float tensor primitive type used by the backend.
pub type FloatTensor<B> = <B as Backend>::FloatTensorPrimitive;

/// Convolution options.
#[derive(new, Debug, Clone, Hash, PartialEq, Eq)]
pub struct ConvOptions<const N: usize> {
    /// Stride (non-zero).
    pub stride: [usize; N],

    /// Padding.
    pub padding: [usize; N],

    /// Dilation (non-zero).
    pub dilation: [usize; N],

    /// Groups (non-zero).
    pub groups: usize,
}

/// Transposed convolution options.
#[derive(new, Debug, Clone, Hash, PartialEq, Eq)]
pub struct ConvTransposeOptions<const N: usize> {
    /// Stride (non-zero).
    pub stride: [usize; N],

    /// Padding.
    pub padding: [usize; N],

    /// Padding added to one side of each output dimension.
    pub padding_out: [usize; N],

    /// Dilation (non-zero).
    pub dilation: [usize; N],

    /// Groups (non-zero).
    pub groups: usize,
}

/// Float tensor operations the layers rely on.
pub trait FloatTensorOps<B: Backend> {
    /// Allocates a tensor of the given shape on the given device.
    ///
    /// The content of the tensor is unspecified.
    fn float_empty(shape: Shape, device: &B::Device) -> FloatTensor<B>;

    /// Returns the shape of the tensor.
    fn float_shape(tensor: &FloatTensor<B>) -> Shape;

    /// Fills the tensor in place with the given value.
    fn float_fill(tensor: &mut FloatTensor<B>, value: f64);

    /// Fills the tensor in place with values drawn uniformly from `[low, high]`.
    fn float_fill_uniform(tensor: &mut FloatTensor<B>, low: f64, high: f64);

    /// Inserts a dimension of size one at the given position.
    fn float_unsqueeze_dim(tensor: FloatTensor<B>, dim: usize) -> FloatTensor<B>;

    /// Removes the dimension of size one at the given position.
    fn float_squeeze_dim(tensor: FloatTensor<B>, dim: usize) -> FloatTensor<B>;
}

/// Convolution kernels.
///
/// The numeric semantics of every kernel (output size, dilation interaction, gradients) are
/// owned entirely by the backend.
pub trait ModuleOps<B: Backend> {
    /// Two dimensional convolution.
    ///
    /// # Shapes
    ///
    /// x:      `[batch_size, channels_in, height, width]`,
    /// weight: `[channels_out, channels_in / groups, kernel_size_1, kernel_size_2]`,
    /// bias:   `[channels_out]`,
    fn conv2d(
        x: FloatTensor<B>,
        weight: FloatTensor<B>,
        bias: Option<FloatTensor<B>>,
        options: ConvOptions<2>,
    ) -> FloatTensor<B>;

    /// Three dimensional convolution.
    ///
    /// # Shapes
    ///
    /// x:      `[batch_size, channels_in, depth, height, width]`,
    /// weight: `[channels_out, channels_in / groups, kernel_size_1, kernel_size_2, kernel_size_3]`,
    /// bias:   `[channels_out]`,
    fn conv3d(
        x: FloatTensor<B>,
        weight: FloatTensor<B>,
        bias: Option<FloatTensor<B>>,
        options: ConvOptions<3>,
    ) -> FloatTensor<B>;

    /// Two dimensional transposed convolution.
    ///
    /// # Shapes
    ///
    /// x:      `[batch_size, channels_in, height, width]`,
    /// weight: `[channels_in, channels_out / groups, kernel_size_1, kernel_size_2]`,
    /// bias:   `[channels_out]`,
    fn conv_transpose2d(
        x: FloatTensor<B>,
        weight: FloatTensor<B>,
        bias: Option<FloatTensor<B>>,
        options: ConvTransposeOptions<2>,
    ) -> FloatTensor<B>;

    /// Three dimensional transposed convolution.
    ///
    /// # Shapes
    ///
    /// x:      `[batch_size, channels_in, depth, height, width]`,
    /// weight: `[channels_in, channels_out / groups, kernel_size_1, kernel_size_2, kernel_size_3]`,
    /// bias:   `[channels_out]`,
    fn conv_transpose3d(
        x: FloatTensor<B>,
        weight: FloatTensor<B>,
        bias: Option<FloatTensor<B>>,
        options: ConvTransposeOptions<3>,
    ) -> FloatTensor<B>;
}
