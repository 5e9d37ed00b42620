use alloc::{format, string::String, vec};

use crate::backend::{Backend, ConvOptions, ConvTransposeOptions, FloatTensor};
use crate::module::{Module, ModuleVisitor, Param, ParamRegistry};
use crate::nn::Initializer;
use crate::{ConvError, ShapeError};

use super::config::{ConvConfig, ConvGeometry};
use super::rank::{extend_tuple, narrow_rank, widen_rank, WIDENED_AXIS};
use super::{ConvKind, BIAS, WEIGHT};

/// Applies a convolution over input tensors with 1, 2 or 3 spatial dimensions, plain or
/// transposed.
///
/// Should be created with [ConvConfig].
///
/// # Params
///
/// - weight: Tensor of shape `[channels_out, channels_in / groups, ...kernel_size]`, or
///   `[channels_in, channels_out / groups, ...kernel_size]` when transposed, initialized by
///   default from a uniform distribution `U(-k, k)` where
///   `k = 1 / sqrt(channels_in * prod(kernel_size))`.
///
/// - bias: Tensor of shape `[channels_out]`, initialized like the weight.
#[derive(Debug, Clone)]
pub struct Conv<B: Backend> {
    kind: ConvKind<B>,
    geometry: ConvGeometry,
    initializer: Initializer,
    narrow_output: bool,
    weight: Param<FloatTensor<B>>,
    bias: Option<Param<FloatTensor<B>>>,
}

impl<B: Backend> Conv<B> {
    pub(crate) fn from_params(
        kind: ConvKind<B>,
        geometry: ConvGeometry,
        config: &ConvConfig,
        mut params: ParamRegistry<FloatTensor<B>>,
    ) -> Result<Self, ConvError> {
        let weight = params.remove(WEIGHT).ok_or_else(|| {
            ConvError::InternalInvariant(format!("Parameter `{WEIGHT}` is not registered"))
        })?;

        let bias = match (config.bias, params.remove(BIAS)) {
            (true, Some(bias)) => Some(bias),
            (false, None) => None,
            (true, None) => {
                return Err(ConvError::InternalInvariant(format!(
                    "Layer is configured with a bias but `{BIAS}` is not registered"
                )))
            }
            (false, Some(_)) => {
                return Err(ConvError::InternalInvariant(format!(
                    "Layer is configured without bias but `{BIAS}` is already allocated"
                )))
            }
        };

        if let Some(name) = params.names().next() {
            return Err(ConvError::InternalInvariant(format!(
                "Unexpected parameter `{name}` for a {} layer",
                kind.name()
            )));
        }

        Ok(Self {
            kind,
            geometry,
            initializer: config.initializer.clone(),
            narrow_output: config.narrow_output,
            weight,
            bias,
        })
    }

    /// Fill every parameter in place with the configured [initializer](Initializer).
    ///
    /// With the default initializer, values are drawn from `U(-k, k)` where
    /// `k = 1 / sqrt(fan_in)` and `fan_in = channels_in * prod(kernel_size)`.
    pub fn reset_parameters(&mut self) {
        let fan_in = self.geometry.fan_in();

        self.initializer.fill::<B>(self.weight.val_mut(), fan_in);

        if let Some(bias) = self.bias.as_mut() {
            self.initializer.fill::<B>(bias.val_mut(), fan_in);
        }

        log::debug!(
            "Reset {} parameters with {:?} (fan_in={fan_in})",
            self.kind.name(),
            self.initializer
        );
    }

    /// Applies the forward pass on the input tensor.
    ///
    /// # Shapes
    ///
    /// - input: `[batch_size, channels_in, ...spatial_dims_in]`
    /// - output: `[batch_size, channels_out, ...spatial_dims_out]`
    ///
    /// One dimensional inputs are run through the two dimensional kernel with a trailing axis of
    /// size one, which is kept in the output unless
    /// [narrow_output](ConvConfig::narrow_output) is enabled.
    pub fn forward(&self, input: FloatTensor<B>) -> Result<FloatTensor<B>, ConvError> {
        let shape = B::float_shape(&input);
        let expected = self.kind.input_rank();

        if shape.num_dims() != expected {
            return Err(ShapeError::InputRank {
                expected,
                found: shape.num_dims(),
            }
            .into());
        }

        log::debug!("Dispatching {:?} on input {:?}", self.kind, shape.dims);

        let weight = self.weight.val().clone();
        let bias = self.bias.as_ref().map(|bias| bias.val().clone());

        let output = match self.kind {
            ConvKind::Conv1d(conv2d) => conv2d(
                widen_rank::<B>(input, WIDENED_AXIS),
                widen_rank::<B>(weight, WIDENED_AXIS),
                bias,
                self.conv_options(),
            ),
            ConvKind::Conv2d(conv2d) => conv2d(input, weight, bias, self.conv_options()),
            ConvKind::Conv3d(conv3d) => conv3d(input, weight, bias, self.conv_options()),
            ConvKind::ConvTranspose1d(conv_transpose2d) => conv_transpose2d(
                widen_rank::<B>(input, WIDENED_AXIS),
                widen_rank::<B>(weight, WIDENED_AXIS),
                bias,
                self.conv_transpose_options(),
            ),
            ConvKind::ConvTranspose2d(conv_transpose2d) => {
                conv_transpose2d(input, weight, bias, self.conv_transpose_options())
            }
            ConvKind::ConvTranspose3d(conv_transpose3d) => {
                conv_transpose3d(input, weight, bias, self.conv_transpose_options())
            }
        };

        if self.narrow_output && self.kind.spatial_rank() == 1 {
            return narrow_rank::<B>(output, WIDENED_AXIS);
        }

        Ok(output)
    }

    // Widened one dimensional layers get a neutral geometry on the trailing axis.
    fn conv_options<const N: usize>(&self) -> ConvOptions<N> {
        ConvOptions::new(
            extend_tuple(&self.geometry.stride, 1),
            extend_tuple(&self.geometry.padding, 0),
            extend_tuple(&self.geometry.dilation, 1),
            self.geometry.groups,
        )
    }

    fn conv_transpose_options<const N: usize>(&self) -> ConvTransposeOptions<N> {
        ConvTransposeOptions::new(
            extend_tuple(&self.geometry.stride, 1),
            extend_tuple(&self.geometry.padding, 0),
            extend_tuple(&self.geometry.output_padding, 0),
            extend_tuple(&self.geometry.dilation, 1),
            self.geometry.groups,
        )
    }

    /// Gives the parameters back, registered under their names with their ids.
    pub fn into_params(self) -> ParamRegistry<FloatTensor<B>> {
        let mut entries = vec![(String::from(WEIGHT), self.weight)];

        if let Some(bias) = self.bias {
            entries.push((String::from(BIAS), bias));
        }

        ParamRegistry::from_entries(entries)
    }

    /// The weight parameter.
    pub fn weight(&self) -> &Param<FloatTensor<B>> {
        &self.weight
    }

    /// The bias parameter, if enabled.
    pub fn bias(&self) -> Option<&Param<FloatTensor<B>>> {
        self.bias.as_ref()
    }

    /// The kind of convolution, holding the backend kernel.
    pub fn kind(&self) -> ConvKind<B> {
        self.kind
    }

    /// The number of input and output channels.
    pub fn channels(&self) -> [usize; 2] {
        [self.geometry.channels_in, self.geometry.channels_out]
    }

    /// The size of the kernel, one value per spatial dimension.
    pub fn kernel_size(&self) -> &[usize] {
        &self.geometry.kernel_size
    }

    /// The stride, one value per spatial dimension.
    pub fn stride(&self) -> &[usize] {
        &self.geometry.stride
    }

    /// The padding, one value per spatial dimension.
    pub fn padding(&self) -> &[usize] {
        &self.geometry.padding
    }

    /// The dilation, one value per spatial dimension.
    pub fn dilation(&self) -> &[usize] {
        &self.geometry.dilation
    }

    /// The output padding, one value per spatial dimension.
    pub fn output_padding(&self) -> &[usize] {
        &self.geometry.output_padding
    }

    /// The number of groups.
    pub fn groups(&self) -> usize {
        self.geometry.groups
    }
}

impl<B: Backend> Module<B> for Conv<B> {
    fn visit<V: ModuleVisitor<B>>(&self, visitor: &mut V) {
        visitor.visit(WEIGHT, &self.weight);

        if let Some(bias) = &self.bias {
            visitor.visit(BIAS, bias);
        }
    }
}

impl<B: Backend> core::fmt::Display for Conv<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {{stride: {:?}, kernel_size: {:?}, dilation: {:?}, groups: {}, padding: {:?}",
            self.kind.name(),
            self.geometry.stride,
            self.geometry.kernel_size,
            self.geometry.dilation,
            self.geometry.groups,
            self.geometry.padding,
        )?;

        if self.kind.is_transposed() {
            write!(f, ", output_padding: {:?}", self.geometry.output_padding)?;
        }

        write!(f, ", params: {}}}", self.num_params())
    }
}
