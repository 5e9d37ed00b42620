use alloc::{vec, vec::Vec};
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, FloatTensor, Shape};
use crate::config::Config;
use crate::module::ParamRegistry;
use crate::nn::Initializer;
use crate::{ConvError, ShapeError};

use super::{checks, Conv, ConvKind, BIAS, WEIGHT};

/// Configuration to create a [convolution](Conv) layer over 1, 2 or 3 spatial dimensions, using
/// the [init function](ConvConfig::init).
///
/// Tuple fields hold one value per spatial dimension. A single value is broadcast to every
/// spatial dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvConfig {
    /// The number of spatial dimensions the layer operates over.
    pub spatial_rank: usize,
    /// The number of input channels.
    pub channels_in: usize,
    /// The number of output channels.
    pub channels_out: usize,
    /// The size of the kernel.
    pub kernel_size: Vec<usize>,
    /// The stride of the convolution.
    #[serde(default = "default_one")]
    pub stride: Vec<usize>,
    /// The padding added to every spatial dimension.
    #[serde(default = "default_zero")]
    pub padding: Vec<usize>,
    /// Spacing between kernel elements.
    #[serde(default = "default_one")]
    pub dilation: Vec<usize>,
    /// Additional size added to one side of each output dimension. Transposed layers only.
    #[serde(default = "default_zero")]
    pub output_padding: Vec<usize>,
    /// Controls the connections between input and output channels.
    #[serde(default = "default_groups")]
    pub groups: usize,
    /// If the convolution is transposed.
    #[serde(default)]
    pub transposed: bool,
    /// If bias should be added to the output.
    #[serde(default = "default_bias")]
    pub bias: bool,
    /// The type of function used to initialize neural network parameters
    #[serde(default)]
    pub initializer: Initializer,
    /// If one dimensional layers should remove the trailing axis added to run the two dimensional
    /// kernels, returning `[batch_size, channels_out, length_out]` instead of
    /// `[batch_size, channels_out, length_out, 1]`.
    #[serde(default)]
    pub narrow_output: bool,
}

fn default_one() -> Vec<usize> {
    vec![1]
}

fn default_zero() -> Vec<usize> {
    vec![0]
}

fn default_groups() -> usize {
    1
}

fn default_bias() -> bool {
    true
}

impl Config for ConvConfig {}

/// Geometry of a validated configuration, with every tuple expanded to the spatial rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvGeometry {
    pub channels_in: usize,
    pub channels_out: usize,
    pub kernel_size: Vec<usize>,
    pub stride: Vec<usize>,
    pub padding: Vec<usize>,
    pub dilation: Vec<usize>,
    pub output_padding: Vec<usize>,
    pub groups: usize,
    pub transposed: bool,
}

impl ConvGeometry {
    /// `[channels_in, channels_out / groups] ++ kernel_size` when transposed,
    /// `[channels_out, channels_in / groups] ++ kernel_size` otherwise.
    pub fn weight_shape(&self) -> Shape {
        let channels = if self.transposed {
            [self.channels_in, self.channels_out / self.groups]
        } else {
            [self.channels_out, self.channels_in / self.groups]
        };

        Shape::new(channels).concat(&self.kernel_size)
    }

    pub fn bias_shape(&self) -> Shape {
        Shape::new([self.channels_out])
    }

    pub fn fan_in(&self) -> usize {
        self.channels_in * self.kernel_size.iter().product::<usize>()
    }
}

impl ConvConfig {
    /// Create a new configuration with the required fields; every other field has its default.
    pub fn new(
        spatial_rank: usize,
        channels_in: usize,
        channels_out: usize,
        kernel_size: impl Into<Vec<usize>>,
    ) -> Self {
        Self {
            spatial_rank,
            channels_in,
            channels_out,
            kernel_size: kernel_size.into(),
            stride: default_one(),
            padding: default_zero(),
            dilation: default_one(),
            output_padding: default_zero(),
            groups: default_groups(),
            transposed: false,
            bias: default_bias(),
            initializer: Initializer::default(),
            narrow_output: false,
        }
    }

    /// Sets the stride.
    pub fn with_stride(mut self, stride: impl Into<Vec<usize>>) -> Self {
        self.stride = stride.into();
        self
    }

    /// Sets the padding.
    pub fn with_padding(mut self, padding: impl Into<Vec<usize>>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Sets the dilation.
    pub fn with_dilation(mut self, dilation: impl Into<Vec<usize>>) -> Self {
        self.dilation = dilation.into();
        self
    }

    /// Sets the output padding.
    pub fn with_output_padding(mut self, output_padding: impl Into<Vec<usize>>) -> Self {
        self.output_padding = output_padding.into();
        self
    }

    /// Sets the number of groups.
    pub fn with_groups(mut self, groups: usize) -> Self {
        self.groups = groups;
        self
    }

    /// Sets whether the convolution is transposed.
    pub fn with_transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    /// Sets whether bias is added to the output.
    pub fn with_bias(mut self, bias: bool) -> Self {
        self.bias = bias;
        self
    }

    /// Sets the initializer.
    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = initializer;
        self
    }

    /// Sets whether one dimensional layers narrow their output back to three dimensions.
    pub fn with_narrow_output(mut self, narrow_output: bool) -> Self {
        self.narrow_output = narrow_output;
        self
    }

    /// Check every constraint between the configuration fields.
    pub fn validate(&self) -> Result<(), ConvError> {
        self.geometry().map(|_| ())
    }

    pub(crate) fn geometry(&self) -> Result<ConvGeometry, ConvError> {
        checks::checks_spatial_rank(self.spatial_rank)?;
        checks::checks_nonzero("channels", &[self.channels_in, self.channels_out])?;
        checks::checks_nonzero("groups", &[self.groups])?;

        let rank = self.spatial_rank;
        let kernel_size = checks::expand_tuple("kernel_size", &self.kernel_size, rank)?;
        let stride = checks::expand_tuple("stride", &self.stride, rank)?;
        let padding = checks::expand_tuple("padding", &self.padding, rank)?;
        let dilation = checks::expand_tuple("dilation", &self.dilation, rank)?;
        let output_padding = checks::expand_tuple("output_padding", &self.output_padding, rank)?;

        checks::checks_nonzero("kernel_size", &kernel_size)?;
        checks::checks_nonzero("stride", &stride)?;
        checks::checks_nonzero("dilation", &dilation)?;
        checks::checks_channels_div_groups(self.channels_in, self.channels_out, self.groups)?;
        checks::checks_output_padding(self.transposed, &output_padding)?;

        let geometry = ConvGeometry {
            channels_in: self.channels_in,
            channels_out: self.channels_out,
            kernel_size,
            stride,
            padding,
            dilation,
            output_padding,
            groups: self.groups,
            transposed: self.transposed,
        };

        // fan_in and the element counts of the parameters are computed unchecked later on.
        let fan_in = Shape::new([geometry.channels_in]).concat(&geometry.kernel_size);
        checks::checks_size("fan_in", &fan_in.dims)?;
        checks::checks_size(WEIGHT, &geometry.weight_shape().dims)?;

        Ok(geometry)
    }

    /// Allocate the parameters of a new [convolution](Conv) layer without initializing them.
    ///
    /// The weight is registered as `weight` and, when enabled, the bias as `bias`. Their content is
    /// unspecified until [reset_parameters](Conv::reset_parameters) is called. Nothing is
    /// allocated when the configuration is invalid.
    pub fn initialize_parameters<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<Conv<B>, ConvError> {
        let kind = ConvKind::<B>::new(self.spatial_rank, self.transposed)?;
        let geometry = self.geometry()?;

        let mut params = ParamRegistry::new();
        params.register(WEIGHT, B::float_empty(geometry.weight_shape(), device))?;

        if self.bias {
            params.register(BIAS, B::float_empty(geometry.bias_shape(), device))?;
        }

        log::debug!(
            "Allocated {} parameters with weight shape {:?}",
            kind.name(),
            geometry.weight_shape().dims
        );

        Conv::from_params(kind, geometry, self, params)
    }

    /// Initialize a new [convolution](Conv) layer, with its parameters filled by the
    /// [initializer](ConvConfig::initializer).
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Conv<B>, ConvError> {
        let mut conv = self.initialize_parameters(device)?;
        conv.reset_parameters();

        Ok(conv)
    }

    /// Initialize a new [convolution](Conv) layer with existing parameters, for instance the ones
    /// returned by [into_params](Conv::into_params).
    ///
    /// Parameter shapes must match the ones derived from the configuration, and a bias must be
    /// registered if and only if the configuration enables it.
    pub fn init_with<B: Backend>(
        &self,
        params: ParamRegistry<FloatTensor<B>>,
    ) -> Result<Conv<B>, ConvError> {
        let kind = ConvKind::<B>::new(self.spatial_rank, self.transposed)?;
        let geometry = self.geometry()?;

        if let Some(weight) = params.get(WEIGHT) {
            checks_param_shape::<B>(WEIGHT, weight.val(), geometry.weight_shape())?;
        }

        if let (true, Some(bias)) = (self.bias, params.get(BIAS)) {
            checks_param_shape::<B>(BIAS, bias.val(), geometry.bias_shape())?;
        }

        Conv::from_params(kind, geometry, self, params)
    }
}

fn checks_param_shape<B: Backend>(
    name: &str,
    tensor: &FloatTensor<B>,
    expected: Shape,
) -> Result<(), ConvError> {
    let found = B::float_shape(tensor);

    if found != expected {
        return Err(ShapeError::Param {
            name: name.into(),
            expected: expected.dims,
            found: found.dims,
        }
        .into());
    }

    Ok(())
}
