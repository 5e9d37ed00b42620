//! Backend used by the unit tests.
//!
//! Tensors are `ndarray` arrays and random fills use a seedable `StdRng`. The convolution
//! kernels don't compute anything: they record the call in a thread local log, see
//! [take_calls], and return zeros with the output shape of the convolution.

use std::cell::RefCell;
use std::string::String;
use std::sync::Mutex;
use std::vec::Vec;

use ndarray::{ArrayD, Axis, IxDyn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::backend::{
    Backend, ConvOptions, ConvTransposeOptions, FloatTensor, FloatTensorOps, ModuleOps, Shape,
};

static SEED: Mutex<Option<StdRng>> = Mutex::new(None);

thread_local! {
    static CALLS: RefCell<Vec<KernelCall>> = const { RefCell::new(Vec::new()) };
}

/// Backend for test cases.
#[derive(Clone, Copy, Default, Debug)]
pub struct TestBackend;

/// The only device of the [TestBackend].
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct TestDevice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kernel {
    Conv2d,
    Conv3d,
    ConvTranspose2d,
    ConvTranspose3d,
}

/// A kernel invocation, with the shapes of its operands and its options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelCall {
    pub kernel: Kernel,
    pub input: Vec<usize>,
    pub weight: Vec<usize>,
    pub bias: Option<Vec<usize>>,
    pub stride: Vec<usize>,
    pub padding: Vec<usize>,
    pub padding_out: Vec<usize>,
    pub dilation: Vec<usize>,
    pub groups: usize,
}

/// Drains the kernel calls made on the current thread.
pub fn take_calls() -> Vec<KernelCall> {
    CALLS.with(|calls| calls.take())
}

pub fn tensor(dims: &[usize]) -> ArrayD<f32> {
    ArrayD::zeros(IxDyn(dims))
}

pub fn assert_within_range(tensor: &ArrayD<f32>, low: f32, high: f32) {
    for value in tensor.iter() {
        assert!(
            (low..=high).contains(value),
            "Expected every value to be in [{low}, {high}], got {value}"
        );
    }
}

impl Backend for TestBackend {
    type Device = TestDevice;
    type FloatTensorPrimitive = ArrayD<f32>;

    fn name() -> String {
        String::from("test-ndarray")
    }

    fn seed(seed: u64) {
        let rng = StdRng::seed_from_u64(seed);
        let mut seed = SEED.lock().unwrap();
        *seed = Some(rng);
    }
}

impl FloatTensorOps<Self> for TestBackend {
    fn float_empty(shape: Shape, _device: &TestDevice) -> ArrayD<f32> {
        tensor(&shape.dims)
    }

    fn float_shape(tensor: &ArrayD<f32>) -> Shape {
        Shape::from(tensor.shape())
    }

    fn float_fill(tensor: &mut ArrayD<f32>, value: f64) {
        tensor.fill(value as f32);
    }

    fn float_fill_uniform(tensor: &mut ArrayD<f32>, low: f64, high: f64) {
        let mut seed = SEED.lock().unwrap();
        let rng = seed.get_or_insert_with(StdRng::from_entropy);
        let (low, high) = (low as f32, high as f32);

        tensor.mapv_inplace(|_| rng.gen_range(low..=high));
    }

    fn float_unsqueeze_dim(tensor: ArrayD<f32>, dim: usize) -> ArrayD<f32> {
        tensor.insert_axis(Axis(dim))
    }

    fn float_squeeze_dim(tensor: ArrayD<f32>, dim: usize) -> ArrayD<f32> {
        tensor.remove_axis(Axis(dim))
    }
}

impl ModuleOps<Self> for TestBackend {
    fn conv2d(
        x: FloatTensor<Self>,
        weight: FloatTensor<Self>,
        bias: Option<FloatTensor<Self>>,
        options: ConvOptions<2>,
    ) -> FloatTensor<Self> {
        conv(Kernel::Conv2d, &x, &weight, bias.as_ref(), &options)
    }

    fn conv3d(
        x: FloatTensor<Self>,
        weight: FloatTensor<Self>,
        bias: Option<FloatTensor<Self>>,
        options: ConvOptions<3>,
    ) -> FloatTensor<Self> {
        conv(Kernel::Conv3d, &x, &weight, bias.as_ref(), &options)
    }

    fn conv_transpose2d(
        x: FloatTensor<Self>,
        weight: FloatTensor<Self>,
        bias: Option<FloatTensor<Self>>,
        options: ConvTransposeOptions<2>,
    ) -> FloatTensor<Self> {
        conv_transpose(Kernel::ConvTranspose2d, &x, &weight, bias.as_ref(), &options)
    }

    fn conv_transpose3d(
        x: FloatTensor<Self>,
        weight: FloatTensor<Self>,
        bias: Option<FloatTensor<Self>>,
        options: ConvTransposeOptions<3>,
    ) -> FloatTensor<Self> {
        conv_transpose(Kernel::ConvTranspose3d, &x, &weight, bias.as_ref(), &options)
    }
}

fn conv<const N: usize>(
    kernel: Kernel,
    x: &ArrayD<f32>,
    weight: &ArrayD<f32>,
    bias: Option<&ArrayD<f32>>,
    options: &ConvOptions<N>,
) -> ArrayD<f32> {
    record(KernelCall {
        kernel,
        input: x.shape().to_vec(),
        weight: weight.shape().to_vec(),
        bias: bias.map(|bias| bias.shape().to_vec()),
        stride: options.stride.to_vec(),
        padding: options.padding.to_vec(),
        padding_out: Vec::new(),
        dilation: options.dilation.to_vec(),
        groups: options.groups,
    });

    // out = (in + 2 * padding - dilation * (kernel - 1) - 1) / stride + 1
    let mut dims = vec![x.shape()[0], weight.shape()[0]];
    for i in 0..N {
        let size_in = x.shape()[i + 2] + 2 * options.padding[i];
        let kernel_span = options.dilation[i] * (weight.shape()[i + 2] - 1) + 1;
        dims.push((size_in - kernel_span) / options.stride[i] + 1);
    }

    tensor(&dims)
}

fn conv_transpose<const N: usize>(
    kernel: Kernel,
    x: &ArrayD<f32>,
    weight: &ArrayD<f32>,
    bias: Option<&ArrayD<f32>>,
    options: &ConvTransposeOptions<N>,
) -> ArrayD<f32> {
    record(KernelCall {
        kernel,
        input: x.shape().to_vec(),
        weight: weight.shape().to_vec(),
        bias: bias.map(|bias| bias.shape().to_vec()),
        stride: options.stride.to_vec(),
        padding: options.padding.to_vec(),
        padding_out: options.padding_out.to_vec(),
        dilation: options.dilation.to_vec(),
        groups: options.groups,
    });

    // out = (in - 1) * stride - 2 * padding + dilation * (kernel - 1) + padding_out + 1
    let mut dims = vec![x.shape()[0], weight.shape()[1] * options.groups];
    for i in 0..N {
        let size = (x.shape()[i + 2] - 1) * options.stride[i]
            + options.dilation[i] * (weight.shape()[i + 2] - 1)
            + options.padding_out[i]
            + 1;
        dims.push(size - 2 * options.padding[i]);
    }

    tensor(&dims)
}

fn record(call: KernelCall) {
    CALLS.with(|calls| calls.borrow_mut().push(call));
}
