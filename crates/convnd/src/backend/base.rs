use alloc::string::String;

use super::ops::{FloatTensorOps, ModuleOps};

/// This trait defines all types and functions a backend needs to provide so that convolution
/// layers can run on it.
///
/// ## Design
///
/// The layers never allocate memory, draw random numbers or compute a convolution themselves.
/// Those concerns belong to the backend, which exposes them through two groups of operations:
///
/// - [FloatTensorOps]: allocation, shape inspection, in-place fills and rank changes.
/// - [ModuleOps]: the plain and transposed convolution kernels, in two and three dimensions.
///
/// One dimensional convolutions are executed through the two dimensional kernels, so a backend
/// does not need to provide a dedicated one dimensional kernel.
///
/// ### Multi-Threaded
///
/// Backend tensor types are all `Clone` + `Send` + `Sync`, which allows a layer to be shared
/// between threads for forward passes. Parameter mutation requires exclusive access to the
/// layer, so it can't race with a forward pass.
pub trait Backend:
    FloatTensorOps<Self>
    + ModuleOps<Self>
    + Clone
    + Default
    + Sized
    + Send
    + Sync
    + core::fmt::Debug
    + 'static
{
    /// Device type.
    type Device: Clone + Default + PartialEq + Send + Sync + core::fmt::Debug;

    /// Tensor primitive to be used for all float operations.
    type FloatTensorPrimitive: Clone + Send + Sync + core::fmt::Debug + 'static;

    /// Name of the backend.
    fn name() -> String;

    /// Seeds the backend.
    ///
    /// This should ensure deterministic random fills for a single-threaded program.
    fn seed(seed: u64);
}
