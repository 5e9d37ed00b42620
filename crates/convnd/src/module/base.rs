use core::marker::PhantomData;

use super::Param;
use crate::backend::{Backend, FloatTensor};

/// Trait for all neural network modules.
///
/// A module exposes its parameters to the surrounding framework through a
/// [visitor](ModuleVisitor), each one along with the name it was registered under.
pub trait Module<B: Backend>: Clone + Send + Sync + core::fmt::Debug {
    /// Visit each parameter of the module with a [visitor](ModuleVisitor).
    fn visit<V: ModuleVisitor<B>>(&self, visitor: &mut V);

    /// Get the number of parameters the module has.
    fn num_params(&self) -> usize {
        let mut counter = ParamCounter::<B>::default();
        self.visit(&mut counter);
        counter.num_params
    }
}

/// Module visitor trait.
pub trait ModuleVisitor<B: Backend> {
    /// Visit a parameter registered under `name`.
    fn visit(&mut self, name: &str, param: &Param<FloatTensor<B>>);
}

struct ParamCounter<B> {
    num_params: usize,
    _backend: PhantomData<B>,
}

impl<B> Default for ParamCounter<B> {
    fn default() -> Self {
        Self {
            num_params: 0,
            _backend: PhantomData,
        }
    }
}

impl<B: Backend> ModuleVisitor<B> for ParamCounter<B> {
    fn visit(&mut self, _name: &str, param: &Param<FloatTensor<B>>) {
        self.num_params += B::float_shape(param.val()).num_elements();
    }
}
