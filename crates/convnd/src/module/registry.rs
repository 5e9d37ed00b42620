use alloc::{format, string::String, vec::Vec};

use super::{Param, ParamId};
use crate::ConvError;

/// Named parameters of a module, in registration order.
///
/// A layer builds its registry when its parameters are allocated and gives it back through
/// [into_params](crate::nn::conv::Conv::into_params), so that the surrounding framework can
/// inspect, persist or reload parameters by name. Names are unique within a registry.
#[derive(Debug, Clone)]
pub struct ParamRegistry<T> {
    entries: Vec<(String, Param<T>)>,
}

impl<T> Default for ParamRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ParamRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    // Callers guarantee that names are unique.
    pub(crate) fn from_entries(entries: Vec<(String, Param<T>)>) -> Self {
        Self { entries }
    }

    /// Register a new parameter under the given name and return its freshly created id.
    pub fn register(&mut self, name: &str, value: T) -> Result<ParamId, ConvError> {
        let param = Param::from_tensor(value);
        let id = param.id();
        self.insert(name, param)?;

        Ok(id)
    }

    /// Register an existing parameter under the given name, keeping its id.
    pub fn insert(&mut self, name: &str, param: Param<T>) -> Result<(), ConvError> {
        if self.contains(name) {
            return Err(ConvError::InternalInvariant(format!(
                "Parameter `{name}` is already registered"
            )));
        }

        self.entries.push((name.into(), param));
        Ok(())
    }

    /// Whether a parameter is registered under the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Get the parameter registered under the given name.
    pub fn get(&self, name: &str) -> Option<&Param<T>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, param)| param)
    }

    /// Remove and return the parameter registered under the given name.
    pub fn remove(&mut self, name: &str) -> Option<Param<T>> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Names of the registered parameters.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over the registered parameters with their names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param<T>)> {
        self.entries
            .iter()
            .map(|(name, param)| (name.as_str(), param))
    }

    /// Number of registered parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameter is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
