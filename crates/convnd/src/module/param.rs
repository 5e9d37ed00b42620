use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_PARAM_ID: AtomicU64 = AtomicU64::new(0);

/// Parameter ID.
///
/// Identifies a parameter across its lifetime, independently of the name it is registered under.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParamId {
    value: u64,
}

impl ParamId {
    /// Create a new unique parameter ID.
    pub fn new() -> Self {
        Self {
            value: NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Gets the internal value of the id.
    pub fn val(&self) -> u64 {
        self.value
    }
}

impl Default for ParamId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ParamId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A trainable parameter.
#[derive(Debug, Clone)]
pub struct Param<T> {
    id: ParamId,
    value: T,
}

impl<T> Param<T> {
    /// Create a new parameter with a fresh [id](ParamId).
    pub fn from_tensor(value: T) -> Self {
        Self::initialized(ParamId::new(), value)
    }

    /// Create a parameter that keeps an existing id.
    pub fn initialized(id: ParamId, value: T) -> Self {
        Self { id, value }
    }

    /// The id of the parameter.
    pub fn id(&self) -> ParamId {
        self.id
    }

    /// The value of the parameter.
    pub fn val(&self) -> &T {
        &self.value
    }

    /// Mutable access to the value of the parameter, used for in-place updates.
    pub fn val_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Unwrap the value of the parameter.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> core::fmt::Display for Param<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Param: {}", self.id)
    }
}

impl<T> core::ops::Deref for Param<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let first = ParamId::new();
        let second = ParamId::new();

        assert_ne!(first, second);
    }

    #[test]
    fn initialized_keeps_the_id() {
        let param = Param::from_tensor(3.0);
        let id = param.id();
        let param = Param::initialized(id, param.into_value() * 2.0);

        assert_eq!(param.id(), id);
        assert_eq!(*param, 6.0);
    }
}
