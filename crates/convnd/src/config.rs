use alloc::{format, string::String};
use core::fmt::Debug;

/// Configuration IO error.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The content could not be parsed as a configuration.
    #[error("Config error => Invalid format: {0}")]
    InvalidFormat(String),

    /// The configuration could not be encoded.
    #[error("Config error => Can't encode configuration: {0}")]
    Encoding(String),

    /// File not found.
    #[error("Config error => File not found: {0}")]
    FileNotFound(String),
}

/// Configuration trait.
///
/// Configurations are plain serde values stored as pretty-printed JSON.
pub trait Config: Debug + serde::Serialize + serde::de::DeserializeOwned {
    /// Encodes the configuration as a JSON string.
    fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Encoding(format!("{err}")))
    }

    /// Decodes a configuration from a JSON string.
    fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|err| ConfigError::InvalidFormat(format!("{err}")))
    }

    /// Saves the configuration to a file.
    #[cfg(feature = "std")]
    fn save<P: AsRef<std::path::Path>>(&self, file: P) -> Result<(), ConfigError> {
        let content = self.to_json()?;
        std::fs::write(file.as_ref(), content)
            .map_err(|err| ConfigError::Encoding(format!("{}: {err}", file.as_ref().display())))
    }

    /// Loads the configuration from a file.
    #[cfg(feature = "std")]
    fn load<P: AsRef<std::path::Path>>(file: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(file.as_ref())
            .map_err(|_| ConfigError::FileNotFound(format!("{}", file.as_ref().display())))?;
        Self::from_json(&content)
    }

    /// Loads the configuration from a binary buffer holding UTF-8 JSON.
    fn load_binary(data: &[u8]) -> Result<Self, ConfigError> {
        let content = core::str::from_utf8(data)
            .map_err(|_| ConfigError::InvalidFormat("Could not parse data as utf-8.".into()))?;
        Self::from_json(content)
    }
}
