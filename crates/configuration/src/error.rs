use thiserror::Error;

/// Failures while assembling [`crate::Settings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file or a `FITGYM__*` variable could not be read or deserialized.
    #[error("Failed to load settings: {0}")]
    LoadError(#[from] config::ConfigError),

    /// The settings parsed but cannot be served with.
    #[error("Invalid setting: {0}")]
    ValidationError(String),
}
