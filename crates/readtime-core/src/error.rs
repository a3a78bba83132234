//! Error types for readtime-core.
//!
//! Rendering itself never fails: anomalies in stored settings are replaced
//! with defaults. Errors only arise while loading process configuration,
//! reading or writing the option store, and validating admin input.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by an option store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The option file could not be read or written.
    #[error("failed to access option file {path}")]
    Io {
        /// Path of the option file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The option file does not hold a JSON object.
    #[error("option file {path} is not a valid JSON object")]
    Parse {
        /// Path of the option file.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The options could not be serialized.
    #[error("failed to serialize options: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias using [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by the admin settings surface.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// An unknown setting name was provided.
    #[error("unknown setting: {name}. Use: {available}")]
    UnknownField {
        /// The setting name that was requested.
        name: String,
        /// Comma-separated list of available setting names.
        available: String,
    },

    /// A value could not be parsed for the given setting.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The setting being assigned.
        field: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// Reading speed outside the range accepted by the admin form.
    #[error("reading speed must be between {min} and {max} words per minute, got {value}")]
    SpeedOutOfRange {
        /// The rejected speed.
        value: i64,
        /// Lower bound (inclusive).
        min: u32,
        /// Upper bound (inclusive).
        max: u32,
    },

    /// Placement value not offered by the admin form.
    #[error("unknown placement: {0}. Use: before, after, manual")]
    UnknownPlacement(String),

    /// The option store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias using [`SettingsError`].
pub type SettingsResult<T> = Result<T, SettingsError>;
