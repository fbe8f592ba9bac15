//! Error types for declaration parsing and loading.

use std::path::PathBuf;

/// Errors that can occur while building or loading declarations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A pin label could not be parsed (expected e.g. `PA9`).
    #[error("invalid pin '{input}': expected a port letter and number such as PA9")]
    InvalidPin {
        /// The rejected input.
        input: String,
    },

    /// A pin number outside `0..=15`.
    #[error("pin number {number} on port {port} is out of range (0-15)")]
    PinOutOfRange {
        /// Port letter.
        port: char,
        /// Rejected pin number.
        number: u8,
    },

    /// A parameter value that has no meaning for its field.
    #[error("invalid value '{value}' for {field}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading declaration files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Declaration file not found.
    #[error("declaration file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Declaration file with an extension other than `.toml` or `.json`.
    #[error("unsupported declaration format: {} (expected .toml or .json)", path.display())]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
