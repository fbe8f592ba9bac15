//! Error types for capability-table operations.

use std::path::PathBuf;

/// Errors that can occur while loading or saving chip families.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing family files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Family file not found.
    #[error("family file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No built-in or project family with this name.
    #[error("unknown chip family '{name}'")]
    UnknownFamily {
        /// The requested family name.
        name: String,
    },
}

/// Result type for capability-table operations.
pub type Result<T> = std::result::Result<T, TargetError>;
