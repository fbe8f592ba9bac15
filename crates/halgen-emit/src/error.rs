//! Errors from the emission layer.

use halgen_core::InstanceId;
use thiserror::Error;

/// Convenience alias for results within the emit crate.
pub type Result<T> = std::result::Result<T, EmitError>;

/// Errors that can occur while rendering or writing generated output.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("unknown output format: '{name}'. Available formats: c, json")]
    UnknownFormat { name: String },

    /// A declaration lacks what its kind needs to be rendered.
    #[error("{instance}: cannot render declaration: {reason}")]
    Inconsistent {
        instance: InstanceId,
        reason: &'static str,
    },

    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
