//! Resolution error taxonomy.

use serde::Serialize;
use thiserror::Error;

use halgen_core::{InstanceId, PeripheralKind, PinRef, SignalRole};

/// A problem found while resolving a declaration set.
///
/// Every variant is recoverable by the caller: fix the declarations and
/// resolve again.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "kebab-case")]
pub enum ResolutionError {
    #[error("{pin} is claimed by both {first_owner} and {second_owner}")]
    PinConflict {
        pin: PinRef,
        first_owner: InstanceId,
        second_owner: InstanceId,
    },

    #[error("{instance}: {pin} cannot carry {role}{}", af_suffix(.af))]
    InvalidAlternateFunction {
        instance: InstanceId,
        pin: PinRef,
        role: SignalRole,
        /// The AF number the declaration asked for, if it named one.
        af: Option<u8>,
    },

    #[error("{instance}: unknown transfer mode '{tag}' (expected POLLING, INTERRUPT or DMA)")]
    UnknownTransferMode { instance: InstanceId, tag: String },

    #[error("instance {instance} is declared more than once")]
    DuplicateInstanceId { instance: InstanceId },

    #[error("{instance}: family {family} has no {kind} peripherals")]
    UnsupportedPeripheralKind {
        instance: InstanceId,
        kind: PeripheralKind,
        family: String,
    },

    #[error("{instance}: family {family} has no {kind} instance with this name")]
    UnknownInstance {
        instance: InstanceId,
        kind: PeripheralKind,
        family: String,
    },

    #[error("{instance}: pin {pin} does not exist on family {family}")]
    UnknownPin {
        instance: InstanceId,
        pin: PinRef,
        family: String,
    },

    #[error("{instance}: invalid {parameter}: {reason}")]
    InvalidParameter {
        instance: InstanceId,
        parameter: String,
        reason: String,
    },
}

fn af_suffix(af: &Option<u8>) -> String {
    match af {
        Some(n) => format!(" through AF{n}"),
        None => String::new(),
    }
}

impl ResolutionError {
    /// Short kebab-case code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ResolutionError::PinConflict { .. } => "pin-conflict",
            ResolutionError::InvalidAlternateFunction { .. } => "invalid-alternate-function",
            ResolutionError::UnknownTransferMode { .. } => "unknown-transfer-mode",
            ResolutionError::DuplicateInstanceId { .. } => "duplicate-instance-id",
            ResolutionError::UnsupportedPeripheralKind { .. } => "unsupported-peripheral-kind",
            ResolutionError::UnknownInstance { .. } => "unknown-instance",
            ResolutionError::UnknownPin { .. } => "unknown-pin",
            ResolutionError::InvalidParameter { .. } => "invalid-parameter",
        }
    }

    /// The instance the error is reported against.
    ///
    /// For pin conflicts this is the second claimant.
    pub fn instance(&self) -> &InstanceId {
        match self {
            ResolutionError::PinConflict { second_owner, .. } => second_owner,
            ResolutionError::InvalidAlternateFunction { instance, .. }
            | ResolutionError::UnknownTransferMode { instance, .. }
            | ResolutionError::DuplicateInstanceId { instance }
            | ResolutionError::UnsupportedPeripheralKind { instance, .. }
            | ResolutionError::UnknownInstance { instance, .. }
            | ResolutionError::UnknownPin { instance, .. }
            | ResolutionError::InvalidParameter { instance, .. } => instance,
        }
    }
}
