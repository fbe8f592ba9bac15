//! Peripheral configuration resolver for the halgen code generator.
//!
//! [`resolve`] checks a list of `PeripheralDeclaration`s against a chip
//! family's `CapabilityTable` and either returns a [`ResolvedModel`] or every
//! problem it found. Passes, in order:
//!
//! 0. instance-id uniqueness
//! 1. pin ownership
//! 2. capability checks (kind, instance, pin, alternate function)
//! 3. clock de-duplication
//! 4. transfer-mode validation
//! 5. parameter validation
//!
//! All passes run even after earlier ones fail, so one run reports everything.

pub mod error;
pub mod model;
mod passes;
pub mod report;
mod resolver;

pub use error::ResolutionError;
pub use model::{
    AlternateFunctionBinding, ClockDomain, ResolvedDeclaration, ResolvedModel, ResolvedParams,
    ResolvedPin,
};
pub use report::DiagnosticReport;
pub use resolver::{resolve, resolve_or_report};
