//! Chip-family capability tables for the halgen code generator.
//!
//! A capability table answers three questions for one chip family:
//! - **Routing:** which alternate-function number connects a pin to a peripheral signal
//! - **Clocks:** which clock-enable token belongs to a port or a peripheral instance
//! - **Inventory:** which ports, pins and peripheral instances exist at all
//!
//! Resolver logic only talks to the [`CapabilityTable`] trait, so a family can
//! come from the built-in data in [`builtin`] or from a `.family.toml` file.

pub mod builtin;
pub mod error;
pub mod family;
pub mod parse;
pub mod table;

pub use builtin::{builtin_families, resolve_family};
pub use error::{Result, TargetError};
pub use family::{ChipFamily, I2cTiming, InstanceCapability, PortCapability, SignalCapability};
pub use parse::{
    discover_families, family_to_toml, generate_template, load_family_toml, parse_family_toml,
    validate_family, ValidationIssue,
};
pub use table::CapabilityTable;
