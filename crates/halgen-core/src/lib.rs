//! Peripheral declaration data model for the halgen code generator.
//!
//! A generation run starts from a [`DeclarationSet`]: the peripherals a user
//! selected, the pins each one claims, and its operating parameters. These
//! types carry no chip knowledge; validation against a chip family happens in
//! `halgen-resolve`.

pub mod declaration;
pub mod error;
pub mod params;
pub mod pin;
pub mod signal;
pub mod transfer;

pub use declaration::{DeclarationSet, InstanceId, PeripheralDeclaration, PinAssignment};
pub use error::{CoreError, Result};
pub use params::gpio::{GpioLineParams, GpioMode, Pull, Speed};
pub use params::i2c::{AddressingMode, I2cDevice, I2cParams};
pub use params::uart::{FlowControl, Oversampling, Parity, StopBits, UartDirection, UartParams, WordLength};
pub use params::PeripheralParams;
pub use pin::{PinRef, Port};
pub use signal::{PeripheralKind, SignalRole};
pub use transfer::TransferMode;
