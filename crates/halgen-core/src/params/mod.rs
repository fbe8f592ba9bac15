//! Kind-specific operating parameters.

pub mod gpio;
pub mod i2c;
pub mod uart;

use serde::{Deserialize, Serialize};

use crate::signal::PeripheralKind;

/// Parameters of a declaration, tagged by peripheral kind.
///
/// In declaration files the tag is the `kind` key and the parameters sit next
/// to it in the same table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PeripheralParams {
    Uart(uart::UartParams),
    I2c(i2c::I2cParams),
    GpioLine(gpio::GpioLineParams),
}

impl PeripheralParams {
    pub fn kind(&self) -> PeripheralKind {
        match self {
            PeripheralParams::Uart(_) => PeripheralKind::Uart,
            PeripheralParams::I2c(_) => PeripheralKind::I2c,
            PeripheralParams::GpioLine(_) => PeripheralKind::GpioLine,
        }
    }
}
