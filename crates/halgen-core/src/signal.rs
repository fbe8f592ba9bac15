//! Signal roles and peripheral kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a peripheral declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeripheralKind {
    Uart,
    I2c,
    GpioLine,
}

impl PeripheralKind {
    /// Display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            PeripheralKind::Uart => "uart",
            PeripheralKind::I2c => "i2c",
            PeripheralKind::GpioLine => "gpio-line",
        }
    }

    /// Whether instances of this kind own a peripheral clock of their own.
    ///
    /// GPIO lines only need their port clock.
    pub fn has_instance_clock(&self) -> bool {
        !matches!(self, PeripheralKind::GpioLine)
    }

    /// The signal roles a declaration of this kind may claim.
    pub fn roles(&self) -> &'static [SignalRole] {
        match self {
            PeripheralKind::Uart => &[
                SignalRole::Tx,
                SignalRole::Rx,
                SignalRole::Rts,
                SignalRole::Cts,
                SignalRole::Ck,
            ],
            PeripheralKind::I2c => &[SignalRole::Scl, SignalRole::Sda, SignalRole::Smba],
            PeripheralKind::GpioLine => &[SignalRole::Line],
        }
    }
}

impl fmt::Display for PeripheralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The function a pin performs for the peripheral that claims it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalRole {
    Tx,
    Rx,
    Rts,
    Cts,
    Ck,
    Scl,
    Sda,
    Smba,
    Line,
}

impl SignalRole {
    /// Upper-case signal name as used in HAL pin comments (`TX`, `SCL`).
    pub fn name(&self) -> &'static str {
        match self {
            SignalRole::Tx => "TX",
            SignalRole::Rx => "RX",
            SignalRole::Rts => "RTS",
            SignalRole::Cts => "CTS",
            SignalRole::Ck => "CK",
            SignalRole::Scl => "SCL",
            SignalRole::Sda => "SDA",
            SignalRole::Smba => "SMBA",
            SignalRole::Line => "LINE",
        }
    }

    /// The peripheral kind this role belongs to.
    pub fn kind(&self) -> PeripheralKind {
        match self {
            SignalRole::Tx | SignalRole::Rx | SignalRole::Rts | SignalRole::Cts | SignalRole::Ck => {
                PeripheralKind::Uart
            }
            SignalRole::Scl | SignalRole::Sda | SignalRole::Smba => PeripheralKind::I2c,
            SignalRole::Line => PeripheralKind::GpioLine,
        }
    }
}

impl fmt::Display for SignalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
