//! I2C operating parameters.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Own-address width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AddressingMode {
    #[default]
    SevenBit,
    TenBit,
}

impl AddressingMode {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            AddressingMode::SevenBit => "I2C_ADDRESSINGMODE_7BIT",
            AddressingMode::TenBit => "I2C_ADDRESSINGMODE_10BIT",
        }
    }

    /// Largest own address representable in this mode.
    pub fn max_address(&self) -> u16 {
        match self {
            AddressingMode::SevenBit => 0x7F,
            AddressingMode::TenBit => 0x3FF,
        }
    }
}

impl TryFrom<u8> for AddressingMode {
    type Error = CoreError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            7 => Ok(AddressingMode::SevenBit),
            10 => Ok(AddressingMode::TenBit),
            other => Err(CoreError::InvalidValue {
                field: "addressing-mode",
                value: other.to_string(),
            }),
        }
    }
}

impl From<AddressingMode> for u8 {
    fn from(mode: AddressingMode) -> Self {
        match mode {
            AddressingMode::SevenBit => 7,
            AddressingMode::TenBit => 10,
        }
    }
}

/// A slave device on the bus, emitted as an address `#define`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct I2cDevice {
    pub name: String,
    /// 7-bit device address (unshifted).
    pub address: u16,
}

/// I2C operating parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct I2cParams {
    /// Bus clock in Hz; selects a timing-register preset from the chip family.
    pub clock_speed_hz: u32,
    pub addressing_mode: AddressingMode,
    /// Primary own address (unshifted).
    pub own_address1: u16,
    pub dual_address: bool,
    /// Secondary own address (7-bit, unshifted); used only with `dual-address`.
    pub own_address2: u8,
    /// Number of low bits of own address 2 that are masked (0-7).
    pub own_address2_mask: u8,
    pub general_call: bool,
    pub no_stretch: bool,
    pub analog_filter: bool,
    /// Digital noise filter length in I2C clock periods (0-15).
    pub digital_filter: u8,
    pub devices: Vec<I2cDevice>,
}

impl Default for I2cParams {
    fn default() -> Self {
        Self {
            clock_speed_hz: 100_000,
            addressing_mode: AddressingMode::default(),
            own_address1: 0,
            dual_address: false,
            own_address2: 0,
            own_address2_mask: 0,
            general_call: false,
            no_stretch: false,
            analog_filter: true,
            digital_filter: 0,
            devices: Vec::new(),
        }
    }
}

impl I2cParams {
    /// `OwnAddress1` as the HAL expects it: 7-bit addresses are left-shifted by one.
    pub fn hal_own_address1(&self) -> u32 {
        match self.addressing_mode {
            AddressingMode::SevenBit => u32::from(self.own_address1) << 1,
            AddressingMode::TenBit => u32::from(self.own_address1),
        }
    }

    /// `OwnAddress2` as the HAL expects it (left-shifted by one).
    pub fn hal_own_address2(&self) -> u32 {
        if self.dual_address {
            u32::from(self.own_address2) << 1
        } else {
            0
        }
    }

    pub fn dual_address_constant(&self) -> &'static str {
        if self.dual_address {
            "I2C_DUALADDRESS_ENABLE"
        } else {
            "I2C_DUALADDRESS_DISABLE"
        }
    }

    /// `OwnAddress2Masks` constant (`I2C_OA2_NOMASK`, `I2C_OA2_MASK01` ...).
    pub fn own_address2_mask_constant(&self) -> String {
        match self.own_address2_mask {
            0 => "I2C_OA2_NOMASK".to_string(),
            n => format!("I2C_OA2_MASK{n:02}"),
        }
    }

    pub fn general_call_constant(&self) -> &'static str {
        if self.general_call {
            "I2C_GENERALCALL_ENABLE"
        } else {
            "I2C_GENERALCALL_DISABLE"
        }
    }

    pub fn no_stretch_constant(&self) -> &'static str {
        if self.no_stretch {
            "I2C_NOSTRETCH_ENABLE"
        } else {
            "I2C_NOSTRETCH_DISABLE"
        }
    }

    pub fn analog_filter_constant(&self) -> &'static str {
        if self.analog_filter {
            "I2C_ANALOGFILTER_ENABLE"
        } else {
            "I2C_ANALOGFILTER_DISABLE"
        }
    }
}
