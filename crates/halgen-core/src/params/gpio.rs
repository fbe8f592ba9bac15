//! GPIO electrical attributes and GPIO-line parameters.

use serde::{Deserialize, Serialize};

/// Pin mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GpioMode {
    #[default]
    #[serde(alias = "INPUT")]
    Input,
    #[serde(alias = "OUTPUT_PP")]
    OutputPp,
    #[serde(alias = "OUTPUT_OD")]
    OutputOd,
    #[serde(alias = "AF_PP")]
    AfPp,
    #[serde(alias = "AF_OD")]
    AfOd,
    #[serde(alias = "ANALOG")]
    Analog,
}

impl GpioMode {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            GpioMode::Input => "GPIO_MODE_INPUT",
            GpioMode::OutputPp => "GPIO_MODE_OUTPUT_PP",
            GpioMode::OutputOd => "GPIO_MODE_OUTPUT_OD",
            GpioMode::AfPp => "GPIO_MODE_AF_PP",
            GpioMode::AfOd => "GPIO_MODE_AF_OD",
            GpioMode::Analog => "GPIO_MODE_ANALOG",
        }
    }

    /// Whether the pin is routed to a peripheral through an alternate function.
    pub fn is_alternate(&self) -> bool {
        matches!(self, GpioMode::AfPp | GpioMode::AfOd)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, GpioMode::OutputPp | GpioMode::OutputOd)
    }
}

/// Internal pull resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pull {
    #[default]
    #[serde(alias = "NOPULL")]
    None,
    #[serde(alias = "PULLUP")]
    Up,
    #[serde(alias = "PULLDOWN")]
    Down,
}

impl Pull {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            Pull::None => "GPIO_NOPULL",
            Pull::Up => "GPIO_PULLUP",
            Pull::Down => "GPIO_PULLDOWN",
        }
    }
}

/// Output slew-rate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Speed {
    #[default]
    #[serde(alias = "LOW")]
    Low,
    #[serde(alias = "MEDIUM")]
    Medium,
    #[serde(alias = "HIGH")]
    High,
    #[serde(alias = "VERY_HIGH")]
    VeryHigh,
}

impl Speed {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            Speed::Low => "GPIO_SPEED_FREQ_LOW",
            Speed::Medium => "GPIO_SPEED_FREQ_MEDIUM",
            Speed::High => "GPIO_SPEED_FREQ_HIGH",
            Speed::VeryHigh => "GPIO_SPEED_FREQ_VERY_HIGH",
        }
    }
}

/// Parameters of a plain GPIO line (LED, button, chip-select ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GpioLineParams {
    pub mode: GpioMode,
    pub pull: Pull,
    pub speed: Speed,
    /// Alternate-function number, required when `mode` is an AF mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub af: Option<u8>,
}
