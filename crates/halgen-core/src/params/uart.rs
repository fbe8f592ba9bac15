//! UART operating parameters.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Frame word length in bits (parity bit included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WordLength {
    Bits7,
    #[default]
    Bits8,
    Bits9,
}

impl WordLength {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            WordLength::Bits7 => "UART_WORDLENGTH_7B",
            WordLength::Bits8 => "UART_WORDLENGTH_8B",
            WordLength::Bits9 => "UART_WORDLENGTH_9B",
        }
    }
}

impl TryFrom<u8> for WordLength {
    type Error = CoreError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            7 => Ok(WordLength::Bits7),
            8 => Ok(WordLength::Bits8),
            9 => Ok(WordLength::Bits9),
            other => Err(CoreError::InvalidValue {
                field: "word-length",
                value: other.to_string(),
            }),
        }
    }
}

impl From<WordLength> for u8 {
    fn from(w: WordLength) -> Self {
        match w {
            WordLength::Bits7 => 7,
            WordLength::Bits8 => 8,
            WordLength::Bits9 => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Parity {
    #[default]
    #[serde(alias = "None", alias = "NONE")]
    None,
    #[serde(alias = "Even", alias = "EVEN")]
    Even,
    #[serde(alias = "Odd", alias = "ODD")]
    Odd,
}

impl Parity {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            Parity::None => "UART_PARITY_NONE",
            Parity::Even => "UART_PARITY_EVEN",
            Parity::Odd => "UART_PARITY_ODD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StopBits {
    #[default]
    One,
    Two,
}

impl StopBits {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            StopBits::One => "UART_STOPBITS_1",
            StopBits::Two => "UART_STOPBITS_2",
        }
    }
}

impl TryFrom<u8> for StopBits {
    type Error = CoreError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(StopBits::One),
            2 => Ok(StopBits::Two),
            other => Err(CoreError::InvalidValue {
                field: "stop-bits",
                value: other.to_string(),
            }),
        }
    }
}

impl From<StopBits> for u8 {
    fn from(s: StopBits) -> Self {
        match s {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

/// Hardware flow control lines in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowControl {
    #[default]
    None,
    Rts,
    Cts,
    #[serde(alias = "RTS/CTS")]
    RtsCts,
}

impl FlowControl {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            FlowControl::None => "UART_HWCONTROL_NONE",
            FlowControl::Rts => "UART_HWCONTROL_RTS",
            FlowControl::Cts => "UART_HWCONTROL_CTS",
            FlowControl::RtsCts => "UART_HWCONTROL_RTS_CTS",
        }
    }
}

/// Enabled directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UartDirection {
    #[default]
    TxRx,
    Tx,
    Rx,
}

impl UartDirection {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            UartDirection::TxRx => "UART_MODE_TX_RX",
            UartDirection::Tx => "UART_MODE_TX",
            UartDirection::Rx => "UART_MODE_RX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Oversampling {
    #[default]
    By16,
    By8,
}

impl Oversampling {
    pub fn hal_constant(&self) -> &'static str {
        match self {
            Oversampling::By16 => "UART_OVERSAMPLING_16",
            Oversampling::By8 => "UART_OVERSAMPLING_8",
        }
    }
}

impl TryFrom<u8> for Oversampling {
    type Error = CoreError;

    fn try_from(factor: u8) -> Result<Self, Self::Error> {
        match factor {
            16 => Ok(Oversampling::By16),
            8 => Ok(Oversampling::By8),
            other => Err(CoreError::InvalidValue {
                field: "oversampling",
                value: other.to_string(),
            }),
        }
    }
}

impl From<Oversampling> for u8 {
    fn from(o: Oversampling) -> Self {
        match o {
            Oversampling::By16 => 16,
            Oversampling::By8 => 8,
        }
    }
}

/// UART/USART operating parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct UartParams {
    /// Baud rate in bits per second.
    pub baud_rate: u32,
    pub word_length: WordLength,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// Hardware flow control.
    pub flow_control: FlowControl,
    /// Enabled directions (HAL `Init.Mode`).
    pub direction: UartDirection,
    pub oversampling: Oversampling,
}

impl Default for UartParams {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            word_length: WordLength::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            flow_control: FlowControl::default(),
            direction: UartDirection::default(),
            oversampling: Oversampling::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_common_serial_settings() {
        let p = UartParams::default();
        assert_eq!(p.baud_rate, 115_200);
        assert_eq!(p.word_length.hal_constant(), "UART_WORDLENGTH_8B");
        assert_eq!(p.parity.hal_constant(), "UART_PARITY_NONE");
        assert_eq!(p.stop_bits.hal_constant(), "UART_STOPBITS_1");
        assert_eq!(p.flow_control.hal_constant(), "UART_HWCONTROL_NONE");
        assert_eq!(p.direction.hal_constant(), "UART_MODE_TX_RX");
        assert_eq!(p.oversampling.hal_constant(), "UART_OVERSAMPLING_16");
    }

    #[test]
    fn parse_partial_toml() {
        let p: UartParams = toml::from_str(
            r#"
baud-rate = 9600
parity = "even"
flow-control = "rts-cts"
stop-bits = 2
"#,
        )
        .unwrap();
        assert_eq!(p.baud_rate, 9600);
        assert_eq!(p.parity, Parity::Even);
        assert_eq!(p.flow_control, FlowControl::RtsCts);
        assert_eq!(p.stop_bits, StopBits::Two);
        assert_eq!(p.word_length, WordLength::Bits8);
    }

    #[test]
    fn reject_unsupported_word_length() {
        let result: Result<UartParams, _> = toml::from_str("word-length = 6");
        assert!(result.is_err());
    }
}
