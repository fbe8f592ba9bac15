//! Physical pin references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Highest pin number on any GPIO port.
pub const MAX_PIN_NUMBER: u8 = 15;

/// A GPIO port letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
}

impl Port {
    /// All port letters in order.
    pub const ALL: [Port; 11] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
        Port::H,
        Port::I,
        Port::J,
        Port::K,
    ];

    /// Parse a port from its letter (case-insensitive).
    pub fn from_letter(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        Self::ALL.iter().copied().find(|p| p.letter() == upper)
    }

    /// The port letter.
    pub fn letter(&self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
            Port::F => 'F',
            Port::G => 'G',
            Port::H => 'H',
            Port::I => 'I',
            Port::J => 'J',
            Port::K => 'K',
        }
    }

    /// HAL peripheral name of the port (`GPIOA`).
    pub fn hal_name(&self) -> String {
        format!("GPIO{}", self.letter())
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Port {
    type Err = CoreError;

    /// Accepts `A`, `PA` and `GPIOA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let upper = s.to_ascii_uppercase();
        let letter = upper
            .strip_prefix("GPIO")
            .or_else(|| upper.strip_prefix('P').filter(|rest| rest.len() == 1))
            .unwrap_or(upper.as_str());
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Port::from_letter(c).ok_or_else(|| CoreError::InvalidValue {
                field: "port",
                value: s.to_string(),
            }),
            _ => Err(CoreError::InvalidValue {
                field: "port",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Port {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Port> for String {
    fn from(port: Port) -> Self {
        port.letter().to_string()
    }
}

/// A physical pin: port letter plus pin number `0..=15`.
///
/// Equality, hashing and ordering are by (port, number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PinRef {
    port: Port,
    number: u8,
}

impl PinRef {
    /// Create a pin reference, rejecting numbers above 15.
    pub fn new(port: Port, number: u8) -> Result<Self, CoreError> {
        if number > MAX_PIN_NUMBER {
            return Err(CoreError::PinOutOfRange {
                port: port.letter(),
                number,
            });
        }
        Ok(Self { port, number })
    }

    /// Create a pin reference from literal table data.
    ///
    /// # Panics
    ///
    /// Panics if `number` is above 15.
    pub const fn of(port: Port, number: u8) -> Self {
        assert!(number <= MAX_PIN_NUMBER, "pin number out of range");
        Self { port, number }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// HAL pin mask constant (`GPIO_PIN_9`).
    pub fn hal_pin(&self) -> String {
        format!("GPIO_PIN_{}", self.number)
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port, self.number)
    }
}

impl FromStr for PinRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || CoreError::InvalidPin {
            input: s.to_string(),
        };
        let rest = trimmed
            .strip_prefix('P')
            .or_else(|| trimmed.strip_prefix('p'))
            .ok_or_else(invalid)?;
        let mut chars = rest.chars();
        let port = chars.next().and_then(Port::from_letter).ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u8 = digits.parse().map_err(|_| invalid())?;
        PinRef::new(port, number)
    }
}

impl TryFrom<String> for PinRef {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PinRef> for String {
    fn from(pin: PinRef) -> Self {
        pin.to_string()
    }
}
