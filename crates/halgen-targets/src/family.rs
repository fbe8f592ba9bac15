//! Data-driven chip family description.

use serde::{Deserialize, Serialize};

use halgen_core::{InstanceId, PeripheralKind, PinRef, Port, SignalRole};

use crate::table::CapabilityTable;

/// A GPIO port and its clock-enable token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PortCapability {
    pub port: Port,
    /// Clock token, expanded by emitters to `__HAL_RCC_<clock>_CLK_ENABLE()`.
    pub clock: String,
}

/// A peripheral instance present on the chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstanceCapability {
    /// Identifier used in declarations (e.g., "UART1").
    pub id: InstanceId,
    pub kind: PeripheralKind,
    /// HAL instance macro (e.g., "USART1").
    pub hal_name: String,
    /// Clock token (e.g., "USART1").
    pub clock: String,
    /// Interrupt lines enabled for interrupt-driven transfers.
    #[serde(default)]
    pub irqs: Vec<String>,
}

/// One legal (instance, pin, role) routing and its alternate-function number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SignalCapability {
    pub instance: InstanceId,
    pub pin: PinRef,
    pub role: SignalRole,
    pub af: u8,
}

/// Precomputed I2C timing-register value for a bus clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct I2cTiming {
    pub clock_speed_hz: u32,
    /// C literal, e.g. "0x30909DEC".
    pub register: String,
}

/// Complete capability data for one chip family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChipFamily {
    /// Family name (e.g., "stm32g4").
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// HAL umbrella header (e.g., "stm32g4xx_hal.h").
    pub hal_header: String,
    /// Number of pins on each port (at most 16).
    #[serde(default = "default_pins_per_port")]
    pub pins_per_port: u8,
    pub ports: Vec<PortCapability>,
    #[serde(default)]
    pub instances: Vec<InstanceCapability>,
    #[serde(default)]
    pub signals: Vec<SignalCapability>,
    #[serde(default)]
    pub i2c_timings: Vec<I2cTiming>,
}

fn default_pins_per_port() -> u8 {
    16
}

impl ChipFamily {
    /// Look up a port entry.
    pub fn port(&self, port: Port) -> Option<&PortCapability> {
        self.ports.iter().find(|p| p.port == port)
    }

    /// All instances of one kind, in table order.
    pub fn instances_of(&self, kind: PeripheralKind) -> impl Iterator<Item = &InstanceCapability> {
        self.instances.iter().filter(move |i| i.kind == kind)
    }

    /// All signals routable for an instance, in table order.
    pub fn signals_for<'a>(
        &'a self,
        instance: &'a InstanceId,
    ) -> impl Iterator<Item = &'a SignalCapability> + 'a {
        self.signals.iter().filter(move |s| &s.instance == instance)
    }
}

impl CapabilityTable for ChipFamily {
    fn family(&self) -> &str {
        &self.name
    }

    fn hal_header(&self) -> &str {
        &self.hal_header
    }

    fn lookup_af(&self, instance: &InstanceId, pin: PinRef, role: SignalRole) -> Option<u8> {
        self.signals
            .iter()
            .find(|s| &s.instance == instance && s.pin == pin && s.role == role)
            .map(|s| s.af)
    }

    fn clock_symbol_for_port(&self, port: Port) -> Option<&str> {
        self.port(port).map(|p| p.clock.as_str())
    }

    fn clock_symbol_for_instance(&self, instance: &InstanceId) -> Option<&str> {
        self.instance(instance).map(|i| i.clock.as_str())
    }

    fn supports_kind(&self, kind: PeripheralKind) -> bool {
        match kind {
            PeripheralKind::GpioLine => !self.ports.is_empty(),
            other => self.instances.iter().any(|i| i.kind == other),
        }
    }

    fn instance(&self, instance: &InstanceId) -> Option<&InstanceCapability> {
        self.instances.iter().find(|i| &i.id == instance)
    }

    fn has_pin(&self, pin: PinRef) -> bool {
        self.port(pin.port()).is_some() && pin.number() < self.pins_per_port
    }

    fn pin_accepts_af(&self, pin: PinRef, af: u8) -> bool {
        self.signals.iter().any(|s| s.pin == pin && s.af == af)
    }

    fn i2c_timing(&self, clock_speed_hz: u32) -> Option<&str> {
        self.i2c_timings
            .iter()
            .find(|t| t.clock_speed_hz == clock_speed_hz)
            .map(|t| t.register.as_str())
    }
}
