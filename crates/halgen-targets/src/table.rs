//! The capability-table contract the resolver is written against.

use halgen_core::{InstanceId, PeripheralKind, PinRef, Port, SignalRole};

use crate::family::InstanceCapability;

/// Read-only lookups describing what one chip family can do.
///
/// Implementations are loaded once per generation run and never mutated.
pub trait CapabilityTable {
    /// Family name (e.g., "stm32g4").
    fn family(&self) -> &str;

    /// HAL umbrella header included by generated sources.
    fn hal_header(&self) -> &str;

    /// Alternate-function number routing `pin` to `role` of `instance`.
    fn lookup_af(&self, instance: &InstanceId, pin: PinRef, role: SignalRole) -> Option<u8>;

    /// Clock-enable token for a GPIO port (e.g., "GPIOA").
    fn clock_symbol_for_port(&self, port: Port) -> Option<&str>;

    /// Clock-enable token for a peripheral instance (e.g., "USART1").
    fn clock_symbol_for_instance(&self, instance: &InstanceId) -> Option<&str>;

    /// Whether the family has any entries at all for this kind.
    fn supports_kind(&self, kind: PeripheralKind) -> bool;

    /// Inventory entry for a peripheral instance.
    fn instance(&self, instance: &InstanceId) -> Option<&InstanceCapability>;

    /// Whether the pin is bonded out on this family.
    fn has_pin(&self, pin: PinRef) -> bool;

    /// Whether any signal is routed to `pin` through alternate function `af`.
    fn pin_accepts_af(&self, pin: PinRef, af: u8) -> bool;

    /// Timing-register preset for an I2C bus clock, as a C literal.
    fn i2c_timing(&self, clock_speed_hz: u32) -> Option<&str>;
}
