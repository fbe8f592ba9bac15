//! Built-in chip families.

use halgen_core::{PeripheralKind, PinRef, Port, SignalRole};

use crate::family::{ChipFamily, I2cTiming, InstanceCapability, PortCapability, SignalCapability};

fn ports(letters: &[Port]) -> Vec<PortCapability> {
    letters
        .iter()
        .map(|&port| PortCapability {
            port,
            clock: port.hal_name(),
        })
        .collect()
}

fn uart(id: &str, hal_name: &str) -> InstanceCapability {
    InstanceCapability {
        id: id.into(),
        kind: PeripheralKind::Uart,
        hal_name: hal_name.into(),
        clock: hal_name.into(),
        irqs: vec![format!("{hal_name}_IRQn")],
    }
}

fn i2c(id: &str) -> InstanceCapability {
    InstanceCapability {
        id: id.into(),
        kind: PeripheralKind::I2c,
        hal_name: id.into(),
        clock: id.into(),
        irqs: vec![format!("{id}_EV_IRQn"), format!("{id}_ER_IRQn")],
    }
}

fn signal(instance: &str, port: Port, number: u8, role: SignalRole, af: u8) -> SignalCapability {
    SignalCapability {
        instance: instance.into(),
        pin: PinRef::of(port, number),
        role,
        af,
    }
}

fn timing(clock_speed_hz: u32, register: &str) -> I2cTiming {
    I2cTiming {
        clock_speed_hz,
        register: register.into(),
    }
}

impl ChipFamily {
    /// STM32G4 series (G431/G474 pinout), HAL timing presets for a 170 MHz I2CCLK.
    pub fn stm32g4() -> Self {
        use Port::*;
        use SignalRole::*;

        Self {
            name: "stm32g4".into(),
            description: "STM32G4 series (ARM Cortex-M4F, 170 MHz)".into(),
            hal_header: "stm32g4xx_hal.h".into(),
            pins_per_port: 16,
            ports: ports(&[A, B, C, D, E, F, G]),
            instances: vec![
                uart("UART1", "USART1"),
                uart("UART2", "USART2"),
                uart("UART3", "USART3"),
                uart("UART4", "UART4"),
                uart("LPUART1", "LPUART1"),
                i2c("I2C1"),
                i2c("I2C2"),
                i2c("I2C3"),
            ],
            signals: vec![
                signal("UART1", A, 9, Tx, 7),
                signal("UART1", A, 10, Rx, 7),
                signal("UART1", B, 6, Tx, 7),
                signal("UART1", B, 7, Rx, 7),
                signal("UART1", C, 4, Tx, 7),
                signal("UART1", C, 5, Rx, 7),
                signal("UART1", A, 11, Cts, 7),
                signal("UART1", A, 12, Rts, 7),
                signal("UART1", A, 8, Ck, 7),
                signal("UART2", A, 2, Tx, 7),
                signal("UART2", A, 3, Rx, 7),
                signal("UART2", B, 3, Tx, 7),
                signal("UART2", B, 4, Rx, 7),
                signal("UART2", A, 14, Tx, 7),
                signal("UART2", A, 15, Rx, 7),
                signal("UART2", A, 0, Cts, 7),
                signal("UART2", A, 1, Rts, 7),
                signal("UART3", B, 10, Tx, 7),
                signal("UART3", B, 11, Rx, 7),
                signal("UART3", C, 10, Tx, 7),
                signal("UART3", C, 11, Rx, 7),
                signal("UART3", B, 9, Tx, 7),
                signal("UART3", B, 8, Rx, 7),
                signal("UART4", C, 10, Tx, 5),
                signal("UART4", C, 11, Rx, 5),
                signal("LPUART1", A, 2, Tx, 12),
                signal("LPUART1", A, 3, Rx, 12),
                signal("LPUART1", B, 10, Tx, 8),
                signal("LPUART1", B, 11, Rx, 8),
                signal("LPUART1", C, 1, Tx, 8),
                signal("LPUART1", C, 0, Rx, 8),
                signal("I2C1", A, 13, Scl, 4),
                signal("I2C1", A, 14, Sda, 4),
                signal("I2C1", A, 15, Scl, 4),
                signal("I2C1", B, 7, Sda, 4),
                signal("I2C1", B, 8, Scl, 4),
                signal("I2C1", B, 9, Sda, 4),
                signal("I2C2", A, 9, Scl, 4),
                signal("I2C2", A, 8, Sda, 4),
                signal("I2C2", C, 4, Scl, 4),
                signal("I2C2", F, 0, Sda, 4),
                signal("I2C3", A, 8, Scl, 2),
                signal("I2C3", C, 9, Sda, 8),
                signal("I2C3", C, 8, Scl, 8),
                signal("I2C3", B, 5, Sda, 8),
                signal("I2C3", C, 11, Sda, 8),
            ],
            i2c_timings: vec![
                timing(100_000, "0x30909DEC"),
                timing(400_000, "0x10B0B0EB"),
                timing(1_000_000, "0x00D0268A"),
            ],
        }
    }

    /// STM32L4 series (L476 pinout), HAL timing presets for an 80 MHz I2CCLK.
    pub fn stm32l4() -> Self {
        use Port::*;
        use SignalRole::*;

        Self {
            name: "stm32l4".into(),
            description: "STM32L4 series (ARM Cortex-M4F, 80 MHz)".into(),
            hal_header: "stm32l4xx_hal.h".into(),
            pins_per_port: 16,
            ports: ports(&[A, B, C, D, E, F, G, H]),
            instances: vec![
                uart("UART1", "USART1"),
                uart("UART2", "USART2"),
                uart("UART3", "USART3"),
                uart("UART4", "UART4"),
                i2c("I2C1"),
                i2c("I2C2"),
                i2c("I2C3"),
            ],
            signals: vec![
                signal("UART1", A, 9, Tx, 7),
                signal("UART1", A, 10, Rx, 7),
                signal("UART1", B, 6, Tx, 7),
                signal("UART1", B, 7, Rx, 7),
                signal("UART2", A, 2, Tx, 7),
                signal("UART2", A, 3, Rx, 7),
                signal("UART2", D, 5, Tx, 7),
                signal("UART2", D, 6, Rx, 7),
                signal("UART3", B, 10, Tx, 7),
                signal("UART3", B, 11, Rx, 7),
                signal("UART3", C, 4, Tx, 7),
                signal("UART3", C, 5, Rx, 7),
                signal("UART3", C, 10, Tx, 7),
                signal("UART3", C, 11, Rx, 7),
                signal("UART4", A, 0, Tx, 8),
                signal("UART4", A, 1, Rx, 8),
                signal("UART4", C, 10, Tx, 8),
                signal("UART4", C, 11, Rx, 8),
                signal("I2C1", B, 6, Scl, 4),
                signal("I2C1", B, 7, Sda, 4),
                signal("I2C1", B, 8, Scl, 4),
                signal("I2C1", B, 9, Sda, 4),
                signal("I2C2", B, 10, Scl, 4),
                signal("I2C2", B, 11, Sda, 4),
                signal("I2C2", B, 13, Scl, 4),
                signal("I2C2", B, 14, Sda, 4),
                signal("I2C3", C, 0, Scl, 4),
                signal("I2C3", C, 1, Sda, 4),
            ],
            i2c_timings: vec![
                timing(100_000, "0x10909CEC"),
                timing(400_000, "0x00702991"),
                timing(1_000_000, "0x00300F38"),
            ],
        }
    }
}

/// Resolve a built-in family by name.
pub fn resolve_family(name: &str) -> Option<ChipFamily> {
    match name {
        "stm32g4" => Some(ChipFamily::stm32g4()),
        "stm32l4" => Some(ChipFamily::stm32l4()),
        _ => None,
    }
}

/// List all built-in family names with a short description.
pub fn builtin_families() -> Vec<(&'static str, &'static str)> {
    vec![
        ("stm32g4", "STM32G4 series (ARM Cortex-M4F, 170 MHz)"),
        ("stm32l4", "STM32L4 series (ARM Cortex-M4F, 80 MHz)"),
    ]
}
