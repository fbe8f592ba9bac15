//! Kind-specific parameter validation.

use std::collections::{HashMap, HashSet};

use halgen_core::{I2cParams, InstanceId, PeripheralDeclaration, PeripheralParams, UartParams};
use halgen_targets::CapabilityTable;

use crate::error::ResolutionError;
use crate::model::ResolvedParams;

const MAX_DEVICE_ADDRESS: u16 = 0x7F;
const MAX_OA2_MASK: u8 = 7;
const MAX_DIGITAL_FILTER: u8 = 15;

/// Validate parameters and attach table-derived values (I2C timing presets).
pub(crate) fn check(
    declarations: &[PeripheralDeclaration],
    table: &dyn CapabilityTable,
    errors: &mut Vec<ResolutionError>,
) -> Vec<ResolvedParams> {
    let mut resolved = Vec::with_capacity(declarations.len());
    let mut labels: HashMap<&str, &InstanceId> = HashMap::new();
    for decl in declarations {
        let mut issues = Issues {
            instance: &decl.instance,
            errors: Vec::new(),
        };
        let params = match &decl.params {
            PeripheralParams::Uart(p) => {
                check_uart(p, &mut issues);
                Some(ResolvedParams::Uart(p.clone()))
            }
            PeripheralParams::I2c(p) => {
                check_i2c(p, &mut issues);
                match table.i2c_timing(p.clock_speed_hz) {
                    Some(timing) => Some(ResolvedParams::I2c {
                        params: p.clone(),
                        timing: timing.to_string(),
                    }),
                    None => {
                        // Only meaningful when the family has I2C at all.
                        if table.supports_kind(decl.kind()) {
                            issues.push(
                                "clock-speed-hz",
                                format!(
                                    "no timing preset for {} Hz on family {}",
                                    p.clock_speed_hz,
                                    table.family()
                                ),
                            );
                        }
                        None
                    }
                }
            }
            PeripheralParams::GpioLine(p) => {
                if p.mode.is_alternate() && decl.pins.is_empty() {
                    issues.push("pins", "alternate-function mode needs at least one pin".into());
                }
                Some(ResolvedParams::GpioLine(*p))
            }
        };
        check_labels(decl, &mut labels, &mut issues);
        let clean = issues.errors.is_empty();
        errors.append(&mut issues.errors);
        if let (true, Some(params)) = (clean, params) {
            resolved.push(params);
        }
    }
    resolved
}

struct Issues<'a> {
    instance: &'a InstanceId,
    errors: Vec<ResolutionError>,
}

impl Issues<'_> {
    fn push(&mut self, parameter: &str, reason: String) {
        self.errors.push(ResolutionError::InvalidParameter {
            instance: self.instance.clone(),
            parameter: parameter.to_string(),
            reason,
        });
    }
}

/// Pin labels become `<label>_Pin` defines, so each must be a C identifier
/// and unique across the whole declaration set.
fn check_labels<'a>(
    decl: &'a PeripheralDeclaration,
    seen: &mut HashMap<&'a str, &'a InstanceId>,
    issues: &mut Issues<'_>,
) {
    for label in decl.pins.iter().filter_map(|p| p.label.as_deref()) {
        if !is_c_identifier(label) {
            issues.push("label", format!("'{label}' is not a valid C identifier"));
        } else if let Some(owner) = seen.get(label) {
            issues.push("label", format!("'{label}' is already used by {owner}"));
        } else {
            seen.insert(label, &decl.instance);
        }
    }
}

fn check_uart(p: &UartParams, issues: &mut Issues<'_>) {
    if p.baud_rate == 0 {
        issues.push("baud-rate", "must be greater than zero".into());
    }
}

fn check_i2c(p: &I2cParams, issues: &mut Issues<'_>) {
    let max = p.addressing_mode.max_address();
    if p.own_address1 > max {
        issues.push(
            "own-address1",
            format!("0x{:X} exceeds 0x{max:X} for {}-bit addressing", p.own_address1, bits(max)),
        );
    }
    if p.dual_address && u16::from(p.own_address2) > MAX_DEVICE_ADDRESS {
        issues.push(
            "own-address2",
            format!("0x{:X} is not a 7-bit address", p.own_address2),
        );
    }
    if p.own_address2_mask > MAX_OA2_MASK {
        issues.push(
            "own-address2-mask",
            format!("{} exceeds {MAX_OA2_MASK}", p.own_address2_mask),
        );
    }
    if p.digital_filter > MAX_DIGITAL_FILTER {
        issues.push(
            "digital-filter",
            format!("{} exceeds {MAX_DIGITAL_FILTER}", p.digital_filter),
        );
    }

    let mut names = HashSet::new();
    for device in &p.devices {
        if !is_c_identifier(&device.name) {
            issues.push(
                "devices",
                format!("'{}' is not a valid C identifier", device.name),
            );
        } else if !names.insert(device.name.as_str()) {
            issues.push("devices", format!("'{}' is listed more than once", device.name));
        }
        if device.address > MAX_DEVICE_ADDRESS {
            issues.push(
                "devices",
                format!("'{}' address 0x{:X} is not a 7-bit address", device.name, device.address),
            );
        }
    }
}

fn bits(max: u16) -> u32 {
    u16::BITS - max.leading_zeros()
}

fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use halgen_core::{
        AddressingMode, GpioLineParams, GpioMode, I2cDevice, PinAssignment, PinRef, Port,
        SignalRole,
    };
    use halgen_targets::ChipFamily;

    fn run(decl: PeripheralDeclaration) -> (Vec<ResolvedParams>, Vec<ResolutionError>) {
        let mut errors = Vec::new();
        let out = check(&[decl], &ChipFamily::stm32g4(), &mut errors);
        (out, errors)
    }

    fn parameters(errors: &[ResolutionError]) -> Vec<&str> {
        errors
            .iter()
            .filter_map(|e| match e {
                ResolutionError::InvalidParameter { parameter, .. } => Some(parameter.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn i2c_timing_attached() {
        let p = I2cParams {
            clock_speed_hz: 400_000,
            ..Default::default()
        };
        let (out, errors) = run(PeripheralDeclaration::i2c("I2C1", "POLLING", p));
        assert!(errors.is_empty());
        assert!(matches!(&out[0], ResolvedParams::I2c { timing, .. } if timing == "0x10B0B0EB"));
    }

    #[test]
    fn i2c_unsupported_speed() {
        let p = I2cParams {
            clock_speed_hz: 250_000,
            ..Default::default()
        };
        let (out, errors) = run(PeripheralDeclaration::i2c("I2C1", "POLLING", p));
        assert!(out.is_empty());
        assert_eq!(parameters(&errors), ["clock-speed-hz"]);
    }

    #[test]
    fn i2c_ranges() {
        let p = I2cParams {
            addressing_mode: AddressingMode::SevenBit,
            own_address1: 0x80,
            own_address2_mask: 8,
            digital_filter: 16,
            ..Default::default()
        };
        let (_, errors) = run(PeripheralDeclaration::i2c("I2C1", "POLLING", p));
        assert_eq!(
            parameters(&errors),
            ["own-address1", "own-address2-mask", "digital-filter"]
        );
        assert!(errors[0].to_string().contains("7-bit"));
    }

    #[test]
    fn ten_bit_own_address_allowed() {
        let p = I2cParams {
            addressing_mode: AddressingMode::TenBit,
            own_address1: 0x3FF,
            ..Default::default()
        };
        let (_, errors) = run(PeripheralDeclaration::i2c("I2C1", "POLLING", p));
        assert!(errors.is_empty());
    }

    #[test]
    fn device_checks() {
        let device = |name: &str, address| I2cDevice {
            name: name.into(),
            address,
        };
        let p = I2cParams {
            devices: vec![
                device("MPU6050_ADDR", 0x68),
                device("MPU6050_ADDR", 0x69),
                device("2BAD", 0x10),
                device("EEPROM", 0x150),
            ],
            ..Default::default()
        };
        let (_, errors) = run(PeripheralDeclaration::i2c("I2C1", "POLLING", p));
        assert_eq!(errors.len(), 3);
        assert!(errors[0].to_string().contains("more than once"));
        assert!(errors[1].to_string().contains("C identifier"));
        assert!(errors[2].to_string().contains("0x150"));
    }

    #[test]
    fn zero_baud_rate() {
        let p = UartParams {
            baud_rate: 0,
            ..Default::default()
        };
        let (_, errors) = run(PeripheralDeclaration::uart("UART1", "POLLING", p));
        assert_eq!(parameters(&errors), ["baud-rate"]);
    }

    #[test]
    fn gpio_af_mode_without_pins() {
        let p = GpioLineParams {
            mode: GpioMode::AfOd,
            af: Some(4),
            ..Default::default()
        };
        let (_, errors) = run(PeripheralDeclaration::gpio_line("SPARE", p));
        assert_eq!(parameters(&errors), ["pins"]);
    }

    #[test]
    fn labels_must_be_identifiers() {
        let line = |id: &str, pin: u8, label: &str| {
            PeripheralDeclaration::gpio_line(id, GpioLineParams::default()).with_assignment(
                PinAssignment::new(PinRef::of(Port::A, pin), SignalRole::Line).with_label(label),
            )
        };
        let decls = [line("LED1", 5, "LED"), line("LED2", 6, "1-bad label")];
        let mut errors = Vec::new();
        let out = check(&decls, &ChipFamily::stm32g4(), &mut errors);
        assert_eq!(out.len(), 1);
        assert_eq!(parameters(&errors), ["label"]);
        assert_eq!(errors[0].instance().as_str(), "LED2");
        assert!(errors[0].to_string().contains("not a valid C identifier"));
    }

    #[test]
    fn labels_unique_across_declarations() {
        let decls = [
            PeripheralDeclaration::gpio_line("LED1", GpioLineParams::default()).with_assignment(
                PinAssignment::new(PinRef::of(Port::A, 5), SignalRole::Line).with_label("LED"),
            ),
            PeripheralDeclaration::uart("UART1", "POLLING", UartParams::default()).with_assignment(
                PinAssignment::new(PinRef::of(Port::A, 9), SignalRole::Tx).with_label("LED"),
            ),
        ];
        let mut errors = Vec::new();
        check(&decls, &ChipFamily::stm32g4(), &mut errors);
        assert_eq!(parameters(&errors), ["label"]);
        assert!(errors[0].to_string().contains("'LED' is already used by LED1"));
    }

    #[test]
    fn identifiers() {
        assert!(is_c_identifier("_x1"));
        assert!(is_c_identifier("BME280"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("a-b"));
    }
}
