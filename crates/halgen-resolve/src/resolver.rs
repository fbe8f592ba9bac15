//! The resolution entry point and model assembly.

use tracing::{debug, instrument};

use halgen_core::{GpioMode, PeripheralDeclaration, PeripheralParams, Pull, Speed, TransferMode};
use halgen_targets::CapabilityTable;

use crate::error::ResolutionError;
use crate::model::{ResolvedDeclaration, ResolvedModel, ResolvedParams, ResolvedPin};
use crate::passes::capability::{self, Routing};
use crate::passes::{clocks, mode, ownership, params};
use crate::report::DiagnosticReport;

/// Resolve declarations against a capability table.
///
/// On failure the error list is complete and ordered by pass, then by
/// declaration order within a pass. No partial model is ever returned.
#[instrument(skip_all, name = "resolve", fields(family = table.family()))]
pub fn resolve(
    declarations: &[PeripheralDeclaration],
    table: &dyn CapabilityTable,
) -> Result<ResolvedModel, Vec<ResolutionError>> {
    let mut errors = ownership::duplicate_instances(declarations);
    errors.extend(ownership::pin_conflicts(declarations));
    debug!(declarations = declarations.len(), errors = errors.len(), "ownership checked");

    let routings = capability::check(declarations, table, &mut errors);
    debug!(errors = errors.len(), "capabilities checked");

    let clocks = clocks::collect(declarations, table);
    debug!(clocks = clocks.len(), "clocks collected");

    let modes = mode::check(declarations, &mut errors);
    let params = params::check(declarations, table, &mut errors);
    debug!(errors = errors.len(), "modes and parameters checked");

    if !errors.is_empty() {
        return Err(errors);
    }

    let resolved = declarations
        .iter()
        .zip(routings)
        .zip(modes)
        .zip(params)
        .map(|(((decl, routing), mode), params)| assemble(decl, routing, mode, params))
        .collect();

    Ok(ResolvedModel::new(
        table.family().to_string(),
        table.hal_header().to_string(),
        clocks,
        resolved,
    ))
}

fn assemble(
    decl: &PeripheralDeclaration,
    routing: Routing,
    transfer_mode: TransferMode,
    params: ResolvedParams,
) -> ResolvedDeclaration {
    let pins = decl
        .pins
        .iter()
        .map(|assignment| {
            let (mode, pull, speed) = match &decl.params {
                PeripheralParams::Uart(_) => (GpioMode::AfPp, Pull::None, Speed::VeryHigh),
                PeripheralParams::I2c(_) => (GpioMode::AfOd, Pull::Up, Speed::VeryHigh),
                PeripheralParams::GpioLine(p) => (p.mode, p.pull, p.speed),
            };
            let af = routing
                .bindings
                .iter()
                .find(|b| b.pin == assignment.pin && b.role == assignment.role)
                .map(|b| b.af);
            ResolvedPin {
                pin: assignment.pin,
                role: assignment.role,
                mode,
                pull: assignment.pull.unwrap_or(pull),
                speed: assignment.speed.unwrap_or(speed),
                af,
                label: assignment.label.clone(),
            }
        })
        .collect();

    ResolvedDeclaration {
        instance: decl.instance.clone(),
        kind: decl.kind(),
        hal_instance: routing.hal_instance,
        irqs: routing.irqs,
        transfer_mode,
        pins,
        bindings: routing.bindings,
        params,
    }
}

/// Resolve and wrap any failure in a [`DiagnosticReport`].
pub fn resolve_or_report(
    declarations: &[PeripheralDeclaration],
    table: &dyn CapabilityTable,
) -> Result<ResolvedModel, DiagnosticReport> {
    resolve(declarations, table).map_err(|errors| DiagnosticReport::new(table.family(), errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use halgen_core::{
        GpioLineParams, I2cParams, InstanceId, PeripheralKind, PinAssignment, PinRef, Port,
        SignalRole, UartParams,
    };
    use halgen_targets::{ChipFamily, InstanceCapability, PortCapability, SignalCapability};

    use crate::model::ClockDomain;

    /// A small family where I2C1 and I2C2 can both reach PB6.
    fn bench() -> ChipFamily {
        let port = |port: Port| PortCapability {
            port,
            clock: port.hal_name(),
        };
        let instance = |id: &str, kind, hal: &str| InstanceCapability {
            id: id.into(),
            kind,
            hal_name: hal.into(),
            clock: hal.into(),
            irqs: vec![format!("{hal}_IRQn")],
        };
        let signal = |instance: &str, port, number, role, af| SignalCapability {
            instance: instance.into(),
            pin: PinRef::of(port, number),
            role,
            af,
        };
        ChipFamily {
            name: "bench".into(),
            description: String::new(),
            hal_header: "bench_hal.h".into(),
            pins_per_port: 16,
            ports: vec![port(Port::A), port(Port::B)],
            instances: vec![
                instance("UART1", PeripheralKind::Uart, "USART1"),
                instance("UART2", PeripheralKind::Uart, "USART2"),
                instance("I2C1", PeripheralKind::I2c, "I2C1"),
                instance("I2C2", PeripheralKind::I2c, "I2C2"),
            ],
            signals: vec![
                signal("UART1", Port::A, 9, SignalRole::Tx, 7),
                signal("UART1", Port::A, 10, SignalRole::Rx, 7),
                signal("UART2", Port::A, 2, SignalRole::Tx, 7),
                signal("UART2", Port::A, 3, SignalRole::Rx, 7),
                signal("I2C1", Port::B, 6, SignalRole::Scl, 4),
                signal("I2C1", Port::B, 7, SignalRole::Sda, 4),
                signal("I2C2", Port::B, 6, SignalRole::Scl, 6),
                signal("I2C2", Port::B, 11, SignalRole::Sda, 4),
            ],
            i2c_timings: vec![halgen_targets::I2cTiming {
                clock_speed_hz: 100_000,
                register: "0x30909DEC".into(),
            }],
        }
    }

    fn uart1() -> PeripheralDeclaration {
        PeripheralDeclaration::uart("UART1", "POLLING", UartParams::default())
            .with_pin(PinRef::of(Port::A, 9), SignalRole::Tx)
            .with_pin(PinRef::of(Port::A, 10), SignalRole::Rx)
    }

    fn i2c(instance: &str, scl: PinRef, sda: PinRef) -> PeripheralDeclaration {
        PeripheralDeclaration::i2c(instance, "POLLING", I2cParams::default())
            .with_pin(scl, SignalRole::Scl)
            .with_pin(sda, SignalRole::Sda)
    }

    #[test]
    fn single_uart() {
        let model = resolve(&[uart1()], &bench()).unwrap();
        assert_eq!(
            model.clocks(),
            [
                ClockDomain::Instance {
                    instance: "UART1".into(),
                    symbol: "USART1".into(),
                },
                ClockDomain::Port {
                    port: Port::A,
                    symbol: "GPIOA".into(),
                },
            ]
        );
        assert_eq!(model.declarations().len(), 1);
        let id = InstanceId::from("UART1");
        assert_eq!(model.transfer_mode(&id), Some(TransferMode::Polling));
        let bindings = model.bindings(&id).unwrap();
        assert_eq!(bindings.len(), 2);
        assert!(bindings.iter().all(|b| b.af == 7));

        let decl = model.declaration(&id).unwrap();
        assert_eq!(decl.hal_instance.as_deref(), Some("USART1"));
        assert_eq!(decl.handle_name().as_deref(), Some("huart1"));
        assert_eq!(decl.pins[0].mode, GpioMode::AfPp);
        assert_eq!(decl.pins[0].pull, Pull::None);
        assert_eq!(decl.pins[0].speed, Speed::VeryHigh);
        assert_eq!(decl.pins[0].af, Some(7));
    }

    #[test]
    fn shared_port_clock_appears_once() {
        let uart2 = PeripheralDeclaration::uart("UART2", "INTERRUPT", UartParams::default())
            .with_pin(PinRef::of(Port::A, 2), SignalRole::Tx)
            .with_pin(PinRef::of(Port::A, 3), SignalRole::Rx);
        let model = resolve(&[uart1(), uart2], &bench()).unwrap();
        let symbols: Vec<_> = model.clocks().iter().map(|c| c.symbol()).collect();
        assert_eq!(symbols, ["USART1", "GPIOA", "USART2"]);
        assert_eq!(model.port_clocks().count(), 1);
    }

    #[test]
    fn pin_conflict_names_both_owners() {
        let pb6 = PinRef::of(Port::B, 6);
        let decls = [
            i2c("I2C1", pb6, PinRef::of(Port::B, 7)),
            i2c("I2C2", pb6, PinRef::of(Port::B, 11)),
        ];
        let errors = resolve(&decls, &bench()).unwrap_err();
        assert_eq!(
            errors,
            [ResolutionError::PinConflict {
                pin: pb6,
                first_owner: "I2C1".into(),
                second_owner: "I2C2".into(),
            }]
        );
    }

    #[test]
    fn unknown_transfer_mode_builds_nothing() {
        let mut decl = uart1();
        decl.transfer_mode = "BURST".into();
        let errors = resolve(&[decl], &bench()).unwrap_err();
        assert_eq!(
            errors,
            [ResolutionError::UnknownTransferMode {
                instance: "UART1".into(),
                tag: "BURST".into(),
            }]
        );
    }

    #[test]
    fn gpio_af_missing_from_table() {
        let params = GpioLineParams {
            mode: GpioMode::AfPp,
            af: Some(9),
            ..Default::default()
        };
        let decl = PeripheralDeclaration::gpio_line("PA0_AF", params)
            .with_pin(PinRef::of(Port::A, 0), SignalRole::Line);
        let errors = resolve(&[decl], &bench()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ResolutionError::InvalidAlternateFunction { af: Some(9), .. }
        ));
    }

    #[test]
    fn deterministic() {
        let decls = [
            uart1(),
            i2c("I2C1", PinRef::of(Port::B, 6), PinRef::of(Port::B, 7)),
            PeripheralDeclaration::gpio_line("LED", GpioLineParams::default())
                .with_pin(PinRef::of(Port::A, 5), SignalRole::Line),
        ];
        let table = bench();
        let a = resolve(&decls, &table).unwrap();
        let b = resolve(&decls, &table).unwrap();
        assert_eq!(a.clocks(), b.clocks());
        assert_eq!(a.declarations(), b.declarations());
        let order: Vec<_> = a.declarations().iter().map(|d| d.instance.as_str()).collect();
        assert_eq!(order, ["UART1", "I2C1", "LED"]);
    }

    #[test]
    fn all_errors_collected_in_pass_order() {
        let mut bad_mode = i2c("I2C1", PinRef::of(Port::B, 6), PinRef::of(Port::B, 7));
        bad_mode.transfer_mode = "FAST".into();
        let decls = [
            uart1(),
            PeripheralDeclaration::uart("UART1", "DMA", UartParams::default())
                .with_pin(PinRef::of(Port::A, 9), SignalRole::Tx),
            bad_mode,
        ];
        let errors = resolve(&decls, &bench()).unwrap_err();
        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(
            codes,
            ["duplicate-instance-id", "pin-conflict", "unknown-transfer-mode"]
        );
    }

    #[test]
    fn unsupported_kind() {
        let mut table = bench();
        table.instances.retain(|i| i.kind != PeripheralKind::I2c);
        let decls = [i2c("I2C1", PinRef::of(Port::B, 6), PinRef::of(Port::B, 7))];
        let errors = resolve(&decls, &table).unwrap_err();
        assert_eq!(
            errors,
            [ResolutionError::UnsupportedPeripheralKind {
                instance: "I2C1".into(),
                kind: PeripheralKind::I2c,
                family: "bench".into(),
            }]
        );
    }

    #[test]
    fn pinless_declaration_is_legal() {
        let decl = PeripheralDeclaration::uart("UART2", "DMA", UartParams::default());
        let model = resolve(&[decl], &bench()).unwrap();
        assert_eq!(model.clocks().len(), 1);
        assert!(model.port_clocks().next().is_none());
        assert_eq!(
            model.transfer_mode(&"UART2".into()),
            Some(TransferMode::Dma)
        );
    }

    #[test]
    fn i2c_pins_and_overrides() {
        let decl = PeripheralDeclaration::i2c("I2C1", "interrupt", I2cParams::default())
            .with_assignment(
                PinAssignment::new(PinRef::of(Port::B, 6), SignalRole::Scl)
                    .with_pull(Pull::None)
                    .with_label("SENSOR_SCL"),
            )
            .with_pin(PinRef::of(Port::B, 7), SignalRole::Sda);
        let model = resolve(&[decl], &bench()).unwrap();
        let decl = &model.declarations()[0];
        assert_eq!(decl.transfer_mode, TransferMode::Interrupt);
        assert_eq!(decl.pins[0].mode, GpioMode::AfOd);
        assert_eq!(decl.pins[0].pull, Pull::None);
        assert_eq!(decl.pins[0].label.as_deref(), Some("SENSOR_SCL"));
        assert_eq!(decl.pins[1].pull, Pull::Up);
        assert!(matches!(&decl.params, ResolvedParams::I2c { timing, .. } if timing == "0x30909DEC"));
    }

    #[test]
    fn uart_and_lpuart_get_distinct_handles() {
        let lpuart = PeripheralDeclaration::uart("LPUART1", "POLLING", UartParams::default())
            .with_pin(PinRef::of(Port::B, 10), SignalRole::Tx)
            .with_pin(PinRef::of(Port::B, 11), SignalRole::Rx);
        let model = resolve(&[uart1(), lpuart], &ChipFamily::stm32g4()).unwrap();
        let handles: Vec<_> = model
            .declarations()
            .iter()
            .filter_map(|d| d.handle_name())
            .collect();
        assert_eq!(handles, ["huart1", "hlpuart1"]);
    }

    #[test]
    fn duplicate_pin_labels_are_rejected() {
        let led = |id: &str, pin: u8, label: &str| {
            PeripheralDeclaration::gpio_line(id, GpioLineParams::default()).with_assignment(
                PinAssignment::new(PinRef::of(Port::A, pin), SignalRole::Line).with_label(label),
            )
        };
        let decls = [led("LED1", 5, "LED"), led("LED2", 6, "LED"), led("LED3", 7, "1-bad label")];
        let errors = resolve(&decls, &ChipFamily::stm32g4()).unwrap_err();
        let labels: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ResolutionError::InvalidParameter {
                    instance,
                    parameter,
                    ..
                } if parameter == "label" => Some(instance.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, ["LED2", "LED3"]);
    }

    #[test]
    fn empty_declaration_set() {
        let model = resolve(&[], &bench()).unwrap();
        assert!(model.clocks().is_empty());
        assert!(model.declarations().is_empty());
    }

    #[test]
    fn report_wraps_errors() {
        let mut decl = uart1();
        decl.transfer_mode = "BURST".into();
        let report = resolve_or_report(&[decl], &bench()).unwrap_err();
        assert_eq!(report.family, "bench");
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn model_serializes() {
        let model = resolve(&[uart1()], &bench()).unwrap();
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["family"], "bench");
        assert_eq!(json["clocks"][0]["domain"], "instance");
        assert_eq!(json["declarations"][0]["transfer-mode"], "POLLING");
        assert_eq!(json["declarations"][0]["pins"][0]["pin"], "PA9");
    }
}
