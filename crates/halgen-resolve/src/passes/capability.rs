//! Capability checks against the chip family's table.

use halgen_core::{PeripheralDeclaration, PeripheralParams, SignalRole};
use halgen_targets::CapabilityTable;

use crate::error::ResolutionError;
use crate::model::AlternateFunctionBinding;

/// What the table says about one declaration.
#[derive(Debug, Default)]
pub(crate) struct Routing {
    pub hal_instance: Option<String>,
    pub irqs: Vec<String>,
    pub bindings: Vec<AlternateFunctionBinding>,
}

/// Check kind support, instance names, pin existence and AF routing.
///
/// A declaration whose kind the family lacks entirely gets one
/// `UnsupportedPeripheralKind` and no further checks. An unknown instance
/// skips the AF lookups, which would all fail anyway.
pub(crate) fn check(
    declarations: &[PeripheralDeclaration],
    table: &dyn CapabilityTable,
    errors: &mut Vec<ResolutionError>,
) -> Vec<Routing> {
    declarations
        .iter()
        .map(|decl| check_one(decl, table, errors))
        .collect()
}

fn check_one(
    decl: &PeripheralDeclaration,
    table: &dyn CapabilityTable,
    errors: &mut Vec<ResolutionError>,
) -> Routing {
    let kind = decl.kind();
    let mut routing = Routing::default();

    if !table.supports_kind(kind) {
        errors.push(ResolutionError::UnsupportedPeripheralKind {
            instance: decl.instance.clone(),
            kind,
            family: table.family().to_string(),
        });
        return routing;
    }

    let mut instance_known = true;
    if kind.has_instance_clock() {
        match table.instance(&decl.instance).filter(|i| i.kind == kind) {
            Some(inst) => {
                routing.hal_instance = Some(inst.hal_name.clone());
                routing.irqs = inst.irqs.clone();
            }
            None => {
                instance_known = false;
                errors.push(ResolutionError::UnknownInstance {
                    instance: decl.instance.clone(),
                    kind,
                    family: table.family().to_string(),
                });
            }
        }
    }

    for assignment in &decl.pins {
        let pin = assignment.pin;
        let role = assignment.role;
        if !table.has_pin(pin) {
            errors.push(ResolutionError::UnknownPin {
                instance: decl.instance.clone(),
                pin,
                family: table.family().to_string(),
            });
            continue;
        }

        let af = match &decl.params {
            PeripheralParams::GpioLine(params) => {
                if role != SignalRole::Line {
                    Err(params.af)
                } else if !params.mode.is_alternate() {
                    continue;
                } else {
                    params
                        .af
                        .filter(|&af| table.pin_accepts_af(pin, af))
                        .ok_or(params.af)
                }
            }
            PeripheralParams::Uart(_) | PeripheralParams::I2c(_) => {
                if !instance_known {
                    continue;
                }
                table.lookup_af(&decl.instance, pin, role).ok_or(None)
            }
        };

        match af {
            Ok(af) => routing.bindings.push(AlternateFunctionBinding {
                instance: decl.instance.clone(),
                pin,
                role,
                af,
            }),
            Err(requested) => errors.push(ResolutionError::InvalidAlternateFunction {
                instance: decl.instance.clone(),
                pin,
                role,
                af: requested,
            }),
        }
    }

    routing
}
