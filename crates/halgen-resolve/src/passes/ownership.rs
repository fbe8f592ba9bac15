//! Instance-id uniqueness and pin ownership.

use std::collections::{HashMap, HashSet};

use halgen_core::{InstanceId, PeripheralDeclaration, PinRef};

use crate::error::ResolutionError;

/// Report every repeated instance id, once per repeat.
pub(crate) fn duplicate_instances(declarations: &[PeripheralDeclaration]) -> Vec<ResolutionError> {
    let mut seen = HashSet::new();
    declarations
        .iter()
        .filter(|d| !seen.insert(&d.instance))
        .map(|d| ResolutionError::DuplicateInstanceId {
            instance: d.instance.clone(),
        })
        .collect()
}

/// Report every pin claimed more than once.
///
/// The first claimant owns the pin; every later claim, including a second
/// claim by the same instance, conflicts with it.
pub(crate) fn pin_conflicts(declarations: &[PeripheralDeclaration]) -> Vec<ResolutionError> {
    let mut owners: HashMap<PinRef, &InstanceId> = HashMap::new();
    let mut errors = Vec::new();
    for decl in declarations {
        for assignment in &decl.pins {
            match owners.get(&assignment.pin) {
                Some(&first_owner) => errors.push(ResolutionError::PinConflict {
                    pin: assignment.pin,
                    first_owner: first_owner.clone(),
                    second_owner: decl.instance.clone(),
                }),
                None => {
                    owners.insert(assignment.pin, &decl.instance);
                }
            }
        }
    }
    errors
}
