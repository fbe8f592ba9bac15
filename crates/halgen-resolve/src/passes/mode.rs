//! Transfer-mode validation.

use halgen_core::{PeripheralDeclaration, TransferMode};

use crate::error::ResolutionError;

/// Parse every declaration's transfer-mode tag.
///
/// Unrecognized tags are errors; nothing is substituted for them.
pub(crate) fn check(
    declarations: &[PeripheralDeclaration],
    errors: &mut Vec<ResolutionError>,
) -> Vec<TransferMode> {
    let mut modes = Vec::with_capacity(declarations.len());
    for decl in declarations {
        match TransferMode::parse(&decl.transfer_mode) {
            Some(mode) => modes.push(mode),
            None => errors.push(ResolutionError::UnknownTransferMode {
                instance: decl.instance.clone(),
                tag: decl.transfer_mode.clone(),
            }),
        }
    }
    modes
}
