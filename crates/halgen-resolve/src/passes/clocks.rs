//! Clock-domain collection and de-duplication.

use std::collections::HashSet;

use halgen_core::PeripheralDeclaration;
use halgen_targets::CapabilityTable;

use crate::model::ClockDomain;

/// Collect the clock enables the declarations need, each once, in first-seen order.
///
/// For every declaration the instance clock comes first (UART and I2C only),
/// then the port clocks of its pins in pin order. Domains the table has no
/// symbol for are skipped; the capability pass reports those.
pub(crate) fn collect(
    declarations: &[PeripheralDeclaration],
    table: &dyn CapabilityTable,
) -> Vec<ClockDomain> {
    let mut seen = HashSet::new();
    let mut clocks = Vec::new();
    let mut add = |domain: ClockDomain| {
        if seen.insert(domain.clone()) {
            clocks.push(domain);
        }
    };

    for decl in declarations {
        if decl.kind().has_instance_clock() {
            if let Some(symbol) = table.clock_symbol_for_instance(&decl.instance) {
                add(ClockDomain::Instance {
                    instance: decl.instance.clone(),
                    symbol: symbol.to_string(),
                });
            }
        }
        for assignment in &decl.pins {
            let port = assignment.pin.port();
            if let Some(symbol) = table.clock_symbol_for_port(port) {
                add(ClockDomain::Port {
                    port,
                    symbol: symbol.to_string(),
                });
            }
        }
    }
    clocks
}
