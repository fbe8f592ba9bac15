//! The contract between a resolved model and whatever renders it.

use halgen_resolve::{ClockDomain, ResolvedDeclaration, ResolvedModel};
use tracing::debug;

use crate::error::Result;

/// Model-wide facts passed to [`EmitSink::begin`].
#[derive(Debug, Clone, Copy)]
pub struct ModelHeader<'a> {
    pub family: &'a str,
    pub hal_header: &'a str,
}

/// Receives a resolved model piece by piece.
///
/// Every decision has already been made by the resolver. Sinks render what
/// they are given; they never validate, reorder or fill in defaults.
pub trait EmitSink {
    type Output;

    fn begin(&mut self, header: &ModelHeader<'_>);

    /// Called once per clock domain, in model order.
    fn clock(&mut self, clock: &ClockDomain);

    /// Called once per declaration, in model order, after every clock.
    fn declaration(&mut self, declaration: &ResolvedDeclaration);

    fn finish(&mut self) -> Result<Self::Output>;
}

/// Feed a model to a sink: header, then clocks, then declarations.
pub fn walk<S: EmitSink + ?Sized>(model: &ResolvedModel, sink: &mut S) -> Result<S::Output> {
    sink.begin(&ModelHeader {
        family: model.family(),
        hal_header: model.hal_header(),
    });
    for clock in model.clocks() {
        sink.clock(clock);
    }
    for declaration in model.declarations() {
        sink.declaration(declaration);
    }
    debug!(
        clocks = model.clocks().len(),
        declarations = model.declarations().len(),
        "model walked"
    );
    sink.finish()
}
