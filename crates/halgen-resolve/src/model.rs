//! The resolved configuration model handed to emitters.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use halgen_core::{
    GpioLineParams, GpioMode, I2cParams, InstanceId, PeripheralKind, PinRef, Port, Pull,
    SignalRole, Speed, TransferMode, UartParams,
};

/// One unit of clock-enable work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "domain", rename_all = "kebab-case")]
pub enum ClockDomain {
    /// A GPIO port clock.
    Port { port: Port, symbol: String },
    /// A peripheral instance clock.
    Instance { instance: InstanceId, symbol: String },
}

impl ClockDomain {
    /// Clock token, e.g. `GPIOA` or `USART1`.
    pub fn symbol(&self) -> &str {
        match self {
            ClockDomain::Port { symbol, .. } | ClockDomain::Instance { symbol, .. } => symbol,
        }
    }

    pub fn is_port(&self) -> bool {
        matches!(self, ClockDomain::Port { .. })
    }
}

impl fmt::Display for ClockDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockDomain::Port { port, symbol } => write!(f, "{symbol} (port {port})"),
            ClockDomain::Instance { instance, symbol } => write!(f, "{symbol} ({instance})"),
        }
    }
}

/// A validated (instance, pin, role) routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AlternateFunctionBinding {
    pub instance: InstanceId,
    pub pin: PinRef,
    pub role: SignalRole,
    pub af: u8,
}

/// A pin with every electrical attribute decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedPin {
    pub pin: PinRef,
    pub role: SignalRole,
    pub mode: GpioMode,
    pub pull: Pull,
    pub speed: Speed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub af: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Validated kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResolvedParams {
    Uart(UartParams),
    I2c {
        #[serde(flatten)]
        params: I2cParams,
        /// Timing-register preset for the requested bus clock.
        timing: String,
    },
    GpioLine(GpioLineParams),
}

/// One declaration after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedDeclaration {
    pub instance: InstanceId,
    pub kind: PeripheralKind,
    /// HAL instance macro (`USART1`); `None` for GPIO lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hal_instance: Option<String>,
    pub irqs: Vec<String>,
    pub transfer_mode: TransferMode,
    pub pins: Vec<ResolvedPin>,
    pub bindings: Vec<AlternateFunctionBinding>,
    pub params: ResolvedParams,
}

impl ResolvedDeclaration {
    /// C handle variable name: `huart1`, `hlpuart1`. `None` for GPIO lines.
    pub fn handle_name(&self) -> Option<String> {
        match self.kind {
            PeripheralKind::GpioLine => None,
            PeripheralKind::Uart | PeripheralKind::I2c => Some(self.instance.handle_name()),
        }
    }
}

/// The validated, conflict-free configuration for one generation run.
///
/// Only [`crate::resolve`] builds one, so holding a `ResolvedModel` means every
/// invariant has been checked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedModel {
    family: String,
    hal_header: String,
    clocks: Vec<ClockDomain>,
    declarations: Vec<ResolvedDeclaration>,
    #[serde(skip)]
    index: HashMap<InstanceId, usize>,
}

impl ResolvedModel {
    pub(crate) fn new(
        family: String,
        hal_header: String,
        clocks: Vec<ClockDomain>,
        declarations: Vec<ResolvedDeclaration>,
    ) -> Self {
        let index = declarations
            .iter()
            .enumerate()
            .map(|(i, d)| (d.instance.clone(), i))
            .collect();
        Self {
            family,
            hal_header,
            clocks,
            declarations,
            index,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn hal_header(&self) -> &str {
        &self.hal_header
    }

    /// Clock enables in first-seen order, each exactly once.
    pub fn clocks(&self) -> &[ClockDomain] {
        &self.clocks
    }

    /// Port clocks only, in model order.
    pub fn port_clocks(&self) -> impl Iterator<Item = &ClockDomain> {
        self.clocks.iter().filter(|c| c.is_port())
    }

    /// Instance clocks only, in model order.
    pub fn instance_clocks(&self) -> impl Iterator<Item = &ClockDomain> {
        self.clocks.iter().filter(|c| !c.is_port())
    }

    /// Declarations in input order.
    pub fn declarations(&self) -> &[ResolvedDeclaration] {
        &self.declarations
    }

    /// Declarations of one kind, in input order.
    pub fn declarations_of(&self, kind: PeripheralKind) -> impl Iterator<Item = &ResolvedDeclaration> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }

    pub fn declaration(&self, instance: &InstanceId) -> Option<&ResolvedDeclaration> {
        self.index.get(instance).map(|&i| &self.declarations[i])
    }

    pub fn bindings(&self, instance: &InstanceId) -> Option<&[AlternateFunctionBinding]> {
        self.declaration(instance).map(|d| d.bindings.as_slice())
    }

    pub fn transfer_mode(&self, instance: &InstanceId) -> Option<TransferMode> {
        self.declaration(instance).map(|d| d.transfer_mode)
    }
}

impl fmt::Display for ResolvedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Resolved model ({}) ===", self.family)?;
        writeln!(
            f,
            "Clocks: {} | Declarations: {}",
            self.clocks.len(),
            self.declarations.len()
        )?;
        writeln!(f, "--- Clock enables ---")?;
        for clock in &self.clocks {
            writeln!(f, "  {clock}")?;
        }
        writeln!(f, "--- Declarations ---")?;
        for decl in &self.declarations {
            match &decl.hal_instance {
                Some(hal) => writeln!(
                    f,
                    "  {} [{}] {} -> {}",
                    decl.instance, decl.kind, decl.transfer_mode, hal
                )?,
                None => writeln!(f, "  {} [{}]", decl.instance, decl.kind)?,
            }
            for pin in &decl.pins {
                write!(f, "    {} {} {}", pin.pin, pin.role, pin.mode.hal_constant())?;
                if let Some(af) = pin.af {
                    write!(f, " AF{af}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
