//! Built-in renderer for STM32 HAL C sources.
//!
//! Produces up to four units, each a header/source pair:
//! `gpio` (port clocks and every pin), `uart` and `i2c` (instance clocks,
//! init, NVIC and transfer dispatch), and `main` calling each unit's init in
//! that order. A unit with nothing to configure is not produced, and `main`
//! only follows when another unit was.

mod gpio;
mod i2c;
mod main;
mod uart;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::debug;

use halgen_core::{InstanceId, PeripheralKind, TransferMode};
use halgen_resolve::{ClockDomain, ResolvedDeclaration, ResolvedModel, ResolvedParams};

use crate::error::{EmitError, Result};
use crate::sink::{walk, EmitSink, ModelHeader};

/// One generated file, with a path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    fn header(unit: &str, contents: String) -> Self {
        Self {
            path: Path::new("Inc").join(format!("{unit}.h")),
            contents,
        }
    }

    fn source(unit: &str, contents: String) -> Self {
        Self {
            path: Path::new("Src").join(format!("{unit}.c")),
            contents,
        }
    }

    /// Write the file below `root`, creating directories as needed.
    pub fn write_under(&self, root: &Path) -> Result<PathBuf> {
        let target = root.join(&self.path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &self.contents)?;
        Ok(target)
    }
}

/// Collects a walked model and renders C on [`EmitSink::finish`].
#[derive(Debug, Default)]
pub struct CSourceSink {
    family: String,
    hal_header: String,
    clocks: Vec<ClockDomain>,
    declarations: Vec<ResolvedDeclaration>,
}

impl CSourceSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EmitSink for CSourceSink {
    type Output = Vec<GeneratedFile>;

    fn begin(&mut self, header: &ModelHeader<'_>) {
        self.family = header.family.to_string();
        self.hal_header = header.hal_header.to_string();
    }

    fn clock(&mut self, clock: &ClockDomain) {
        self.clocks.push(clock.clone());
    }

    fn declaration(&mut self, declaration: &ResolvedDeclaration) {
        self.declarations.push(declaration.clone());
    }

    fn finish(&mut self) -> Result<Vec<GeneratedFile>> {
        let unit = Unit {
            family: &self.family,
            hal_header: &self.hal_header,
            clocks: &self.clocks,
            declarations: &self.declarations,
        };
        let mut files = Vec::new();
        let mut units = Vec::new();
        if unit.clocks.iter().any(ClockDomain::is_port) {
            files.extend(gpio::render(&unit)?);
            units.push("gpio");
        }
        if unit.has(PeripheralKind::Uart) {
            files.extend(uart::render(&unit)?);
            units.push("uart");
        }
        if unit.has(PeripheralKind::I2c) {
            files.extend(i2c::render(&unit)?);
            units.push("i2c");
        }
        if !units.is_empty() {
            files.extend(main::render(&unit, &units)?);
        }
        debug!(files = files.len(), family = %self.family, "C sources rendered");
        Ok(files)
    }
}

/// Render a model into STM32 HAL C sources.
pub fn emit_c(model: &ResolvedModel) -> Result<Vec<GeneratedFile>> {
    walk(model, &mut CSourceSink::new())
}

/// Everything a unit renderer reads.
struct Unit<'a> {
    family: &'a str,
    hal_header: &'a str,
    clocks: &'a [ClockDomain],
    declarations: &'a [ResolvedDeclaration],
}

/// A UART or I2C declaration with its handle, HAL instance and the
/// parameters of its kind.
struct Peripheral<'a, P> {
    decl: &'a ResolvedDeclaration,
    handle: String,
    hal: &'a str,
    params: P,
}

impl<'a> Unit<'a> {
    fn has(&self, kind: PeripheralKind) -> bool {
        self.declarations.iter().any(|d| d.kind == kind)
    }

    /// Every declaration of `kind`, in model order. A declaration missing its
    /// handle, HAL instance or kind parameters is an error, never skipped.
    fn peripherals<P>(
        &self,
        kind: PeripheralKind,
        params: impl Fn(&'a ResolvedParams) -> Option<P>,
    ) -> Result<Vec<Peripheral<'a, P>>> {
        self.declarations
            .iter()
            .filter(|d| d.kind == kind)
            .map(|decl| {
                let inconsistent = |reason| EmitError::Inconsistent {
                    instance: decl.instance.clone(),
                    reason,
                };
                Ok(Peripheral {
                    decl,
                    handle: decl.handle_name().ok_or_else(|| inconsistent("no handle name"))?,
                    hal: decl
                        .hal_instance
                        .as_deref()
                        .ok_or_else(|| inconsistent("no HAL instance"))?,
                    params: params(&decl.params)
                        .ok_or_else(|| inconsistent("parameters do not match its kind"))?,
                })
            })
            .collect()
    }

    /// Instance clock symbols owned by declarations of `kind`, in model order.
    fn instance_clocks(&self, kind: PeripheralKind) -> Vec<&'a str> {
        let owners: Vec<&InstanceId> = self
            .declarations
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| &d.instance)
            .collect();
        self.clocks
            .iter()
            .filter_map(|c| match c {
                ClockDomain::Instance { instance, symbol } if owners.contains(&instance) => {
                    Some(symbol.as_str())
                }
                _ => None,
            })
            .collect()
    }

    fn banner(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            "/* Generated by halgen for {}. Do not edit; regenerate instead. */",
            self.family
        )?;
        writeln!(out)
    }

    fn open_header(&self, out: &mut String, guard: &str) -> std::fmt::Result {
        self.banner(out)?;
        writeln!(out, "#ifndef {guard}")?;
        writeln!(out, "#define {guard}")?;
        writeln!(out)?;
        writeln!(out, "#include \"{}\"", self.hal_header)?;
        writeln!(out)?;
        writeln!(out, "#ifdef __cplusplus")?;
        writeln!(out, "extern \"C\" {{")?;
        writeln!(out, "#endif")?;
        writeln!(out)
    }
}

fn close_header(out: &mut String, guard: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "/* Defined weak in main.c. */")?;
    writeln!(out, "void Error_Handler(void);")?;
    writeln!(out)?;
    writeln!(out, "#ifdef __cplusplus")?;
    writeln!(out, "}}")?;
    writeln!(out, "#endif")?;
    writeln!(out)?;
    writeln!(out, "#endif /* {guard} */")
}

/// `__HAL_RCC_<symbol>_CLK_ENABLE();` inside a function body.
fn enable_clock(out: &mut String, symbol: &str) -> std::fmt::Result {
    writeln!(out, "    {};", crate::context::clock_enable(symbol))
}

/// Emit `HAL_NVIC_SetPriority` / `HAL_NVIC_EnableIRQ` for each line.
fn enable_irqs(out: &mut String, irqs: &[String]) -> std::fmt::Result {
    for irq in irqs {
        writeln!(out, "    HAL_NVIC_SetPriority({irq}, 0, 0);")?;
        writeln!(out, "    HAL_NVIC_EnableIRQ({irq});")?;
    }
    Ok(())
}

/// A function that forwards to the HAL call chosen by each instance's
/// transfer mode, matching on `<handle>->Instance`. Parameters in `unused`
/// are discarded when no instance consumes them.
fn dispatch<P>(
    out: &mut String,
    signature: &str,
    handle: &str,
    unused: &[&str],
    peripherals: &[Peripheral<'_, P>],
    call: impl Fn(TransferMode) -> String,
) -> std::fmt::Result {
    writeln!(out, "{signature}")?;
    writeln!(out, "{{")?;
    for param in unused {
        writeln!(out, "    (void){param};")?;
    }
    for peripheral in peripherals {
        writeln!(out, "    if ({handle}->Instance == {})", peripheral.hal)?;
        writeln!(out, "    {{")?;
        writeln!(out, "        return {};", call(peripheral.decl.transfer_mode))?;
        writeln!(out, "    }}")?;
    }
    writeln!(out, "    return HAL_ERROR;")?;
    writeln!(out, "}}")
}

fn check_hal_ok(out: &mut String, call: &str) -> std::fmt::Result {
    writeln!(out, "    if ({call} != HAL_OK)")?;
    writeln!(out, "    {{")?;
    writeln!(out, "        Error_Handler();")?;
    writeln!(out, "    }}")
}
