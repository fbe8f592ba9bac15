//! `main.h` / `main.c`: HAL bring-up and the init sequence of every other unit.

use std::fmt::Write as _;

use super::{close_header, GeneratedFile, Unit};
use crate::error::Result;

const GUARD: &str = "__MAIN_H";

/// Render the main unit. `units` are the other rendered units in init order
/// (`gpio` first), each exposing `MX_<UNIT>_Init`.
pub(super) fn render(unit: &Unit<'_>, units: &[&str]) -> Result<[GeneratedFile; 2]> {
    Ok([
        GeneratedFile::header("main", header(unit)?),
        GeneratedFile::source("main", source(unit, units)?),
    ])
}

fn header(unit: &Unit<'_>) -> Result<String> {
    let mut out = String::new();
    unit.open_header(&mut out, GUARD)?;
    writeln!(out, "void SystemClock_Config(void);")?;
    close_header(&mut out, GUARD)?;
    Ok(out)
}

fn source(unit: &Unit<'_>, units: &[&str]) -> Result<String> {
    let mut out = String::new();
    unit.banner(&mut out)?;
    writeln!(out, "#include \"main.h\"")?;
    for name in units {
        writeln!(out, "#include \"{name}.h\"")?;
    }
    writeln!(out)?;

    writeln!(out, "int main(void)")?;
    writeln!(out, "{{")?;
    writeln!(out, "    HAL_Init();")?;
    writeln!(out, "    SystemClock_Config();")?;
    writeln!(out)?;
    for name in units {
        writeln!(out, "    MX_{}_Init();", name.to_ascii_uppercase())?;
    }
    writeln!(out)?;
    writeln!(out, "    while (1)")?;
    writeln!(out, "    {{")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    // Runs from the reset clock until the application supplies a clock tree.
    writeln!(out, "__weak void SystemClock_Config(void)")?;
    writeln!(out, "{{")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "__weak void Error_Handler(void)")?;
    writeln!(out, "{{")?;
    writeln!(out, "    __disable_irq();")?;
    writeln!(out, "    while (1)")?;
    writeln!(out, "    {{")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    Ok(out)
}
