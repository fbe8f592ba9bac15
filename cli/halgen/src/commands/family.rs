//! `halgen family`: chip family listing, description and validation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use halgen_core::PeripheralKind;
use halgen_targets::{
    builtin_families, discover_families, family_to_toml, generate_template, load_family_toml,
    resolve_family, validate_family, ChipFamily,
};

use super::{family_path, load_family};

/// List built-in families and any under the project's `families/` directory.
pub fn list(project_dir: Option<&Path>) -> Result<()> {
    println!("Built-in families:");
    println!();
    for (name, description) in builtin_families() {
        println!("  {name:<25} {description}");
    }

    if let Some(dir) = project_dir {
        let local = discover_families(dir).context("scanning families/ directory")?;
        if !local.is_empty() {
            println!();
            println!("Project families:");
            println!();
            for (name, path) in &local {
                println!("  {name:<25} {}", path.display());
            }
        }
    }

    println!();
    println!("Use 'halgen family describe <name>' for details.");
    Ok(())
}

/// Describe a family. `format` may be "toml" for the raw table.
pub fn describe(name: &str, project_dir: Option<&Path>, format: Option<&str>) -> Result<()> {
    let family = load_family(name, project_dir)?;
    match format {
        None | Some("text") => print!("{}", summary(&family)),
        Some("toml") => print!("{}", family_to_toml(&family)?),
        Some(other) => bail!("unknown describe format: '{other}'. Available formats: text, toml"),
    }
    Ok(())
}

fn summary(family: &ChipFamily) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Family: {} ===\n", family.name));
    if !family.description.is_empty() {
        out.push_str(&format!("{}\n", family.description));
    }
    out.push_str(&format!("HAL header: {}\n", family.hal_header));
    out.push('\n');

    out.push_str("--- Ports ---\n");
    let ports: Vec<String> = family
        .ports
        .iter()
        .map(|p| format!("{} ({})", p.port, p.clock))
        .collect();
    out.push_str(&format!("  {} x {} pins: {}\n", ports.len(), family.pins_per_port, ports.join(", ")));
    out.push('\n');

    for kind in [PeripheralKind::Uart, PeripheralKind::I2c] {
        let instances: Vec<_> = family.instances_of(kind).collect();
        if instances.is_empty() {
            continue;
        }
        out.push_str(&format!("--- {} instances ---\n", kind.name()));
        for inst in instances {
            out.push_str(&format!(
                "  {:<8} -> {:<8} irqs: {}\n",
                inst.id.as_str(),
                inst.hal_name,
                inst.irqs.join(", ")
            ));
            for sig in family.signals_for(&inst.id) {
                out.push_str(&format!("    {:<5} {:<5} AF{}\n", sig.pin.to_string(), sig.role.name(), sig.af));
            }
        }
        out.push('\n');
    }

    if !family.i2c_timings.is_empty() {
        out.push_str("--- I2C timing presets ---\n");
        for timing in &family.i2c_timings {
            out.push_str(&format!("  {:>8} Hz  {}\n", timing.clock_speed_hz, timing.register));
        }
    }
    out
}

/// Validate a built-in family, a project family or a `.family.toml` path.
pub fn validate(name: &str, project_dir: Option<&Path>) -> Result<()> {
    let family = match resolve_family(name) {
        Some(family) => family,
        None => {
            let path = family_path(name, project_dir)
                .with_context(|| format!("no family named '{name}' and no such file"))?;
            load_family_toml(&path).with_context(|| format!("loading {}", path.display()))?
        }
    };

    match validate_family(&family) {
        Ok(()) => {
            println!("Family '{}' is valid.", family.name);
            Ok(())
        }
        Err(issues) => {
            let mut errors = 0;
            for issue in &issues {
                println!("  [{}] {}", issue.severity, issue.message);
                if issue.severity == "error" {
                    errors += 1;
                }
            }
            if errors > 0 {
                bail!("family '{}' has {errors} validation error(s)", family.name);
            }
            println!("Family '{}' is valid ({} warning(s)).", family.name, issues.len());
            Ok(())
        }
    }
}

/// Print a `.family.toml` template seeded from a built-in family.
pub fn template(name: &str) -> Result<()> {
    print!("{}", generate_template(name)?);
    Ok(())
}
