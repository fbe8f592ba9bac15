//! TOML parsing, serialization, validation, and discovery for chip families.
//!
//! Project-local families are stored as `.family.toml` files in the
//! `families/` directory of a halgen project.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use halgen_core::pin::MAX_PIN_NUMBER;
use halgen_core::{InstanceId, PeripheralKind};
use tracing::debug;

use crate::error::{Result, TargetError};
use crate::family::ChipFamily;

/// A validation issue found in a family definition.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: String) -> Self {
        Self {
            severity: "error",
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: "warning",
            message,
        }
    }
}

/// Load a family from a `.family.toml` file.
pub fn load_family_toml(path: &Path) -> Result<ChipFamily> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "loading family");
    let content = std::fs::read_to_string(path)?;
    parse_family_toml(&content)
}

/// Parse a family from a TOML string.
pub fn parse_family_toml(toml_str: &str) -> Result<ChipFamily> {
    let family: ChipFamily = toml::from_str(toml_str)?;
    Ok(family)
}

/// Serialize a family to pretty TOML.
pub fn family_to_toml(family: &ChipFamily) -> Result<String> {
    let toml_str = toml::to_string_pretty(family)?;
    Ok(toml_str)
}

/// Validate a family definition for structural correctness.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
/// Warnings alone still produce `Err`; callers decide whether to proceed.
pub fn validate_family(family: &ChipFamily) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // 1. Pin count per port fits a 16-bit port register
    if family.pins_per_port == 0 || family.pins_per_port > MAX_PIN_NUMBER + 1 {
        issues.push(ValidationIssue::error(format!(
            "pins-per-port {} is out of range (expected 1..=16)",
            family.pins_per_port
        )));
    }

    // 2. At least one port
    if family.ports.is_empty() {
        issues.push(ValidationIssue::error("family has no GPIO ports".into()));
    }

    // 3. Ports are unique and carry a clock token
    let mut seen_ports = HashSet::new();
    for port in &family.ports {
        if !seen_ports.insert(port.port) {
            issues.push(ValidationIssue::error(format!(
                "port {} is listed more than once",
                port.port
            )));
        }
        if port.clock.trim().is_empty() {
            issues.push(ValidationIssue::error(format!(
                "port {} has an empty clock token",
                port.port
            )));
        }
    }

    // 4. Instances are unique, carry a clock token, and are not GPIO lines.
    //    Distinct instances must not share a HAL macro or a C handle name.
    let mut kinds = HashMap::new();
    let mut hal_names: HashMap<&str, &InstanceId> = HashMap::new();
    let mut handles: HashMap<String, &InstanceId> = HashMap::new();
    for inst in &family.instances {
        if kinds.insert(inst.id.clone(), inst.kind).is_some() {
            issues.push(ValidationIssue::error(format!(
                "instance '{}' is listed more than once",
                inst.id
            )));
            continue;
        }
        if let Some(other) = hal_names.insert(&inst.hal_name, &inst.id) {
            issues.push(ValidationIssue::error(format!(
                "instances '{}' and '{}' share HAL name {}",
                other, inst.id, inst.hal_name
            )));
        }
        if let Some(other) = handles.insert(inst.id.handle_name(), &inst.id) {
            issues.push(ValidationIssue::error(format!(
                "instances '{}' and '{}' share handle name {}",
                other,
                inst.id,
                inst.id.handle_name()
            )));
        }
        if inst.kind == PeripheralKind::GpioLine {
            issues.push(ValidationIssue::error(format!(
                "instance '{}' has kind gpio-line; GPIO lines are described by ports",
                inst.id
            )));
        }
        if inst.clock.trim().is_empty() {
            issues.push(ValidationIssue::error(format!(
                "instance '{}' has an empty clock token",
                inst.id
            )));
        }
    }

    // 5. Signals reference known instances and pins, with matching roles
    let mut routes = HashMap::new();
    for sig in &family.signals {
        match kinds.get(&sig.instance) {
            None => issues.push(ValidationIssue::error(format!(
                "signal {} {} references unknown instance '{}'",
                sig.pin,
                sig.role.name(),
                sig.instance
            ))),
            Some(&kind) if sig.role.kind() != kind => {
                issues.push(ValidationIssue::error(format!(
                    "signal role {} on {} does not belong to {} instance '{}'",
                    sig.role.name(),
                    sig.pin,
                    kind.name(),
                    sig.instance
                )))
            }
            Some(_) => {}
        }
        if !seen_ports.contains(&sig.pin.port()) {
            issues.push(ValidationIssue::error(format!(
                "signal on {} references undeclared port {}",
                sig.pin,
                sig.pin.port()
            )));
        } else if sig.pin.number() >= family.pins_per_port {
            issues.push(ValidationIssue::error(format!(
                "signal on {} exceeds pins-per-port ({})",
                sig.pin, family.pins_per_port
            )));
        }
        if sig.af > 15 {
            issues.push(ValidationIssue::error(format!(
                "signal {} {} uses alternate function {} (expected 0..=15)",
                sig.pin,
                sig.role.name(),
                sig.af
            )));
        }
        let key = (sig.instance.clone(), sig.pin, sig.role);
        match routes.get(&key) {
            Some(&af) if af != sig.af => issues.push(ValidationIssue::error(format!(
                "signal {} {} of '{}' is listed with conflicting alternate functions {} and {}",
                sig.pin,
                sig.role.name(),
                sig.instance,
                af,
                sig.af
            ))),
            Some(_) => issues.push(ValidationIssue::warning(format!(
                "signal {} {} of '{}' is listed more than once",
                sig.pin,
                sig.role.name(),
                sig.instance
            ))),
            None => {
                routes.insert(key, sig.af);
            }
        }
    }

    // 6. I2C instances need timing presets
    if family.instances_of(PeripheralKind::I2c).next().is_some() && family.i2c_timings.is_empty() {
        issues.push(ValidationIssue::warning(
            "family has I2C instances but no i2c-timings".into(),
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Generate a template `.family.toml` for a new family.
///
/// Seeds from stm32g4 with the given custom name.
pub fn generate_template(name: &str) -> Result<String> {
    let mut family = ChipFamily::stm32g4();
    family.name = name.into();
    family.description = format!("{name} (derived from stm32g4)");
    family_to_toml(&family)
}

/// Discover all `.family.toml` files in a project's `families/` directory.
///
/// Returns a list of (family_name, file_path) pairs.
pub fn discover_families(project_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let families_dir = project_dir.join("families");
    if !families_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut families = Vec::new();
    for entry in std::fs::read_dir(&families_dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".family.toml"))
            .map(str::to_string);
        if let Some(name) = name {
            families.push((name, path));
        }
    }
    families.sort_by(|a, b| a.0.cmp(&b.0));
    debug!(count = families.len(), dir = %families_dir.display(), "discovered project families");
    Ok(families)
}
