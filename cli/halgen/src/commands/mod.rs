//! CLI command implementations.

pub mod check;
pub mod family;
pub mod generate;
pub mod init;
pub mod inspect;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use halgen_core::DeclarationSet;
use halgen_targets::{load_family_toml, resolve_family, validate_family, ChipFamily};
use tracing::{debug, warn};

use crate::manifest::HalgenManifest;

const DEFAULT_DECLARATIONS: &str = "peripherals.toml";

/// Input selection shared by `check`, `generate` and `inspect`.
///
/// Flags win over the manifest. Flag paths are taken as given; manifest
/// paths are relative to the project directory.
pub struct Selection<'a> {
    pub project_dir: &'a Path,
    pub manifest: Option<&'a HalgenManifest>,
    pub input: Option<&'a str>,
    pub family: Option<&'a str>,
}

impl Selection<'_> {
    fn declarations_path(&self) -> PathBuf {
        match self.input {
            Some(path) => PathBuf::from(path),
            None => self.project_dir.join(
                self.manifest
                    .and_then(HalgenManifest::declarations)
                    .unwrap_or(DEFAULT_DECLARATIONS),
            ),
        }
    }

    fn family_name(&self) -> Result<&str> {
        match self.family.or_else(|| self.manifest.and_then(HalgenManifest::family)) {
            Some(name) => Ok(name),
            None => bail!("no chip family selected (pass --family or set [target] family in halgen.toml)"),
        }
    }

    /// Load the declaration set and the chip family it targets.
    pub fn load(&self) -> Result<(DeclarationSet, ChipFamily)> {
        let path = self.declarations_path();
        let set = DeclarationSet::load(&path)
            .with_context(|| format!("loading declarations from {}", path.display()))?;
        let family = load_family(self.family_name()?, Some(self.project_dir))?;
        debug!(
            declarations = set.len(),
            family = %family.name,
            "loaded inputs"
        );
        Ok((set, family))
    }
}

/// Resolve a family by name: built-ins, then `families/<name>.family.toml`
/// under the project, then `name` as a file path.
///
/// File-backed families must pass validation; warnings are logged.
pub fn load_family(name: &str, project_dir: Option<&Path>) -> Result<ChipFamily> {
    if let Some(family) = resolve_family(name) {
        return Ok(family);
    }

    let path = family_path(name, project_dir)
        .with_context(|| format!("unknown chip family '{name}'. Use 'halgen family list' to see available families."))?;
    let family = load_family_toml(&path)
        .with_context(|| format!("loading family from {}", path.display()))?;

    if let Err(issues) = validate_family(&family) {
        let mut errors = 0;
        for issue in &issues {
            if issue.severity == "error" {
                errors += 1;
            } else {
                warn!(family = %family.name, "{}", issue.message);
            }
        }
        if errors > 0 {
            bail!(
                "family '{}' has {errors} validation error(s); run 'halgen family validate {name}'",
                family.name
            );
        }
    }
    Ok(family)
}

fn family_path(name: &str, project_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = project_dir {
        let local = dir.join("families").join(format!("{name}.family.toml"));
        if local.is_file() {
            return Some(local);
        }
    }
    let literal = PathBuf::from(name);
    literal.is_file().then_some(literal)
}
