//! `halgen.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "halgen.toml";

/// The top-level manifest structure for a halgen project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalgenManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    #[serde(default)]
    pub target: Option<TargetConfig>,
    #[serde(default)]
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Chip family selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Built-in family name, a name under `families/`, or a path.
    #[serde(default)]
    pub family: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Declaration file, relative to the project directory.
    #[serde(default)]
    pub declarations: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, relative to the project directory.
    #[serde(default)]
    pub dir: Option<String>,
}

impl HalgenManifest {
    /// Search upward from `start_dir` for a `halgen.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: HalgenManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing halgen.toml")
    }

    pub fn family(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.family.as_deref())
    }

    pub fn declarations(&self) -> Option<&str> {
        self.input.as_ref().and_then(|i| i.declarations.as_deref())
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.dir.as_deref())
    }

    /// Generate the default template for `halgen init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"
version = "0.1.0"

[target]
family = "stm32g4"

[input]
declarations = "peripherals.toml"

[output]
dir = "generated"
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let toml_str = r#"
[project]
name = "sensor-board"
version = "1.2.0"
description = "IMU carrier"

[target]
family = "stm32l4"

[input]
declarations = "hw/peripherals.json"

[output]
dir = "Core"
"#;
        let manifest = HalgenManifest::from_str(toml_str).unwrap();
        assert_eq!(manifest.project.name, "sensor-board");
        assert_eq!(manifest.project.version, "1.2.0");
        assert_eq!(manifest.project.description.as_deref(), Some("IMU carrier"));
        assert_eq!(manifest.family(), Some("stm32l4"));
        assert_eq!(manifest.declarations(), Some("hw/peripherals.json"));
        assert_eq!(manifest.output_dir(), Some("Core"));
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = HalgenManifest::from_str("[project]\nname = \"minimal\"\n").unwrap();
        assert_eq!(manifest.project.version, "0.1.0");
        assert!(manifest.family().is_none());
        assert!(manifest.declarations().is_none());
        assert!(manifest.output_dir().is_none());
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(HalgenManifest::from_str("[project\nname =").is_err());
    }

    #[test]
    fn template_is_valid_toml() {
        let manifest = HalgenManifest::from_str(&HalgenManifest::template("board")).unwrap();
        assert_eq!(manifest.project.name, "board");
        assert_eq!(manifest.family(), Some("stm32g4"));
        assert_eq!(manifest.declarations(), Some("peripherals.toml"));
        assert_eq!(manifest.output_dir(), Some("generated"));
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "[project]\nname = \"parent\"\n").unwrap();

        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = HalgenManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.project.name, "parent");
        assert_eq!(found_dir, dir.path());
    }
}
