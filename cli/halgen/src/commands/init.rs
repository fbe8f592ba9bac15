//! `halgen init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{HalgenManifest, MANIFEST_FILE};

const EXAMPLE_DECLARATIONS: &str = r#"# Peripheral declarations. Each [[peripheral]] claims pins and picks a
# transfer mode: "polling", "interrupt" or "dma".

[[peripheral]]
instance = "UART1"
kind = "uart"
transfer-mode = "polling"
baud-rate = 115200
pins = [
    { pin = "PA9", role = "tx" },
    { pin = "PA10", role = "rx" },
]
"#;

/// Create a new halgen project in a directory called `name`.
pub fn run(name: &str) -> Result<()> {
    create_project(Path::new(name), name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir.join("families")).context("creating families/ directory")?;

    fs::write(project_dir.join(MANIFEST_FILE), HalgenManifest::template(name))
        .context("writing halgen.toml")?;
    fs::write(project_dir.join("peripherals.toml"), EXAMPLE_DECLARATIONS)
        .context("writing peripherals.toml")?;
    fs::write(project_dir.join(".gitignore"), "generated/\n").context("writing .gitignore")?;

    println!("Created project '{name}'");
    println!("  {name}/halgen.toml");
    println!("  {name}/peripherals.toml");
    println!("  {name}/families/");
    println!("  {name}/.gitignore");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use halgen_core::DeclarationSet;

    #[test]
    fn init_creates_project_structure() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("board");

        create_project(&project_path, "board").unwrap();

        assert!(project_path.join("halgen.toml").is_file());
        assert!(project_path.join("peripherals.toml").is_file());
        assert!(project_path.join("families").is_dir());
        assert!(project_path.join(".gitignore").is_file());
    }

    #[test]
    fn example_declarations_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("board");
        create_project(&project_path, "board").unwrap();

        let set = DeclarationSet::load(&project_path.join("peripherals.toml")).unwrap();
        let model =
            halgen_resolve::resolve(&set.peripherals, &halgen_targets::ChipFamily::stm32g4()).unwrap();
        assert_eq!(model.declarations().len(), 1);
    }

    #[test]
    fn init_refuses_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("existing");
        fs::create_dir(&project_path).unwrap();

        let err = create_project(&project_path, "existing").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
