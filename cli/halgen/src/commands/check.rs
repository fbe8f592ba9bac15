//! `halgen check`: resolve declarations and report problems.

use anyhow::{bail, Result};
use halgen_resolve::resolve_or_report;

use super::Selection;

/// Resolve the selected inputs, printing the model summary or every error.
pub fn run(selection: &Selection<'_>) -> Result<()> {
    let (set, family) = selection.load()?;
    match resolve_or_report(&set.peripherals, &family) {
        Ok(model) => {
            print!("{model}");
            println!();
            println!(
                "OK: {} declaration(s) resolved for {}",
                model.declarations().len(),
                model.family()
            );
            Ok(())
        }
        Err(report) => {
            print!("{report}");
            bail!("{} resolution error(s)", report.errors.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{BOARD, CONFLICTING};

    fn check(declarations: &str) -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("hw.toml");
        std::fs::write(&input, declarations).unwrap();
        let input = input.to_str().unwrap().to_string();
        run(&Selection {
            project_dir: dir.path(),
            manifest: None,
            input: Some(&input),
            family: Some("stm32g4"),
        })
    }

    #[test]
    fn clean_board_passes() {
        check(BOARD).unwrap();
    }

    #[test]
    fn conflicts_fail() {
        let err = check(CONFLICTING).unwrap_err();
        assert_eq!(err.to_string(), "1 resolution error(s)");
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&Selection {
            project_dir: dir.path(),
            manifest: None,
            input: None,
            family: Some("stm32g4"),
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("peripherals.toml"));
    }
}
