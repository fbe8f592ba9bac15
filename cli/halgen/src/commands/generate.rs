//! `halgen generate`: resolve and write sources.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use halgen_emit::{emit, OutputFormat};
use halgen_resolve::resolve_or_report;
use tracing::info;

use super::Selection;

const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Resolve the selected inputs and emit files under the output directory.
///
/// Nothing is written when resolution fails.
pub fn run(selection: &Selection<'_>, out: Option<&str>, format: Option<&str>) -> Result<()> {
    let format = OutputFormat::parse(format.unwrap_or("c"))?;
    let out_dir = output_dir(selection, out);

    let (set, family) = selection.load()?;
    let model = match resolve_or_report(&set.peripherals, &family) {
        Ok(model) => model,
        Err(report) => {
            print!("{report}");
            bail!("{} resolution error(s); nothing generated", report.errors.len())
        }
    };

    let files = emit(&model, format).context("rendering output")?;
    for file in &files {
        let written = file
            .write_under(&out_dir)
            .with_context(|| format!("writing {}", out_dir.join(&file.path).display()))?;
        println!("  wrote {}", written.display());
    }
    info!(files = files.len(), format = format.name(), "generation finished");
    println!(
        "Generated {} file(s) for {} into {}",
        files.len(),
        model.family(),
        out_dir.display()
    );
    Ok(())
}

fn output_dir(selection: &Selection<'_>, out: Option<&str>) -> PathBuf {
    match out {
        Some(dir) => PathBuf::from(dir),
        None => selection.project_dir.join(
            selection
                .manifest
                .and_then(|m| m.output_dir())
                .unwrap_or(DEFAULT_OUTPUT_DIR),
        ),
    }
}
