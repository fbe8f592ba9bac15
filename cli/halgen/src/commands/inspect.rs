//! `halgen inspect`: print the resolved model.

use anyhow::{bail, Result};
use halgen_resolve::{resolve_or_report, ResolvedModel};

use super::Selection;

/// How `inspect` renders the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Text,
    Json,
}

impl View {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(View::Text),
            "json" => Ok(View::Json),
            _ => bail!("unknown inspect format: '{s}'. Available formats: text, json"),
        }
    }
}

pub fn run(selection: &Selection<'_>, format: Option<&str>) -> Result<()> {
    let view = View::parse(format.unwrap_or("text"))?;
    let (set, family) = selection.load()?;

    match resolve_or_report(&set.peripherals, &family) {
        Ok(model) => {
            print!("{}", render(&model, view)?);
            Ok(())
        }
        Err(report) => {
            match view {
                View::Text => print!("{report}"),
                View::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            bail!("{} resolution error(s)", report.errors.len())
        }
    }
}

fn render(model: &ResolvedModel, view: View) -> Result<String> {
    Ok(match view {
        View::Text => model.to_string(),
        View::Json => serde_json::to_string_pretty(model)? + "\n",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::BOARD;
    use halgen_core::DeclarationSet;
    use halgen_targets::ChipFamily;

    fn model() -> ResolvedModel {
        let set = DeclarationSet::from_toml(BOARD).unwrap();
        halgen_resolve::resolve(&set.peripherals, &ChipFamily::stm32g4()).unwrap()
    }

    #[test]
    fn text_view_lists_declarations() {
        let text = render(&model(), View::Text).unwrap();
        assert!(text.starts_with("=== Resolved model (stm32g4) ==="));
        assert!(text.contains("UART1"));
        assert!(text.contains("I2C1"));
    }

    #[test]
    fn json_view_is_the_serialized_model() {
        let text = render(&model(), View::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["family"], "stm32g4");
        assert_eq!(value["declarations"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn unknown_view_is_rejected() {
        assert!(View::parse("yaml").is_err());
    }
}
