//! Emitters for the halgen code generator.
//!
//! A [`ResolvedModel`](halgen_resolve::ResolvedModel) is fed through [`walk`]
//! to an [`EmitSink`]. Two sinks ship with the crate:
//! - [`ContextSink`]: a JSON render context for external template engines
//! - [`CSourceSink`]: STM32 HAL C sources (`gpio`, `uart`, `i2c`)

pub mod c;
pub mod context;
pub mod error;
pub mod sink;

use halgen_resolve::ResolvedModel;

pub use c::{emit_c, CSourceSink, GeneratedFile};
pub use context::{render_context, ContextSink};
pub use error::{EmitError, Result};
pub use sink::{walk, EmitSink, ModelHeader};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    C,
    Json,
}

impl OutputFormat {
    /// Parse a format name.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "c" | "C" => Ok(OutputFormat::C),
            "json" => Ok(OutputFormat::Json),
            _ => Err(EmitError::UnknownFormat { name: s.to_string() }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::C => "c",
            OutputFormat::Json => "json",
        }
    }
}

/// Render a model in the given format as a list of files.
///
/// JSON output is a single `context.json`.
pub fn emit(model: &ResolvedModel, format: OutputFormat) -> Result<Vec<GeneratedFile>> {
    match format {
        OutputFormat::C => emit_c(model),
        OutputFormat::Json => {
            let context = render_context(model)?;
            Ok(vec![GeneratedFile {
                path: "context.json".into(),
                contents: serde_json::to_string_pretty(&context)? + "\n",
            }])
        }
    }
}
