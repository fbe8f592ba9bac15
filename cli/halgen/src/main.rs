//! halgen CLI: resolve STM32 peripheral declarations and generate HAL init code.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::Selection;
use manifest::HalgenManifest;

#[derive(Parser)]
#[command(name = "halgen", version, about = "STM32 HAL peripheral code generator")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new halgen project
    Init {
        /// Project name
        name: String,
    },
    /// Resolve declarations and report conflicts
    Check {
        /// Declaration file, .toml or .json (default: peripherals.toml)
        #[arg(long)]
        input: Option<String>,
        /// Chip family name or .family.toml path
        #[arg(long)]
        family: Option<String>,
    },
    /// Resolve declarations and write generated sources
    Generate {
        /// Declaration file, .toml or .json (default: peripherals.toml)
        #[arg(long)]
        input: Option<String>,
        /// Chip family name or .family.toml path
        #[arg(long)]
        family: Option<String>,
        /// Output directory (default: generated)
        #[arg(long)]
        out: Option<String>,
        /// Output format (c, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print the resolved model
    Inspect {
        /// Declaration file, .toml or .json (default: peripherals.toml)
        #[arg(long)]
        input: Option<String>,
        /// Chip family name or .family.toml path
        #[arg(long)]
        family: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Chip family management
    Family {
        #[command(subcommand)]
        action: FamilyAction,
    },
}

#[derive(Subcommand)]
enum FamilyAction {
    /// List available chip families
    List,
    /// Show details of a chip family
    Describe {
        /// Family name
        name: String,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate a family definition
    Validate {
        /// Family name or .family.toml path
        name: String,
    },
    /// Print a .family.toml template
    Template {
        /// Name for the new family
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Check { input, family } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::check::run(&Selection {
                project_dir: &project_dir,
                manifest: manifest.as_ref(),
                input: input.as_deref(),
                family: family.as_deref(),
            })
        }

        Commands::Generate {
            input,
            family,
            out,
            format,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::generate::run(
                &Selection {
                    project_dir: &project_dir,
                    manifest: manifest.as_ref(),
                    input: input.as_deref(),
                    family: family.as_deref(),
                },
                out.as_deref(),
                format.as_deref(),
            )
        }

        Commands::Inspect {
            input,
            family,
            format,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::inspect::run(
                &Selection {
                    project_dir: &project_dir,
                    manifest: manifest.as_ref(),
                    input: input.as_deref(),
                    family: family.as_deref(),
                },
                format.as_deref(),
            )
        }

        Commands::Family { action } => {
            let (_, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            match action {
                FamilyAction::List => commands::family::list(Some(&project_dir)),
                FamilyAction::Describe { name, format } => {
                    commands::family::describe(&name, Some(&project_dir), format.as_deref())
                }
                FamilyAction::Validate { name } => {
                    commands::family::validate(&name, Some(&project_dir))
                }
                FamilyAction::Template { name } => commands::family::template(&name),
            }
        }
    }
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<HalgenManifest>, Option<PathBuf>)> {
    match HalgenManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
