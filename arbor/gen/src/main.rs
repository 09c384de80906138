//! Arbor Code Generator
//!
//! Generates Rust client crates, or client plans, from service models.

use std::path::{Path, PathBuf};

use arbor_define::Model;
use arbor_definitions::{MODEL_NAMES, model_by_name};
use arbor_gen::cargo_gen::write_cargo_toml;
use arbor_gen::errors::GeneratorError;
use arbor_gen::output::{EmitKind, generate_and_write};
use clap::Parser;
use colored::Colorize;
use tracing::Level;

/// Arbor code generator - transforms service models into typed Rust clients
#[derive(Parser, Debug)]
#[command(name = "arbor-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model file to load (.json, .yaml or .yml)
    #[arg(short, long, conflicts_with = "api")]
    model: Option<PathBuf>,

    /// Bundled model to generate code for (e.g., "library")
    #[arg(short, long)]
    api: Option<String>,

    /// Output directory for generated code
    #[arg(short, long, default_value = "client/src")]
    output: PathBuf,

    /// Package name of the generated crate
    #[arg(long, default_value = "arbor-client")]
    crate_name: String,

    /// Path to the arbor runtime, relative to the generated crate
    #[arg(long)]
    runtime_path: Option<String>,

    /// What to emit
    #[arg(long, default_value_t = EmitKind::Rust)]
    emit: EmitKind,

    /// Print generated output without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_model(cli: &Cli) -> Result<Model, GeneratorError> {
    match (&cli.model, &cli.api) {
        (Some(path), _) => Ok(Model::load(path)?),
        (None, Some(name)) => model_by_name(name).ok_or_else(|| {
            GeneratorError::ConfigError(format!(
                "Unknown API: '{}'. Available APIs: {}",
                name,
                MODEL_NAMES.join(", ")
            ))
        }),
        (None, None) => Err(GeneratorError::ConfigError(
            "Either --model or --api must be given".to_string(),
        )),
    }
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let model = load_model(&cli)?;
    tracing::info!(model = %model.name, services = model.services.len(), "Loaded model");

    generate_and_write(&model, &cli.output, cli.emit, cli.dry_run)?;

    if cli.emit == EmitKind::Rust {
        // The output directory points to src/; the manifest goes one level up
        let crate_dir = cli.output.parent().unwrap_or(Path::new("."));
        write_cargo_toml(crate_dir, &cli.crate_name, cli.runtime_path.as_deref(), cli.dry_run)?;
    }

    if !cli.dry_run {
        eprintln!(
            "{} {} client to {}",
            "Generated".green().bold(),
            model.name,
            cli.output.join(cli.emit.file_name()).display()
        );
    }

    Ok(())
}
