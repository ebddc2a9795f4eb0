//! # semval-cli
//!
//! Command-line interface for semantic document validation.
//!
//! Exit codes: 0 when the document is valid, 1 when validation found
//! problems, 2 for configuration and I/O errors.

mod config;
mod output;
mod structural;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{FileConfig, Overrides};
use semval_schema::{SchemaLoader, SchemaProvider, SchemaView};
use semval_validation::{PluginRegistry, Validator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use structural::JsonSchemaValidationPlugin;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "semval")]
#[command(about = "Semantic validation of schema-described documents")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document against a schema
    Validate {
        /// Schema file path
        #[arg(short, long)]
        schema: PathBuf,

        /// Input document (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the JSON report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Root class of the document; inferred from the schema when omitted
        #[arg(short, long)]
        target_class: Option<String>,

        /// Plugin to run (repeatable); replaces the configured plugin list
        #[arg(short, long = "plugin")]
        plugins: Vec<String>,

        /// Also check the document against this JSON Schema
        #[arg(long)]
        json_schema: Option<String>,

        /// Embed the document in the report
        #[arg(long)]
        include_object: bool,

        /// Run plugins in parallel
        #[arg(long)]
        concurrent: bool,

        /// Maximum inline nesting depth
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// List available plugins
    Plugins,

    /// List the classes of a schema
    Classes {
        /// Schema file path
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::with_builtins();
    registry.register(
        JsonSchemaValidationPlugin::NAME,
        JsonSchemaValidationPlugin::create,
    );
    registry
}

fn load_schema(path: &Path) -> anyhow::Result<SchemaView> {
    SchemaLoader::default()
        .load_view(path)
        .with_context(|| format!("Failed to load schema {}", path.display()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("Error: {err:#}");
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Execute a command; `Ok(false)` means the document was invalid
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    match cli.command {
        Commands::Validate {
            schema,
            input,
            report,
            target_class,
            plugins,
            json_schema,
            include_object,
            concurrent,
            max_depth,
        } => {
            let view = load_schema(&schema)?;
            let target_class = match target_class {
                Some(class) => class,
                None => view
                    .tree_root()
                    .map(str::to_string)
                    .context("No --target-class given and the schema has no unique root class")?,
            };
            tracing::info!(
                "Validating {} against {} as {}",
                input.display(),
                schema.display(),
                target_class
            );

            let (specs, validator_config) = config::resolve(
                file_config,
                Overrides {
                    plugins,
                    json_schema,
                    max_depth,
                    include_object,
                    concurrent,
                },
            );
            let schema: Arc<dyn SchemaProvider> = Arc::new(view);
            let validator = Validator::new(schema, &specs, &registry(), validator_config)
                .context("Invalid validator configuration")?;

            let data = Arc::new(output::read_document(&input)?);
            let result = validator.run(data, &target_class).await?;

            if let Some(path) = report {
                output::write_report(&path, &result)?;
            }
            output::print_summary(&mut std::io::stdout().lock(), &input, &result)?;
            Ok(result.valid)
        }
        Commands::Plugins => {
            for name in registry().names() {
                println!("{name}");
            }
            Ok(true)
        }
        Commands::Classes { schema } => {
            let view = load_schema(&schema)?;
            let root = view.tree_root();
            for class in view.class_names() {
                let mut line = class.to_string();
                if let Some(id) = view.identifier_field(class) {
                    line.push_str(&format!(" (identifier: {id})"));
                }
                if root == Some(class) {
                    line.push_str(" [root]");
                }
                println!("{line}");
            }
            Ok(true)
        }
    }
}
