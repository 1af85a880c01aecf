//! CLI for the namespacify tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use namespacify::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "namespacify")]
#[command(author, version, about = "Consolidates flat-named model classes into namespace files", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one namespace file per model directory and rewrite references
    Consolidate {
        /// Directory whose immediate subdirectories are root namespaces
        #[arg(short, long)]
        models: PathBuf,

        /// Directory for the generated namespace files
        #[arg(short, long)]
        out: PathBuf,

        /// Only process these subdirectory names (default: all)
        #[arg(long = "model")]
        model: Vec<String>,

        /// Source tree whose imports and usages get rewritten
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Preview changes without writing
        #[arg(long)]
        dry_run: bool,

        /// Write the flat-to-qualified rename table as JSON
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Print the flat-to-qualified rename table as JSON
    Mapping {
        /// Directory whose immediate subdirectories are root namespaces
        #[arg(short, long)]
        models: PathBuf,

        /// Directory the namespace files would be generated into
        #[arg(short, long)]
        out: PathBuf,

        /// Only process these subdirectory names (default: all)
        #[arg(long = "model")]
        model: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Consolidate {
            models,
            out,
            model,
            source,
            dry_run,
            manifest,
        } => cmd_consolidate(models, out, model, source, dry_run, manifest),
        Commands::Mapping { models, out, model } => cmd_mapping(models, out, model),
    }
}

fn allow_list(model: Vec<String>) -> Option<Vec<String>> {
    if model.is_empty() || model.iter().any(|m| m == "all") {
        None
    } else {
        Some(model)
    }
}

fn cmd_consolidate(
    models: PathBuf,
    out: PathBuf,
    model: Vec<String>,
    source: Option<PathBuf>,
    dry_run: bool,
    manifest: Option<PathBuf>,
) -> Result<()> {
    let allow = allow_list(model);
    let mut stream = FileStream::default();

    if dry_run {
        let outputs = stream
            .consolidate(&models, &out, allow.as_deref())
            .context("Consolidation failed")?;
        for output in &outputs {
            println!("Would write {}", output.path.display());
        }
        if let Some(ref source) = source {
            let changes = stream
                .plan_reference_updates(source)
                .context("Reference scan failed")?;
            for change in changes.iter().filter(|c| c.is_modified()) {
                println!("{}", colorized_diff(change));
            }
            println!("\n{}", DiffSummary::from_changes(&changes));
        }
    } else {
        let written = stream
            .save_to_file(&models, &out, allow.as_deref())
            .context("Consolidation failed")?;
        println!("Wrote {} namespace file(s)", written.len());

        if let Some(ref source) = source {
            let modified = stream
                .update_references(source)
                .context("Reference rewrite failed")?;
            println!("Rewrote references in {} file(s)", modified);
        }
    }

    if let Some(path) = manifest {
        stream
            .write_manifest(&path)
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;
        println!("Wrote manifest {}", path.display());
    }

    Ok(())
}

fn cmd_mapping(models: PathBuf, out: PathBuf, model: Vec<String>) -> Result<()> {
    let allow = allow_list(model);
    let mut stream = FileStream::default();
    stream
        .consolidate(&models, &out, allow.as_deref())
        .context("Consolidation failed")?;
    println!("{}", stream.mapping_json()?);
    Ok(())
}
