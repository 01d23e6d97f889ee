//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::passes::{run_pipeline, PassRun, RunSummary};
use crate::domain::Pass;
use crate::storage::Catalog;

#[derive(Parser)]
#[command(name = "catalog-tidy")]
#[command(author, version, about = "Normalize connector catalog component definitions")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Catalog root containing `.connect/` (discovered from the current directory by default)
    #[arg(long, global = true, env = "CATALOG_TIDY_ROOT")]
    pub root: Option<PathBuf>,

    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Report files that would change without writing anything
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Make `model_version` the first key of every definition
    StampVersion,

    /// Rewrite every `description` as a cleaned literal block
    FormatDescriptions,

    /// Put definition and field keys in canonical order
    SortFields {
        /// Write sorted definitions under this directory instead of in place
        #[arg(long)]
        target: Option<PathBuf>,
    },

    /// Run stamp-version, format-descriptions and sort-fields in order
    All,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let catalog = match &cli.root {
        Some(root) => Catalog::open(root.clone())?,
        None => Catalog::discover()?,
    };

    let format = cli.format.unwrap_or(catalog.config().global.default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose_ctx("catalog", &format!("Using catalog at: {}", catalog.root().display()));
    output.verbose_ctx("catalog", &format!("Components: {}", catalog.components().join(", ")));

    let summary = match cli.command {
        Commands::StampVersion => run_single(&catalog, Pass::StampVersion, None, cli.dry_run, &output)?,
        Commands::FormatDescriptions => {
            run_single(&catalog, Pass::FormatDescriptions, None, cli.dry_run, &output)?
        }
        Commands::SortFields { target } => {
            if let Some(target) = &target {
                output.verbose_ctx("sort_fields", &format!("Writing to: {}", target.display()));
            }
            run_single(&catalog, Pass::SortFields, target.as_deref(), cli.dry_run, &output)?
        }
        Commands::All => run_pipeline(&catalog, Pass::all(), cli.dry_run, &output)?,
    };

    report_summary(&output, &summary, cli.dry_run);

    output.verbose("Command completed successfully");
    Ok(())
}

fn run_single(
    catalog: &Catalog,
    pass: Pass,
    target: Option<&std::path::Path>,
    dry_run: bool,
    output: &Output,
) -> Result<RunSummary> {
    let run = PassRun {
        pass,
        model_version: catalog.model_version(),
        dry_run,
    };
    run.run_catalog(catalog, target, output)
}

fn report_summary(output: &Output, summary: &RunSummary, dry_run: bool) {
    if output.is_json() {
        output.event(&serde_json::json!({
            "event": "summary",
            "dry_run": dry_run,
            "summary": summary,
        }));
        return;
    }

    let verb = if dry_run { "would change" } else { "written" };
    output.blank();
    output.line(&format!(
        "Done: {} files, {} {}, {} directories skipped",
        summary.files, summary.changed, verb, summary.skipped
    ));
}
