//! tidydown - Clean up a Downloads folder.
//!
//! Usage:
//!   tidydown             Purge executables, dedupe and sort ~/Downloads
//!   tidydown --json      Same, printing the run summary as JSON
//!   tidydown --help      Show help

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use tidydown_core::CleanupConfig;
use tidydown_ops::{Cleaner, RunSummary};

#[derive(Parser)]
#[command(
    name = "tidydown",
    version,
    about = "Clean up your Downloads folder",
    long_about = "tidydown deletes executables from ~/Downloads, removes duplicate files \
                  (keeping the most recently modified copy) and moves everything else \
                  into ~/Images, ~/Documents, ~/Videos, ~/Music, ~/Archives or ~/Others."
)]
struct Cli {
    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = CleanupConfig::from_home_dir().context("Could not locate the home directory")?;
    let summary = Cleaner::new(config).run().context("Cleanup aborted")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Print a short human-readable report.
fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "─".repeat(60));
    println!(" {}", summary.source.display());
    println!("{}", "─".repeat(60));

    for step in summary.steps() {
        println!(" {}", step.summary());
    }
    if summary.duplicate_groups > 0 {
        println!(" {} duplicate group(s) found", summary.duplicate_groups);
    }
    println!(" Freed {}", format_size(summary.bytes_freed()));

    let failures = summary.total_failed();
    if failures > 0 {
        println!();
        println!(" {failures} file(s) could not be processed:");
        for error in summary.errors() {
            println!("   {error}");
        }
    }
    println!();
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
