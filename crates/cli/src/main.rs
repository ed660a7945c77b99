//! Caseflow CLI - Main Entry Point
//!
//! Checks a fixture workbook and the environment before a UI run, and gives
//! quick access to sheets, one-time codes and date-picker labels.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{case_id, check, date, otp, sheet, template};

/// Caseflow CLI - data-driven fixtures for workflow-portal runs
#[derive(Parser)]
#[command(name = "caseflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// App config file (JSON)
    #[arg(
        short,
        long,
        env = "CASEFLOW_CONFIG",
        default_value = "config/app.config.json",
        global = true
    )]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every fixture and secret a run needs
    Check(check::CheckArgs),

    /// Print one sheet of the workbook
    Sheet(sheet::SheetArgs),

    /// Print the current one-time code
    Otp(otp::OtpArgs),

    /// Convert a date value to its date-picker label
    DateLabel(date::DateLabelArgs),

    /// Extract a case id from confirmation text
    CaseId(case_id::CaseIdArgs),

    /// Write an empty fixture workbook
    Template(template::TemplateArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => check::execute(args, &cli.config, cli.format).await?,
        Commands::Sheet(args) => sheet::execute(args, &cli.config, cli.format).await?,
        Commands::Otp(args) => otp::execute(args, cli.format).await?,
        Commands::DateLabel(args) => date::execute(args, cli.format).await?,
        Commands::CaseId(args) => case_id::execute(args, cli.format).await?,
        Commands::Template(args) => template::execute(args, &cli.config).await?,
        Commands::Version => {
            println!("Caseflow CLI v{}", caseflow_common::VERSION);
            println!("Data-driven fixtures for workflow-portal end-to-end runs");
        }
    }

    Ok(())
}
