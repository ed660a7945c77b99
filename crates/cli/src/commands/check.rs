//! Check Command
//!
//! Runs the preflight against the configured workbook and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use caseflow_common::RunConfig;
use caseflow_e2e::{write_report, Preflight, StageResult};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::output::{print_error, print_info, print_list, print_success, print_value, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct CheckArgs {
    /// Directory to write preflight-report.json into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the resolved run plan (secrets redacted)
    #[arg(long)]
    pub plan: bool,
}

/// Stage row for display
#[derive(Serialize)]
pub struct StageDisplay {
    pub stage: String,
    pub status: String,
    pub duration_ms: u64,
    pub detail: String,
}

impl From<&StageResult> for StageDisplay {
    fn from(stage: &StageResult) -> Self {
        Self {
            stage: stage.name.clone(),
            status: if stage.success { "ok" } else { "failed" }.to_string(),
            duration_ms: stage.duration_ms,
            detail: stage
                .error
                .clone()
                .or_else(|| stage.detail.clone())
                .unwrap_or_default(),
        }
    }
}

impl TableDisplay for StageDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Stage", "Status", "Time (ms)", "Detail"]
    }

    fn row(&self) -> Vec<String> {
        let status = if self.status == "ok" {
            "✓ ok".green().to_string()
        } else {
            "✗ failed".red().to_string()
        };
        vec![
            self.stage.clone(),
            status,
            self.duration_ms.to_string(),
            self.detail.clone(),
        ]
    }
}

pub async fn execute(args: CheckArgs, config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = RunConfig::from_env(config_path)
        .with_context(|| format!("Failed to load run config from {}", config_path.display()))?;

    let outcome = Preflight::new(&config).run();
    let report = &outcome.report;

    let rows: Vec<StageDisplay> = report.stages.iter().map(StageDisplay::from).collect();
    print_list(&rows, format);

    if let Some(dir) = &args.output {
        let path = write_report(report, dir)
            .with_context(|| format!("Failed to write report to {}", dir.display()))?;
        print_info(&format!("Report: {}", path.display()));
    }

    match outcome.plan {
        Some(plan) => {
            if args.plan {
                print_value(&plan, format);
            }
            print_success(&format!(
                "Preflight passed for {} ({} ms)",
                report.workbook, report.duration_ms
            ));
            Ok(())
        }
        None => {
            print_error(&format!(
                "Preflight failed: {}",
                report.error.as_deref().unwrap_or("unknown error")
            ));
            std::process::exit(1);
        }
    }
}
