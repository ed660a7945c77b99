//! Template Command
//!
//! Writes an empty fixture workbook laid out for the configured sheets and
//! columns.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use caseflow_common::config::{AppConfig, ExcelConfig};
use caseflow_common::template::write_template;
use clap::Args;

use crate::output::{print_success, print_warning};

#[derive(Args)]
pub struct TemplateArgs {
    /// Where to write the workbook
    #[arg(short, long)]
    pub out: PathBuf,
}

pub async fn execute(args: TemplateArgs, config_path: &Path) -> Result<()> {
    let excel = if config_path.exists() {
        AppConfig::load(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
            .excel
    } else {
        print_warning(&format!(
            "{} not found, using default sheet and column names",
            config_path.display()
        ));
        ExcelConfig::default()
    };

    write_template(&excel, &args.out)
        .with_context(|| format!("Failed to write template to {}", args.out.display()))?;

    print_success(&format!("Template written to {}", args.out.display()));
    Ok(())
}
