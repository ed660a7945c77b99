//! Sheet Command
//!
//! Prints one sheet the way the fixtures see it.

use std::path::Path;

use anyhow::{Context, Result};
use caseflow_common::config::AppConfig;
use caseflow_common::Workbook;
use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::output::{print_grid, print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct SheetArgs {
    /// Sheet name (case-insensitive)
    pub name: String,

    /// Read as header-keyed rows instead of key/value pairs
    #[arg(short, long)]
    pub rows: bool,
}

/// Key/value entry for display
#[derive(Serialize)]
pub struct EntryDisplay {
    pub key: String,
    pub value: String,
}

impl TableDisplay for EntryDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Key", "Value"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.key.clone(), self.value.clone()]
    }
}

pub async fn execute(args: SheetArgs, config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = AppConfig::load(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let excel = &config.excel;

    let mut workbook = Workbook::open(&excel.path)
        .with_context(|| format!("Failed to open workbook {}", excel.path.display()))?
        .with_sheet_match(excel.sheet_match());

    if args.rows {
        let sheet = workbook
            .row_sheet(&args.name)
            .with_context(|| format!("Failed to read sheet \"{}\"", args.name))?;
        debug!("{} header(s) in \"{}\"", sheet.headers.len(), sheet.name);

        let grid: Vec<Vec<String>> = sheet
            .rows
            .iter()
            .map(|record| {
                sheet
                    .headers
                    .iter()
                    .map(|h| record.get(h).map(|v| v.to_text()).unwrap_or_default())
                    .collect()
            })
            .collect();
        print_grid(&sheet.headers, &grid, &sheet.rows, format);
    } else {
        let sheet = workbook
            .key_value_sheet(&args.name)
            .with_context(|| format!("Failed to read sheet \"{}\"", args.name))?;

        let mut entries: Vec<EntryDisplay> = sheet
            .entries
            .iter()
            .map(|(key, value)| EntryDisplay {
                key: key.clone(),
                value: value.to_text(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        print_list(&entries, format);
    }

    Ok(())
}
