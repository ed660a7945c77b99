//! Case Id Command

use anyhow::Result;
use caseflow_common::case_id::{extract_case_id, is_case_id};
use clap::Args;
use serde::Serialize;

use crate::output::{print_item, print_warning, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct CaseIdArgs {
    /// Confirmation text, e.g. "Case created (APW-1234)"
    pub text: String,
}

#[derive(Serialize)]
pub struct CaseIdDisplay {
    pub case_id: String,
    pub valid: bool,
}

impl TableDisplay for CaseIdDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Case Id", "Valid"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.case_id.clone(), self.valid.to_string()]
    }
}

pub async fn execute(args: CaseIdArgs, format: OutputFormat) -> Result<()> {
    let case_id = extract_case_id(&args.text);
    let valid = is_case_id(&case_id);

    print_item(&CaseIdDisplay { case_id, valid }, format);
    if !valid {
        print_warning("Text does not contain an APW-<number> case id");
    }

    Ok(())
}
