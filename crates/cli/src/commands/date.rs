//! Date Label Command

use anyhow::{Context, Result};
use caseflow_common::date_label;
use caseflow_common::CellValue;
use clap::Args;
use serde::Serialize;

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct DateLabelArgs {
    /// Serial day number (e.g. 45152) or date string (e.g. 2023-08-14)
    pub value: String,
}

#[derive(Serialize)]
pub struct DateLabelDisplay {
    pub input: String,
    pub date: String,
    pub label: String,
}

impl TableDisplay for DateLabelDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Input", "Date", "Label"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.input.clone(), self.date.clone(), self.label.clone()]
    }
}

/// Numbers are serial days, like a numeric cell; anything else is a string cell.
fn parse_input(value: &str) -> CellValue {
    match value.trim().parse::<f64>() {
        Ok(n) => CellValue::Number(n),
        Err(_) => CellValue::from(value),
    }
}

pub async fn execute(args: DateLabelArgs, format: OutputFormat) -> Result<()> {
    let cell = parse_input(&args.value);
    let date = date_label::to_date(&cell)
        .with_context(|| format!("Cannot convert \"{}\" to a date", args.value))?;

    let display = DateLabelDisplay {
        input: args.value,
        date: date.format("%Y-%m-%d").to_string(),
        label: date_label::format_label(&date),
    };
    print_item(&display, format);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_input_is_serial() {
        assert_eq!(parse_input("45152"), CellValue::Number(45152.0));
        assert_eq!(parse_input("2023-08-14"), CellValue::from("2023-08-14"));
    }
}
