//! Blank data-driven template workbook

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::config::ExcelConfig;
use crate::error::Result;
use crate::fixtures::{ApprovalStage, START_WORKFLOW_KEYS};
use crate::workbook::KEY_VALUE_HEADER;

const KEY_COLUMN_WIDTH: f64 = 26.0;
const VALUE_COLUMN_WIDTH: f64 = 40.0;
const ROW_COLUMN_WIDTH: f64 = 24.0;

/// Write an empty template with every sheet, key and header the workflow
/// reads, named per `excel`.
pub fn write_template(excel: &ExcelConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let start = workbook.add_worksheet();
    start.set_name(excel.sheets.start_workflow.as_str())?;
    start.write_string_with_format(0, 0, KEY_VALUE_HEADER, &header)?;
    start.write_string_with_format(0, 1, "value", &header)?;
    start.set_column_width(0, KEY_COLUMN_WIDTH)?;
    start.set_column_width(1, VALUE_COLUMN_WIDTH)?;
    for (i, key) in START_WORKFLOW_KEYS.iter().enumerate() {
        start.write_string(i as u32 + 1, 0, *key)?;
    }

    let assignees = workbook.add_worksheet();
    assignees.set_name(excel.sheets.assignees.as_str())?;
    for (col, title) in excel.assignees_columns.headers().into_iter().enumerate() {
        assignees.write_string_with_format(0, col as u16, title, &header)?;
        assignees.set_column_width(col as u16, ROW_COLUMN_WIDTH)?;
    }

    let approvals = workbook.add_worksheet();
    approvals.set_name(excel.sheets.approvals.as_str())?;
    for (col, title) in ApprovalStage::all_columns().into_iter().enumerate() {
        approvals.write_string_with_format(0, col as u16, title, &header)?;
        approvals.set_column_width(col as u16, ROW_COLUMN_WIDTH)?;
    }

    workbook.save(path)?;
    info!("Template written to {}", path.display());
    Ok(())
}
