//! Fixture workbooks for integration tests

#![allow(dead_code)]

use std::path::Path;

use caseflow_common::config::{AppConfig, ExcelConfig, UrlsConfig};
use caseflow_common::fixtures::{ApprovalStage, START_WORKFLOW_KEYS};
use caseflow_common::{RunConfig, Secrets};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

pub const TOTP_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(u16, u8, u8),
    Blank,
}

pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

#[derive(Debug, Clone)]
pub struct SheetFixture {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetFixture {
    pub fn new(name: &str, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }

    /// Replace the value next to `key` in a key/value sheet.
    pub fn set_value(&mut self, key: &str, value: Cell) {
        for row in &mut self.rows {
            if row.first() == Some(&text(key)) {
                row[1] = value;
                return;
            }
        }
        panic!("key {key} not in sheet {}", self.name);
    }

    /// Drop the row whose first cell is `key`.
    pub fn remove_key(&mut self, key: &str) {
        self.rows.retain(|row| row.first() != Some(&text(key)));
    }

    /// Replace a cell of a row-object sheet by data row index and header.
    pub fn set_field(&mut self, row: usize, header: &str, value: Cell) {
        let col = self.rows[0]
            .iter()
            .position(|c| c == &text(header))
            .unwrap_or_else(|| panic!("header {header} not in sheet {}", self.name));
        self.rows[row + 1][col] = value;
    }
}

pub fn write_book(path: &Path, sheets: &[SheetFixture]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for spec in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(spec.name.as_str()).unwrap();

        for (r, row) in spec.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Text(s) => {
                        sheet.write_string(r, c, s.as_str()).unwrap();
                    }
                    Cell::Number(n) => {
                        sheet.write_number(r, c, *n).unwrap();
                    }
                    Cell::Date(y, m, d) => {
                        let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                        sheet.write_datetime_with_format(r, c, &date, &date_format).unwrap();
                    }
                    Cell::Blank => {}
                }
            }
        }
    }

    workbook.save(path).unwrap();
}

pub fn start_workflow_sheet() -> SheetFixture {
    let mut rows = vec![vec![text("field"), text("value")]];
    for key in START_WORKFLOW_KEYS {
        let value = match *key {
            "itemIndex" => text("10"),
            "quantity" => Cell::Number(5.0),
            "dateISO" => Cell::Date(2023, 8, 14),
            "uploadFilePath" => text("test-data/evidence.pdf"),
            other => Cell::Text(format!("{other} value")),
        };
        rows.push(vec![text(key), value]);
    }
    SheetFixture::new("StartWorkflow", rows)
}

pub fn assignees_sheet() -> SheetFixture {
    let header = vec![
        text("searchText"),
        text("displayText"),
        text("emailIfAny"),
        text("password"),
    ];
    let people = [
        ("jdoe", "Doe, Jane", "jane@example.com", ""),
        ("rroe", "Roe, Rick", "", "row-pass"),
        ("ppoe", "Poe, Pat", "", ""),
        ("mmoe", "Moe, Max", "", ""),
        ("", "Quality Team", "", ""),
    ];

    let mut rows = vec![header];
    for (search, display, email, password) in people {
        rows.push(
            [search, display, email, password]
                .iter()
                .map(|v| if v.is_empty() { Cell::Blank } else { text(v) })
                .collect(),
        );
    }
    SheetFixture::new("Assignees", rows)
}

pub fn approvals_sheet() -> SheetFixture {
    let columns = ApprovalStage::all_columns();
    let mut rows = vec![columns.iter().map(|c| text(c)).collect::<Vec<_>>()];
    for approver in 1..=3 {
        rows.push(
            columns
                .iter()
                .map(|c| Cell::Text(format!("{c} #{approver}")))
                .collect(),
        );
    }
    SheetFixture::new("Approvals", rows)
}

pub fn complete_book() -> Vec<SheetFixture> {
    vec![start_workflow_sheet(), assignees_sheet(), approvals_sheet()]
}

pub fn secrets(extra: &[(&str, &str)]) -> Secrets {
    let mut vars = vec![
        ("LOGIN_USER".to_string(), "creator@example.com".to_string()),
        ("LOGIN_PASS".to_string(), "creator-pass".to_string()),
        ("TOTP_SECRET".to_string(), TOTP_SECRET.to_string()),
    ];
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Secrets::from_vars(vars).unwrap()
}

pub fn run_config(workbook: &Path, secrets: Secrets) -> RunConfig {
    RunConfig {
        app: AppConfig {
            excel: ExcelConfig {
                path: workbook.to_path_buf(),
                ..Default::default()
            },
            urls: UrlsConfig {
                login_start: "https://portal.example.test/login".to_string(),
                portal_root: "https://portal.example.test/prweb".to_string(),
            },
        },
        secrets,
    }
}
