//! Workbook loader
//!
//! Reads a spreadsheet into one of two lookup shapes:
//!
//! - [`KeyValueSheet`]: column A is the key, column B the raw value. An optional
//!   `field` header row is skipped.
//! - [`RowSheet`]: row 0 holds headers, every following row becomes a
//!   [`RowRecord`] keyed by those headers.
//!
//! Each `load_*` call opens the file again; nothing is cached between calls.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use tracing::{debug, warn};

use crate::accessor;
use crate::cell::CellValue;
use crate::error::{Error, Result};

/// Header literal that marks row 0 of a key/value sheet as a header row.
pub const KEY_VALUE_HEADER: &str = "field";

/// Name given to blank header cells, numbered from the second one on.
const EMPTY_HEADER: &str = "__EMPTY";

/// Mapping from a key/value sheet's keys to their raw values.
pub type KeyValueMap = HashMap<String, CellValue>;

/// One data row of a row-object sheet, keyed by header.
pub type RowRecord = HashMap<String, CellValue>;

/// How a requested sheet name is matched against the workbook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetMatch {
    /// Case-insensitive match, falling back to the first sheet.
    #[default]
    Lenient,
    /// Case-insensitive match, no fallback.
    Strict,
}

/// A loaded key/value sheet.
#[derive(Debug, Clone, Default)]
pub struct KeyValueSheet {
    pub name: String,
    pub entries: KeyValueMap,
}

impl KeyValueSheet {
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.entries.get(key)
    }

    /// Strict lookup; the error carries the sheet name.
    pub fn require(&self, key: &str) -> Result<String> {
        accessor::require_key_value(&self.entries, key).map_err(|e| e.in_sheet(&self.name))
    }

    /// Strict presence check returning the raw cell, for values that are not
    /// plain text (dates).
    pub fn require_raw(&self, key: &str) -> Result<&CellValue> {
        match self.entries.get(key) {
            Some(value) if !value.is_blank() => Ok(value),
            _ => Err(Error::MissingField {
                key: key.to_string(),
            }
            .in_sheet(&self.name)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A loaded row-object sheet.
#[derive(Debug, Clone, Default)]
pub struct RowSheet {
    pub name: String,
    /// Normalized headers in column order.
    pub headers: Vec<String>,
    pub rows: Vec<RowRecord>,
}

impl RowSheet {
    /// Strict lookup; the error carries the sheet name.
    pub fn require_field(&self, row: usize, column: &str) -> Result<String> {
        accessor::require_row_field(&self.rows, row, column).map_err(|e| e.in_sheet(&self.name))
    }

    pub fn field_or_empty(&self, row: usize, column: &str) -> String {
        accessor::row_field_or_empty(&self.rows, row, column)
    }

    pub fn row(&self, index: usize) -> Option<&RowRecord> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An open, read-only workbook.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
    sheet_match: SheetMatch,
}

impl Workbook {
    /// Open a workbook; the format is picked from the file extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = absolute(path.as_ref())?;
        if !path.exists() {
            return Err(Error::NotFound(path));
        }

        debug!("Opening workbook {}", path.display());
        let sheets = open_workbook_auto(&path)?;

        Ok(Self {
            path,
            sheets,
            sheet_match: SheetMatch::default(),
        })
    }

    pub fn with_sheet_match(mut self, sheet_match: SheetMatch) -> Self {
        self.sheet_match = sheet_match;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Resolve a requested sheet name to an actual one.
    pub fn resolve_sheet(&self, wanted: &str) -> Result<String> {
        let names = self.sheet_names();
        let name = pick_sheet(&names, wanted, self.sheet_match).ok_or_else(|| {
            Error::SheetNotFound {
                path: self.path.clone(),
                sheet: wanted.to_string(),
            }
        })?;

        if !same_sheet_name(name, wanted) {
            warn!(
                "Sheet \"{}\" not found in {}, using first sheet \"{}\"",
                wanted,
                self.path.display(),
                name
            );
        }
        Ok(name.clone())
    }

    /// Read a sheet as key/value pairs.
    pub fn key_value_sheet(&mut self, wanted: &str) -> Result<KeyValueSheet> {
        let name = self.resolve_sheet(wanted)?;
        let range = self.sheets.worksheet_range(&name)?;
        let entries = key_values(&name, &range);

        debug!("Loaded {} key(s) from sheet \"{}\"", entries.len(), name);
        Ok(KeyValueSheet { name, entries })
    }

    /// Read a sheet as header-keyed records.
    pub fn row_sheet(&mut self, wanted: &str) -> Result<RowSheet> {
        let name = self.resolve_sheet(wanted)?;
        let range = self.sheets.worksheet_range(&name)?;
        let (headers, rows) = row_objects(&range);

        debug!("Loaded {} row(s) from sheet \"{}\"", rows.len(), name);
        Ok(RowSheet {
            name,
            headers,
            rows,
        })
    }
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("path", &self.path)
            .field("sheet_match", &self.sheet_match)
            .finish()
    }
}

/// Open `path` and read `sheet_name` as a key/value map.
pub fn load_key_value_sheet(path: impl AsRef<Path>, sheet_name: &str) -> Result<KeyValueMap> {
    Ok(Workbook::open(path)?.key_value_sheet(sheet_name)?.entries)
}

/// Open `path` and read `sheet_name` as header-keyed records, in row order.
pub fn load_row_objects(path: impl AsRef<Path>, sheet_name: &str) -> Result<Vec<RowRecord>> {
    Ok(Workbook::open(path)?.row_sheet(sheet_name)?.rows)
}

fn same_sheet_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// The sheet `wanted` resolves to among `names`: a case-insensitive match,
/// else the first sheet when lenient. `None` when nothing qualifies.
fn pick_sheet<'a>(names: &'a [String], wanted: &str, sheet_match: SheetMatch) -> Option<&'a String> {
    names
        .iter()
        .find(|n| same_sheet_name(n, wanted))
        .or_else(|| match sheet_match {
            SheetMatch::Lenient => names.first(),
            SheetMatch::Strict => None,
        })
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn key_values(sheet: &str, range: &Range<Data>) -> KeyValueMap {
    let mut rows = range.rows().peekable();

    if let Some(first) = rows.peek() {
        let head = first.first().map(CellValue::from).unwrap_or_default();
        if head.to_text().eq_ignore_ascii_case(KEY_VALUE_HEADER) {
            rows.next();
        }
    }

    let mut map = KeyValueMap::new();
    for row in rows {
        let key = row
            .first()
            .map(|c| CellValue::from(c).to_text().trim().to_string())
            .unwrap_or_default();
        if key.is_empty() {
            continue;
        }

        let value = row.get(1).map(CellValue::from).unwrap_or_default();
        if map.insert(key.clone(), value).is_some() {
            warn!("Duplicate key \"{}\" in sheet \"{}\", keeping the later value", key, sheet);
        }
    }

    map
}

fn row_objects(range: &Range<Data>) -> (Vec<String>, Vec<RowRecord>) {
    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(header_row) => normalize_headers(header_row),
        None => return (Vec::new(), Vec::new()),
    };

    let records: Vec<RowRecord> = rows
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(col, header)| {
                    let value = match row.get(col).map(CellValue::from) {
                        Some(CellValue::Empty) | None => CellValue::String(String::new()),
                        Some(v) => v,
                    };
                    (header.clone(), value)
                })
                .collect::<RowRecord>()
        })
        .collect();

    (headers, records)
}

/// Blank headers become `__EMPTY`, `__EMPTY_1`, ...; repeats get `_1`, `_2`, ...
fn normalize_headers(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(row.len());

    for cell in row {
        let text = CellValue::from(cell).to_text();
        let base = if text.trim().is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            text
        };

        let count = seen.entry(base.clone()).or_insert(0);
        let header = if *count == 0 {
            base
        } else {
            format!("{}_{}", base, count)
        };
        *count += 1;
        headers.push(header);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height.saturating_sub(1), width.saturating_sub(1)));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_key_values_skip_field_header() {
        let range = range(&[
            &[s("Field"), s("Value")],
            &[s("itemIndex"), s("10")],
            &[s("quantity"), Data::Float(3.0)],
        ]);
        let map = key_values("StartWorkflow", &range);

        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("Field"));
        assert_eq!(map["itemIndex"], CellValue::from("10"));
        assert_eq!(map["quantity"], CellValue::Number(3.0));
    }

    #[test]
    fn test_key_values_without_header_keep_row_zero() {
        let range = range(&[&[s("itemIndex"), s("10")]]);
        let map = key_values("StartWorkflow", &range);
        assert_eq!(map["itemIndex"], CellValue::from("10"));
    }

    #[test]
    fn test_key_values_later_duplicate_wins() {
        let range = range(&[
            &[s("itemIndex"), s("10")],
            &[s("  itemIndex "), s("11")],
            &[Data::Empty, s("orphan")],
        ]);
        let map = key_values("StartWorkflow", &range);

        assert_eq!(map.len(), 1);
        assert_eq!(map["itemIndex"], CellValue::from("11"));
    }

    #[test]
    fn test_row_objects_default_empty_cells() {
        let range = range(&[
            &[s("searchText"), s("displayText"), s("emailIfAny")],
            &[s("doe"), s("Doe, Jane"), Data::Empty],
            &[Data::Empty, Data::Empty, Data::Empty],
            &[s("roe"), s("Roe, Rick"), s("rick@example.com")],
        ]);
        let (headers, rows) = row_objects(&range);

        assert_eq!(headers, vec!["searchText", "displayText", "emailIfAny"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["emailIfAny"], CellValue::String(String::new()));
        assert_eq!(rows[1]["searchText"], CellValue::from("roe"));
    }

    #[test]
    fn test_normalize_headers() {
        let headers = normalize_headers(&[s("a"), Data::Empty, s("a"), Data::Empty, s("a")]);
        assert_eq!(headers, vec!["a", "__EMPTY", "a_1", "__EMPTY_1", "a_2"]);
    }

    #[test]
    fn test_pick_sheet() {
        let names = vec!["StartWorkflow".to_string(), "Assignees".to_string()];

        assert_eq!(pick_sheet(&names, "assignees", SheetMatch::Strict), Some(&names[1]));
        assert_eq!(pick_sheet(&names, "Approvals", SheetMatch::Lenient), Some(&names[0]));
        assert_eq!(pick_sheet(&names, "Approvals", SheetMatch::Strict), None);
    }

    #[test]
    fn test_pick_sheet_without_sheets() {
        assert_eq!(pick_sheet(&[], "StartWorkflow", SheetMatch::Lenient), None);
        assert_eq!(pick_sheet(&[], "StartWorkflow", SheetMatch::Strict), None);
    }

    #[test]
    fn test_field_header_is_not_trimmed() {
        let range = range(&[&[s(" field "), s("value")], &[s("itemIndex"), s("10")]]);
        let map = key_values("StartWorkflow", &range);

        assert_eq!(map.len(), 2);
        assert_eq!(map["field"], CellValue::from("value"));
    }

    #[test]
    fn test_open_missing_file() {
        let err = Workbook::open("/definitely/not/here.xlsx").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
