//! Strict field accessors
//!
//! Every UI input comes through here so a blank spreadsheet cell fails the run
//! at the step that needs it, naming the exact key, row or column.

use crate::error::{Error, Result};
use crate::workbook::{KeyValueMap, RowRecord};

/// Trimmed, non-empty text for `key`.
pub fn require_key_value(map: &KeyValueMap, key: &str) -> Result<String> {
    let value = map
        .get(key)
        .map(|v| v.to_text().trim().to_string())
        .unwrap_or_default();

    if value.is_empty() {
        return Err(Error::MissingField {
            key: key.to_string(),
        });
    }
    Ok(value)
}

/// Trimmed, non-empty text at `rows[row][column]`.
///
/// A record without the header at all is a `MissingColumn`; a header holding a
/// blank cell is an `EmptyField`.
pub fn require_row_field(rows: &[RowRecord], row: usize, column: &str) -> Result<String> {
    let record = rows.get(row).ok_or(Error::MissingRow { row })?;

    let value = record.get(column).ok_or_else(|| Error::MissingColumn {
        column: column.to_string(),
    })?;

    let text = value.to_text().trim().to_string();
    if text.is_empty() {
        return Err(Error::EmptyField {
            row,
            column: column.to_string(),
        });
    }
    Ok(text)
}

/// Trimmed text at `rows[row][column]`, empty when anything is absent.
pub fn row_field_or_empty(rows: &[RowRecord], row: usize, column: &str) -> String {
    rows.get(row)
        .and_then(|r| r.get(column))
        .map(|v| v.to_text().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    fn approvals() -> Vec<RowRecord> {
        let mut row = RowRecord::new();
        row.insert("Approval Note".to_string(), CellValue::from("  looks good "));
        row.insert("remarks".to_string(), CellValue::from("   "));
        row.insert("Discovery Ability".to_string(), CellValue::Number(4.0));
        vec![row]
    }

    #[test]
    fn test_require_key_value() {
        let mut map = KeyValueMap::new();
        map.insert("itemIndex".to_string(), CellValue::from(" 10 "));
        map.insert("blank".to_string(), CellValue::Empty);

        assert_eq!(require_key_value(&map, "itemIndex").unwrap(), "10");
        assert!(matches!(
            require_key_value(&map, "blank"),
            Err(Error::MissingField { key }) if key == "blank"
        ));
        assert!(matches!(
            require_key_value(&map, "quantity"),
            Err(Error::MissingField { key }) if key == "quantity"
        ));
    }

    #[test]
    fn test_require_row_field_trims_and_stringifies() {
        let rows = approvals();
        assert_eq!(require_row_field(&rows, 0, "Approval Note").unwrap(), "looks good");
        assert_eq!(require_row_field(&rows, 0, "Discovery Ability").unwrap(), "4");
    }

    #[test]
    fn test_missing_column_differs_from_empty_field() {
        let rows = approvals();

        assert!(matches!(
            require_row_field(&rows, 0, "actionPriority"),
            Err(Error::MissingColumn { column }) if column == "actionPriority"
        ));
        assert!(matches!(
            require_row_field(&rows, 0, "remarks"),
            Err(Error::EmptyField { row: 0, column }) if column == "remarks"
        ));
        assert!(matches!(
            require_row_field(&rows, 3, "remarks"),
            Err(Error::MissingRow { row: 3 })
        ));
    }

    #[test]
    fn test_row_field_or_empty() {
        let rows = approvals();
        assert_eq!(row_field_or_empty(&rows, 0, "Approval Note"), "looks good");
        assert_eq!(row_field_or_empty(&rows, 0, "nope"), "");
        assert_eq!(row_field_or_empty(&rows, 9, "Approval Note"), "");
    }
}
