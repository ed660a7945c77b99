//! Secret values and per-actor password resolution

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::workbook::RowRecord;

/// A credential whose `Debug`, `Display` and serialized forms are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The plain value, for handing to the browser driver.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

/// Where a resolved secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretSource {
    PerActor,
    Row,
    Default,
}

/// Resolve an actor's password.
///
/// Precedence: the per-actor override for `actor`, then `row[column]`, then
/// `default`. Each tier counts only when non-empty after trimming.
pub fn resolve_secret<F>(
    actor: usize,
    row: Option<&RowRecord>,
    column: &str,
    per_actor: F,
    default: Option<&str>,
) -> Result<SecretValue>
where
    F: FnOnce(usize) -> Option<String>,
{
    resolve_secret_with_source(actor, row, column, per_actor, default).map(|(secret, _)| secret)
}

/// Same as [`resolve_secret`], also reporting which tier won.
pub fn resolve_secret_with_source<F>(
    actor: usize,
    row: Option<&RowRecord>,
    column: &str,
    per_actor: F,
    default: Option<&str>,
) -> Result<(SecretValue, SecretSource)>
where
    F: FnOnce(usize) -> Option<String>,
{
    if let Some(v) = non_blank(per_actor(actor).as_deref()) {
        return Ok((SecretValue::new(v), SecretSource::PerActor));
    }

    let from_row = row.and_then(|r| r.get(column)).map(|v| v.to_text());
    if let Some(v) = non_blank(from_row.as_deref()) {
        return Ok((SecretValue::new(v), SecretSource::Row));
    }

    if let Some(v) = non_blank(default) {
        return Ok((SecretValue::new(v), SecretSource::Default));
    }

    Err(Error::NoSecret { actor })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    fn row(password: &str) -> RowRecord {
        let mut r = RowRecord::new();
        r.insert("password".to_string(), CellValue::from(password));
        r
    }

    #[test]
    fn test_precedence_falls_through_each_tier() {
        let sheet_row = row("from-row");
        let actor = |_| Some(" from-env ".to_string());
        let no_actor = |_| None;

        let s = resolve_secret(1, Some(&sheet_row), "password", actor, Some("default")).unwrap();
        assert_eq!(s.expose(), "from-env");

        let s = resolve_secret(1, Some(&sheet_row), "password", no_actor, Some("default")).unwrap();
        assert_eq!(s.expose(), "from-row");

        let blank_row = row("  ");
        let (s, source) =
            resolve_secret_with_source(1, Some(&blank_row), "password", no_actor, Some("default"))
                .unwrap();
        assert_eq!(s.expose(), "default");
        assert_eq!(source, SecretSource::Default);

        let err = resolve_secret(1, Some(&blank_row), "password", no_actor, Some(" ")).unwrap_err();
        assert!(matches!(err, Error::NoSecret { actor: 1 }));
    }

    #[test]
    fn test_lookup_receives_actor_index() {
        let s = resolve_secret(
            2,
            None,
            "password",
            |i| (i == 2).then(|| "two".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(s.expose(), "two");
    }

    #[test]
    fn test_redacted_forms() {
        let s = SecretValue::new("hunter2");
        assert_eq!(format!("{:?}", s), "SecretValue(***)");
        assert_eq!(s.to_string(), "***");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"***\"");
    }
}
