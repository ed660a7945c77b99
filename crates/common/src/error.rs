//! Error types for caseflow fixtures

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the caseflow fixture Error
pub type Result<T> = std::result::Result<T, Error>;

/// Fixture error types
///
/// Every variant is fail-fast: callers propagate it to the end of the run
/// instead of substituting a default.
#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Sheet \"{sheet}\" not found in \"{}\"", .path.display())]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("Field \"{key}\" is missing or empty")]
    MissingField { key: String },

    /// Row indices are 0-based; messages show the 1-based data row.
    #[error("Missing row {}", .row + 1)]
    MissingRow { row: usize },

    #[error("Missing column \"{column}\"")]
    MissingColumn { column: String },

    #[error("Row {}: \"{column}\" is empty", .row + 1)]
    EmptyField { row: usize, column: String },

    #[error("No password for actor[{actor}]")]
    NoSecret { actor: usize },

    #[error("Could not parse date: {0}")]
    DateParse(String),

    #[error("{sheet}: {source}")]
    InSheet {
        sheet: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Template error: {0}")]
    Template(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing env: set {}", .0.join(", "))]
    MissingSecrets(Vec<String>),

    #[error("Invalid one-time-code secret: {0}")]
    InvalidOtpSecret(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Attach the sheet name to a lookup error.
    pub fn in_sheet(self, sheet: impl Into<String>) -> Self {
        Error::InSheet {
            sheet: sheet.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error with any sheet context stripped.
    pub fn root(&self) -> &Error {
        match self {
            Error::InSheet { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_numbers_are_one_based_in_messages() {
        let err = Error::EmptyField {
            row: 0,
            column: "Approval Note".to_string(),
        };
        assert_eq!(err.to_string(), "Row 1: \"Approval Note\" is empty");
        assert_eq!(Error::MissingRow { row: 2 }.to_string(), "Missing row 3");
    }

    #[test]
    fn test_root_strips_sheet_context() {
        let err = Error::MissingField {
            key: "quantity".to_string(),
        }
        .in_sheet("StartWorkflow");

        assert_eq!(
            err.to_string(),
            "StartWorkflow: Field \"quantity\" is missing or empty"
        );
        assert!(matches!(err.root(), Error::MissingField { key } if key == "quantity"));
    }
}
