//! Caseflow Common Library
//!
//! The data-driven fixture layer for workflow-portal end-to-end runs: a
//! workbook loader with key/value and row-object views, strict accessors that
//! refuse blank values, per-actor secret resolution, date-picker labels and
//! one-time codes.

pub mod accessor;
pub mod case_id;
pub mod cell;
pub mod config;
pub mod date_label;
pub mod error;
pub mod fixtures;
pub mod otp;
pub mod secret;
pub mod template;
pub mod workbook;

// Re-export commonly used types
pub use accessor::{require_key_value, require_row_field, row_field_or_empty};
pub use cell::CellValue;
pub use config::{AppConfig, AssigneeColumns, RunConfig, Secrets};
pub use error::{Error, Result};
pub use fixtures::{ApprovalStage, Assignee, AssigneeRole, StartWorkflowForm};
pub use otp::OtpGenerator;
pub use secret::{resolve_secret, SecretSource, SecretValue};
pub use workbook::{
    load_key_value_sheet, load_row_objects, KeyValueMap, KeyValueSheet, RowRecord, RowSheet,
    SheetMatch, Workbook,
};

/// Caseflow version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
