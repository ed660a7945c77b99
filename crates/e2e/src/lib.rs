//! Caseflow E2E Preflight
//!
//! Resolves everything a workflow UI run reads from its fixtures and the
//! environment before a browser is started, so a blank cell or a missing
//! password fails the run up front instead of halfway through a submission.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Preflight (RunConfig)                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  workbook              open + resolve sheet names            │
//! │  start-workflow        KeyValueSheet -> StartWorkflowForm    │
//! │  assignees             RowSheet -> Vec<Assignee>             │
//! │  approvals             RowSheet -> stage fields              │
//! │  approver-credentials  per-actor / row / default password    │
//! │  one-time-code         TOTP secret accepted                  │
//! ├──────────────────────────────────────────────────────────────┤
//! │  PreflightReport (JSON)      RunPlan (typed, for the script) │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod plan;
pub mod preflight;

pub use error::{E2eError, E2eResult};
pub use plan::{ApprovalStep, LoginPlan, RunPlan};
pub use preflight::{write_report, Preflight, PreflightOutcome, PreflightReport, StageResult};
