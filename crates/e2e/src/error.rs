//! Error types for preflight runs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Fixture error: {0}")]
    Fixture(#[from] caseflow_common::Error),

    #[error("Stage failed: {stage} - {reason}")]
    StageFailed { stage: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
