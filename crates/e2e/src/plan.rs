//! The resolved data a UI run consumes

use caseflow_common::{Assignee, SecretSource, SecretValue, StartWorkflowForm};
use serde::Serialize;

/// Everything the workflow script reads, resolved up front.
#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    pub login: LoginPlan,
    pub start_workflow: StartWorkflowForm,
    pub assignees: Vec<Assignee>,
    pub approvals: Vec<ApprovalStep>,
}

/// SSO login of the case creator
#[derive(Debug, Clone, Serialize)]
pub struct LoginPlan {
    pub start_url: String,
    pub user: String,
    pub password: SecretValue,
}

/// One approver's login and the fields they set
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalStep {
    pub actor: usize,
    pub portal_url: String,
    /// Approvers log in with their people-picker search text
    pub user: String,
    pub password: SecretValue,
    pub password_source: SecretSource,
    /// `(approvals header, value)` in fill order
    pub fields: Vec<(String, String)>,
}

impl ApprovalStep {
    pub fn field(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }
}

impl RunPlan {
    pub fn approver(&self, actor: usize) -> Option<&ApprovalStep> {
        self.approvals.iter().find(|s| s.actor == actor)
    }
}
