//! Preflight runner: resolves every fixture a UI run needs before the browser
//! starts

use std::path::{Path, PathBuf};
use std::time::Instant;

use caseflow_common::fixtures::START_WORKFLOW_KEYS;
use caseflow_common::otp::{self, OtpGenerator};
use caseflow_common::secret::resolve_secret_with_source;
use caseflow_common::{ApprovalStage, Assignee, RowSheet, RunConfig, StartWorkflowForm, Workbook};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{E2eError, E2eResult};
use crate::plan::{ApprovalStep, LoginPlan, RunPlan};

pub const STAGE_WORKBOOK: &str = "workbook";
pub const STAGE_START_WORKFLOW: &str = "start-workflow";
pub const STAGE_ASSIGNEES: &str = "assignees";
pub const STAGE_APPROVALS: &str = "approvals";
pub const STAGE_CREDENTIALS: &str = "approver-credentials";
pub const STAGE_ONE_TIME_CODE: &str = "one-time-code";

/// Stage names in execution order
pub const STAGES: &[&str] = &[
    STAGE_WORKBOOK,
    STAGE_START_WORKFLOW,
    STAGE_ASSIGNEES,
    STAGE_APPROVALS,
    STAGE_CREDENTIALS,
    STAGE_ONE_TIME_CODE,
];

/// Result of a single stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub detail: Option<String>,
    pub error: Option<String>,
}

/// Result of a whole preflight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub workbook: String,
    pub checked_at: DateTime<Utc>,
    pub success: bool,
    pub duration_ms: u64,
    pub stages: Vec<StageResult>,
    pub error: Option<String>,
}

impl PreflightReport {
    pub fn failed_stage(&self) -> Option<&StageResult> {
        self.stages.iter().find(|s| !s.success)
    }
}

/// A report plus, when every stage passed, the plan.
#[derive(Debug)]
pub struct PreflightOutcome {
    pub report: PreflightReport,
    pub plan: Option<RunPlan>,
}

impl PreflightOutcome {
    /// The plan, or the first failing stage as an error.
    pub fn into_plan(self) -> E2eResult<RunPlan> {
        if let Some(plan) = self.plan {
            return Ok(plan);
        }
        let failed = self.report.failed_stage();
        Err(E2eError::StageFailed {
            stage: failed.map(|s| s.name.clone()).unwrap_or_default(),
            reason: failed
                .and_then(|s| s.error.clone())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

/// Runs the preflight stages against one [`RunConfig`]
pub struct Preflight<'a> {
    config: &'a RunConfig,
    /// Fixed clock for one-time codes; `None` uses the system clock
    now: Option<u64>,
}

impl<'a> Preflight<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config, now: None }
    }

    pub fn with_clock(mut self, unix_secs: u64) -> Self {
        self.now = Some(unix_secs);
        self
    }

    /// Run every stage in order, stopping at the first failure.
    pub fn run(&self) -> PreflightOutcome {
        let start = Instant::now();
        let mut log = StageLog::default();

        info!("Preflight for {}", self.config.workbook_path().display());
        let plan = self.build_plan(&mut log);

        let duration_ms = start.elapsed().as_millis() as u64;
        let error = log.stages.iter().find(|s| !s.success).and_then(|s| s.error.clone());
        let success = plan.is_some();

        info!(
            "Preflight {}: {} of {} stage(s) passed ({} ms)",
            if success { "passed" } else { "failed" },
            log.stages.iter().filter(|s| s.success).count(),
            STAGES.len(),
            duration_ms
        );

        PreflightOutcome {
            report: PreflightReport {
                workbook: self.config.workbook_path().display().to_string(),
                checked_at: Utc::now(),
                success,
                duration_ms,
                stages: log.stages,
                error,
            },
            plan,
        }
    }

    fn build_plan(&self, log: &mut StageLog) -> Option<RunPlan> {
        let app = &self.config.app;
        let excel = &app.excel;
        let secrets = &self.config.secrets;

        let mut workbook = log.record(STAGE_WORKBOOK, || {
            let wb = Workbook::open(&excel.path)?.with_sheet_match(excel.sheet_match());
            let detail = format!("sheets: {}", wb.sheet_names().join(", "));
            Ok((wb, detail))
        })?;

        let start_workflow = log.record(STAGE_START_WORKFLOW, || {
            let sheet = workbook.key_value_sheet(&excel.sheets.start_workflow)?;
            let form = StartWorkflowForm::from_sheet(&sheet)?;
            let detail = format!(
                "{} field(s) from \"{}\"",
                START_WORKFLOW_KEYS.len(),
                sheet.name
            );
            Ok((form, detail))
        })?;

        let (assignee_sheet, assignees) = log.record(STAGE_ASSIGNEES, || {
            let sheet = workbook.row_sheet(&excel.sheets.assignees)?;
            let assignees = Assignee::all_from_sheet(&sheet, &excel.assignees_columns)?;
            let detail = format!("{} assignee(s) from \"{}\"", assignees.len(), sheet.name);
            Ok(((sheet, assignees), detail))
        })?;

        let stages = ApprovalStage::defaults();
        let approval_fields = log.record(STAGE_APPROVALS, || {
            let sheet = workbook.row_sheet(&excel.sheets.approvals)?;
            let fields = stages
                .iter()
                .map(|stage| stage.resolve(&sheet))
                .collect::<caseflow_common::Result<Vec<_>>>()?;
            let detail = format!("{} approval stage(s) from \"{}\"", fields.len(), sheet.name);
            Ok((fields, detail))
        })?;

        let approvals = log.record(STAGE_CREDENTIALS, || {
            let steps = stages
                .iter()
                .zip(approval_fields)
                .map(|(stage, fields)| self.approval_step(stage, fields, &assignee_sheet, &assignees))
                .collect::<caseflow_common::Result<Vec<_>>>()?;
            let detail = steps
                .iter()
                .map(|s| format!("actor {}: {:?}", s.actor, s.password_source))
                .collect::<Vec<_>>()
                .join(", ");
            Ok((steps, detail))
        })?;

        log.record(STAGE_ONE_TIME_CODE, || {
            let generator = OtpGenerator::new(secrets.totp_secret.expose())?;
            let now = self.now.unwrap_or_else(otp::now_epoch_secs);
            let code = generator.generate_at(now);
            debug!("One-time code generated ({} digits)", code.len());
            let detail = format!("secret accepted, {}s left in current step", otp::seconds_remaining(now));
            Ok(((), detail))
        })?;

        Some(RunPlan {
            login: LoginPlan {
                start_url: app.urls.login_start.clone(),
                user: secrets.login_user.clone(),
                password: secrets.login_pass.clone(),
            },
            start_workflow,
            assignees,
            approvals,
        })
    }

    fn approval_step(
        &self,
        stage: &ApprovalStage,
        fields: Vec<(String, String)>,
        assignee_sheet: &RowSheet,
        assignees: &[Assignee],
    ) -> caseflow_common::Result<ApprovalStep> {
        let secrets = &self.config.secrets;
        let (password, password_source) = resolve_secret_with_source(
            stage.actor,
            assignee_sheet.row(stage.actor),
            &self.config.app.excel.assignees_columns.password,
            |i| secrets.approver_override(i),
            secrets.approver_default(),
        )?;

        let user = assignees
            .get(stage.actor)
            .map(|a| a.search_text.clone())
            .unwrap_or_default();

        Ok(ApprovalStep {
            actor: stage.actor,
            portal_url: self.config.app.urls.portal_root.clone(),
            user,
            password,
            password_source,
            fields,
        })
    }
}

/// Records stage results, stopping the caller at the first failure.
#[derive(Default)]
struct StageLog {
    stages: Vec<StageResult>,
}

impl StageLog {
    fn record<T, F>(&mut self, name: &str, f: F) -> Option<T>
    where
        F: FnOnce() -> caseflow_common::Result<(T, String)>,
    {
        let start = Instant::now();
        let result = f();
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok((value, detail)) => {
                info!("✓ {} - {}", name, detail);
                self.stages.push(StageResult {
                    name: name.to_string(),
                    success: true,
                    duration_ms,
                    detail: Some(detail),
                    error: None,
                });
                Some(value)
            }
            Err(e) => {
                error!("✗ {} - {}", name, e);
                self.stages.push(StageResult {
                    name: name.to_string(),
                    success: false,
                    duration_ms,
                    detail: None,
                    error: Some(e.to_string()),
                });
                None
            }
        }
    }
}

/// Write a report as `preflight-report.json` under `dir`.
pub fn write_report(report: &PreflightReport, dir: &Path) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join("preflight-report.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;

    info!("Report written to: {}", path.display());
    Ok(path)
}
