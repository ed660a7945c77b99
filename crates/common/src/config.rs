//! Run configuration
//!
//! Non-secret settings come from a JSON app config; credentials come from the
//! environment. Both are read once at startup into a [`RunConfig`] that is
//! passed by reference from then on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::secret::SecretValue;
use crate::workbook::SheetMatch;

pub const ENV_APP_URL: &str = "APP_URL";
pub const ENV_LOGIN_USER: &str = "LOGIN_USER";
pub const ENV_LOGIN_EMAIL: &str = "LOGIN_EMAIL";
pub const ENV_LOGIN_PASS: &str = "LOGIN_PASS";
pub const ENV_LOGIN_PASSWORD: &str = "LOGIN_PASSWORD";
pub const ENV_TOTP_SECRET: &str = "TOTP_SECRET";
pub const ENV_APPROVER_DEFAULT_PASS: &str = "APPROVER_DEFAULT_PASS";

/// Name of the per-actor password override, e.g. `APPROVER_0_PASS`.
pub fn approver_pass_var(actor: usize) -> String {
    format!("APPROVER_{}_PASS", actor)
}

/// Non-secret application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub excel: ExcelConfig,

    #[serde(default)]
    pub urls: UrlsConfig,
}

/// Workbook location and layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcelConfig {
    /// Workbook path; relative paths are resolved against the config file.
    pub path: PathBuf,

    #[serde(default)]
    pub sheets: SheetNames,

    /// Logical assignee field -> column header
    #[serde(default)]
    pub assignees_columns: AssigneeColumns,

    /// Fail on an unmatched sheet name instead of using the first sheet.
    #[serde(default)]
    pub strict_sheet_names: bool,
}

impl Default for ExcelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("test-data/workflow-data.xlsx"),
            sheets: SheetNames::default(),
            assignees_columns: AssigneeColumns::default(),
            strict_sheet_names: false,
        }
    }
}

impl ExcelConfig {
    pub fn sheet_match(&self) -> SheetMatch {
        if self.strict_sheet_names {
            SheetMatch::Strict
        } else {
            SheetMatch::Lenient
        }
    }
}

/// Sheet names per fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetNames {
    pub start_workflow: String,
    pub assignees: String,
    pub approvals: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            start_workflow: "StartWorkflow".to_string(),
            assignees: "Assignees".to_string(),
            approvals: "Approvals".to_string(),
        }
    }
}

/// Column headers of the assignees sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssigneeColumns {
    pub search_text: String,
    pub display_text: String,
    pub email_if_any: String,
    pub password: String,
}

impl Default for AssigneeColumns {
    fn default() -> Self {
        Self {
            search_text: "searchText".to_string(),
            display_text: "displayText".to_string(),
            email_if_any: "emailIfAny".to_string(),
            password: "password".to_string(),
        }
    }
}

impl AssigneeColumns {
    /// Headers in template order.
    pub fn headers(&self) -> Vec<&str> {
        vec![
            self.search_text.as_str(),
            self.display_text.as_str(),
            self.email_if_any.as_str(),
            self.password.as_str(),
        ]
    }
}

/// Application URLs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UrlsConfig {
    /// First page of the SSO login
    pub login_start: String,

    /// Portal login used by approvers
    pub portal_root: String,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    ///
    /// A relative `excel.path` is rebased onto the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)?;

        if config.excel.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.excel.path = dir.join(&config.excel.path);
            }
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides (`APP_URL` replaces the login start URL).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_APP_URL).map(|v| v.trim().to_string()) {
            if !url.is_empty() {
                self.urls.login_start = url;
            }
        }
    }
}

/// Credentials from the environment
#[derive(Debug, Clone)]
pub struct Secrets {
    pub login_user: String,
    pub login_pass: SecretValue,
    pub totp_secret: SecretValue,
    pub approver_default_pass: Option<SecretValue>,
    /// `APPROVER_<n>_PASS` overrides keyed by actor index
    pub approver_overrides: BTreeMap<usize, SecretValue>,
}

impl Secrets {
    /// Read secrets from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Read secrets from `(name, value)` pairs.
    ///
    /// Every missing required variable is reported in one error.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        let first = |names: &[&str]| names.iter().find_map(|n| vars.get(*n).cloned());

        let login_user = first(&[ENV_LOGIN_USER, ENV_LOGIN_EMAIL]);
        let login_pass = first(&[ENV_LOGIN_PASS, ENV_LOGIN_PASSWORD]);
        let totp_secret = first(&[ENV_TOTP_SECRET]);

        let mut missing = Vec::new();
        if login_user.is_none() {
            missing.push(format!("{}/{}", ENV_LOGIN_USER, ENV_LOGIN_EMAIL));
        }
        if login_pass.is_none() {
            missing.push(format!("{}/{}", ENV_LOGIN_PASS, ENV_LOGIN_PASSWORD));
        }
        if totp_secret.is_none() {
            missing.push(ENV_TOTP_SECRET.to_string());
        }

        let (Some(login_user), Some(login_pass), Some(totp_secret)) =
            (login_user, login_pass, totp_secret)
        else {
            return Err(Error::MissingSecrets(missing));
        };

        let approver_overrides = vars
            .iter()
            .filter_map(|(k, v)| parse_approver_var(k).map(|i| (i, SecretValue::new(v.clone()))))
            .collect();

        Ok(Self {
            login_user,
            login_pass: SecretValue::new(login_pass),
            totp_secret: SecretValue::new(totp_secret),
            approver_default_pass: vars.get(ENV_APPROVER_DEFAULT_PASS).cloned().map(SecretValue::new),
            approver_overrides,
        })
    }

    /// Per-actor override lookup, shaped for [`crate::secret::resolve_secret`].
    pub fn approver_override(&self, actor: usize) -> Option<String> {
        self.approver_overrides
            .get(&actor)
            .map(|s| s.expose().to_string())
    }

    pub fn approver_default(&self) -> Option<&str> {
        self.approver_default_pass.as_ref().map(SecretValue::expose)
    }
}

/// Actor index of an exact `APPROVER_<n>_PASS` name; `01` or `+1` do not match.
fn parse_approver_var(name: &str) -> Option<usize> {
    let digits = name.strip_prefix("APPROVER_")?.strip_suffix("_PASS")?;
    let actor: usize = digits.parse().ok()?;
    (approver_pass_var(actor) == name).then_some(actor)
}

/// Everything a run needs, built once at process start.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub app: AppConfig,
    pub secrets: Secrets,
}

impl RunConfig {
    /// Load the app config and read secrets from the process environment.
    pub fn from_env(config_path: impl AsRef<Path>) -> Result<Self> {
        let mut app = AppConfig::load(config_path)?;
        app.apply_env(|k| std::env::var(k).ok());
        let secrets = Secrets::from_env()?;
        Ok(Self { app, secrets })
    }

    pub fn workbook_path(&self) -> &Path {
        &self.app.excel.path
    }
}
