//! Typed fixtures for the start-workflow, assignee and approval steps

use serde::Serialize;

use crate::config::AssigneeColumns;
use crate::date_label;
use crate::error::Result;
use crate::workbook::{KeyValueSheet, RowSheet};

/// Start-workflow keys, in the order the form is filled.
pub const START_WORKFLOW_KEYS: &[&str] = &[
    "flowClassId",
    "workflowId",
    "itemIndex",
    "articleTitle",
    "specTarget",
    "deviationDesc",
    "partsChecked",
    "failureRate",
    "causeKnown",
    "correctiveDefined",
    "quantity",
    "dateISO",
    "changeNumber",
    "superOrdinateArticleNo",
    "measures3D",
    "affectedCustomer",
    "causingProcess",
    "reqSpecial",
    "needChanges",
    "deliveryImpact",
    "correctiveAction",
    "uploadFilePath",
];

/// The start-workflow form, every field resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkflowForm {
    pub flow_class_id: String,
    pub workflow_id: String,
    pub item_index: String,
    pub article_title: String,
    pub spec_target: String,
    pub deviation_desc: String,
    pub parts_checked: String,
    pub failure_rate: String,
    pub cause_known: String,
    pub corrective_defined: String,
    pub quantity: String,
    /// Date-picker button label for `dateISO`, e.g. `"Aug 14,"`
    pub date_label: String,
    pub change_number: String,
    pub super_ordinate_article_no: String,
    pub measures_3d: String,
    pub affected_customer: String,
    pub causing_process: String,
    pub req_special: String,
    pub need_changes: String,
    pub delivery_impact: String,
    pub corrective_action: String,
    pub upload_file_path: String,
}

impl StartWorkflowForm {
    /// Resolve every field, stopping at the first missing one.
    pub fn from_sheet(sheet: &KeyValueSheet) -> Result<Self> {
        let req = |key: &str| sheet.require(key);

        Ok(Self {
            flow_class_id: req("flowClassId")?,
            workflow_id: req("workflowId")?,
            item_index: req("itemIndex")?,
            article_title: req("articleTitle")?,
            spec_target: req("specTarget")?,
            deviation_desc: req("deviationDesc")?,
            parts_checked: req("partsChecked")?,
            failure_rate: req("failureRate")?,
            cause_known: req("causeKnown")?,
            corrective_defined: req("correctiveDefined")?,
            quantity: req("quantity")?,
            date_label: date_label::calendar_button_label(sheet.require_raw("dateISO")?)
                .map_err(|e| e.in_sheet(&sheet.name))?,
            change_number: req("changeNumber")?,
            super_ordinate_article_no: req("superOrdinateArticleNo")?,
            measures_3d: req("measures3D")?,
            affected_customer: req("affectedCustomer")?,
            causing_process: req("causingProcess")?,
            req_special: req("reqSpecial")?,
            need_changes: req("needChanges")?,
            delivery_impact: req("deliveryImpact")?,
            corrective_action: req("correctiveAction")?,
            upload_file_path: req("uploadFilePath")?,
        })
    }
}

/// What an assignee row is used for in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeRole {
    /// Picked in an approval slot, later logs in to approve
    Approver,
    /// Added through "Add user"
    AddedUser,
    /// Typed by display name only
    Notified,
}

impl AssigneeRole {
    pub fn needs_search_text(self) -> bool {
        !matches!(self, AssigneeRole::Notified)
    }
}

/// Assignee rows consumed by the workflow, by row index.
pub const ASSIGNEE_ROLES: [AssigneeRole; 5] = [
    AssigneeRole::Approver,
    AssigneeRole::Approver,
    AssigneeRole::Approver,
    AssigneeRole::AddedUser,
    AssigneeRole::Notified,
];

/// One resolved assignee row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignee {
    pub index: usize,
    pub role: AssigneeRole,
    /// Text typed into the people picker; empty for `Notified`
    pub search_text: String,
    /// Text of the picker entry to click
    pub display_text: String,
    pub email: Option<String>,
}

impl Assignee {
    pub fn from_row(
        sheet: &RowSheet,
        index: usize,
        role: AssigneeRole,
        columns: &AssigneeColumns,
    ) -> Result<Self> {
        let search_text = if role.needs_search_text() {
            sheet.require_field(index, &columns.search_text)?
        } else {
            sheet.field_or_empty(index, &columns.search_text)
        };
        let display_text = sheet.require_field(index, &columns.display_text)?;
        let email = Some(sheet.field_or_empty(index, &columns.email_if_any)).filter(|e| !e.is_empty());

        Ok(Self {
            index,
            role,
            search_text,
            display_text,
            email,
        })
    }

    /// Every row in [`ASSIGNEE_ROLES`], in order.
    pub fn all_from_sheet(sheet: &RowSheet, columns: &AssigneeColumns) -> Result<Vec<Self>> {
        ASSIGNEE_ROLES
            .iter()
            .enumerate()
            .map(|(i, role)| Self::from_row(sheet, i, *role, columns))
            .collect()
    }
}

const FIRST_APPROVAL_COLUMNS: &[&str] = &[
    "Impact Product/Plant",
    "Prediction Of Occurrence",
    "Discovery Ability",
    "optionalDescription",
    "releaseRecommendation",
    "remarks",
    "Approval Note",
];

const LATER_APPROVAL_COLUMNS: &[&str] = &[
    "Impact Product/Plant",
    "Prediction Of Occurrence",
    "Discovery Ability",
    "actionPriority",
    "approvalRequired",
    "releaseRecommendation",
    "Approval Note",
];

/// One approver's pass over the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalStage {
    /// Assignee index of the approver; also the approvals row read
    pub actor: usize,
    /// Exact approvals-sheet headers this stage fills, in order
    pub columns: &'static [&'static str],
}

impl ApprovalStage {
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                actor: 0,
                columns: FIRST_APPROVAL_COLUMNS,
            },
            Self {
                actor: 1,
                columns: LATER_APPROVAL_COLUMNS,
            },
            Self {
                actor: 2,
                columns: LATER_APPROVAL_COLUMNS,
            },
        ]
    }

    /// Union of all stage columns, first-seen order.
    pub fn all_columns() -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for stage in Self::defaults() {
            for column in stage.columns {
                if !out.contains(column) {
                    out.push(column);
                }
            }
        }
        out
    }

    /// `(header, value)` pairs for this stage, stopping at the first gap.
    pub fn resolve(&self, sheet: &RowSheet) -> Result<Vec<(String, String)>> {
        self.columns
            .iter()
            .map(|column| {
                sheet
                    .require_field(self.actor, column)
                    .map(|value| (column.to_string(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::error::Error;
    use crate::workbook::RowRecord;

    fn start_sheet() -> KeyValueSheet {
        let mut sheet = KeyValueSheet {
            name: "StartWorkflow".to_string(),
            ..Default::default()
        };
        for key in START_WORKFLOW_KEYS {
            sheet
                .entries
                .insert(key.to_string(), CellValue::from(format!("{key}-value")));
        }
        sheet
            .entries
            .insert("dateISO".to_string(), CellValue::Number(45152.0));
        sheet
    }

    fn assignee_sheet(rows: &[(&str, &str)]) -> RowSheet {
        let columns = AssigneeColumns::default();
        RowSheet {
            name: "Assignees".to_string(),
            headers: columns.headers().iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|(search, display)| {
                    let mut r = RowRecord::new();
                    r.insert(columns.search_text.clone(), CellValue::from(*search));
                    r.insert(columns.display_text.clone(), CellValue::from(*display));
                    r.insert(columns.email_if_any.clone(), CellValue::from(""));
                    r
                })
                .collect(),
        }
    }

    #[test]
    fn test_start_workflow_form() {
        let form = StartWorkflowForm::from_sheet(&start_sheet()).unwrap();
        assert_eq!(form.item_index, "itemIndex-value");
        assert_eq!(form.date_label, "Aug 14,");
        assert_eq!(form.upload_file_path, "uploadFilePath-value");
    }

    #[test]
    fn test_start_workflow_form_names_first_missing_key() {
        let mut sheet = start_sheet();
        sheet.entries.remove("quantity");
        sheet.entries.remove("changeNumber");

        let err = StartWorkflowForm::from_sheet(&sheet).unwrap_err();
        assert!(matches!(err.root(), Error::MissingField { key } if key == "quantity"));
        assert!(err.to_string().starts_with("StartWorkflow: "));
    }

    #[test]
    fn test_bad_date_is_reported() {
        let mut sheet = start_sheet();
        sheet
            .entries
            .insert("dateISO".to_string(), CellValue::from("someday"));

        let err = StartWorkflowForm::from_sheet(&sheet).unwrap_err();
        assert!(matches!(err.root(), Error::DateParse(v) if v == "someday"));
    }

    #[test]
    fn test_notified_assignee_needs_only_display_text() {
        let sheet = assignee_sheet(&[
            ("doe", "Doe, Jane"),
            ("roe", "Roe, Rick"),
            ("poe", "Poe, Pat"),
            ("moe", "Moe, Max"),
            ("", "Team Quality"),
        ]);
        let assignees = Assignee::all_from_sheet(&sheet, &AssigneeColumns::default()).unwrap();

        assert_eq!(assignees.len(), 5);
        assert_eq!(assignees[4].role, AssigneeRole::Notified);
        assert_eq!(assignees[4].search_text, "");
        assert_eq!(assignees[0].email, None);
    }

    #[test]
    fn test_missing_assignee_row() {
        let sheet = assignee_sheet(&[("doe", "Doe, Jane")]);
        let err = Assignee::all_from_sheet(&sheet, &AssigneeColumns::default()).unwrap_err();
        assert!(matches!(err.root(), Error::MissingRow { row: 1 }));
    }

    #[test]
    fn test_approval_columns_union() {
        let all = ApprovalStage::all_columns();
        assert_eq!(all.len(), 9);
        assert_eq!(all[0], "Impact Product/Plant");
        assert!(all.contains(&"actionPriority"));
        assert!(all.contains(&"remarks"));
    }
}
