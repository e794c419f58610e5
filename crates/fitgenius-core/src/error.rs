use thiserror::Error;

use crate::models::profile::FieldIssue;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid document type: {0}")]
    InvalidDocType(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("profile incomplete: {}", describe_issues(.0))]
    ProfileIncomplete(Vec<FieldIssue>),

    #[error("plan schema version {found} is newer than this build supports ({supported})")]
    UnsupportedSchemaVersion { found: u64, supported: u32 },

    #[error("unknown plan type: {0}")]
    UnknownPlanType(String),
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
