use fitgenius_bedrock::error::BedrockError;
use fitgenius_core::models::outcome::ErrorKind;
use fitgenius_core::models::profile::FieldIssue;
use fitgenius_storage::error::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("profile incomplete: {} field(s) missing or invalid", .0.len())]
    ProfileIncomplete(Vec<FieldIssue>),

    #[error("plan can be regenerated in {days_remaining} day(s)")]
    CooldownActive { days_remaining: i64 },

    #[error("invalid generation input: {0}")]
    Validation(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProfileIncomplete(_) => ErrorKind::ProfileIncomplete,
            Self::CooldownActive { .. } => ErrorKind::CooldownActive,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Generation(_) => ErrorKind::Generation,
            Self::Storage(_) => ErrorKind::Persistence,
        }
    }

    /// Text shown to the user. Storage details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::ProfileIncomplete(_) => {
                "Por favor, preencha seu perfil antes de gerar um plano.".to_string()
            }
            Self::CooldownActive { days_remaining } => format!(
                "Você poderá gerar um novo plano em {days_remaining} dia(s)."
            ),
            Self::Validation(_) => "Dados inválidos para gerar o plano.".to_string(),
            Self::Generation(_) => {
                "Não foi possível gerar o plano. Tente novamente.".to_string()
            }
            Self::Storage(_) => {
                "Não foi possível carregar seus dados. Tente novamente.".to_string()
            }
        }
    }
}

impl From<BedrockError> for WorkflowError {
    fn from(err: BedrockError) -> Self {
        if err.is_validation() {
            Self::Validation(err.to_string())
        } else {
            Self::Generation(err.to_string())
        }
    }
}
