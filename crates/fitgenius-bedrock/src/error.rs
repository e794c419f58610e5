use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("template error: {0}")]
    Template(String),

    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to expected schema: {0}")]
    SchemaViolation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BedrockError {
    /// Rejected locally before anything was sent upstream.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl From<tera::Error> for BedrockError {
    fn from(e: tera::Error) -> Self {
        // Tera puts the useful part (e.g. the undefined variable) in the
        // source chain.
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        BedrockError::Template(message)
    }
}
