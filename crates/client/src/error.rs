use tasks_protocol::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach task API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(ValidationErrors),
    #[error("task API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode task API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ClientError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
