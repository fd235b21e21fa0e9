use thiserror::Error;

/// Errors surfaced by the event log service
#[derive(Debug, Error)]
pub enum EventError {
    /// The request is missing or carries an unusable field
    #[error("{0}")]
    Validation(String),

    /// Storage or serialization failed
    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl EventError {
    pub fn validation(message: impl Into<String>) -> Self {
        EventError::Validation(message.into())
    }
}

impl From<serde_json::Error> for EventError {
    fn from(e: serde_json::Error) -> Self {
        EventError::Internal(e.into())
    }
}
