use thiserror::Error;

/// Errors surfaced by the authentication orchestrator.
///
/// Failures from the intent API terminate the attempt and reach the caller
/// through its callback. Only [`AuthError::AuthenticationInProgress`] is
/// returned directly from a `start_*` call.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Transport-level failure. The caller may retry; nothing is retried here.
    #[error("Network error: {0}")]
    Network(String),
    /// Malformed parameters or an expired client secret.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Authentication error: {0}")]
    Authentication(String),
    #[error("No authentication result to process")]
    NoResultToProcess,
    #[error("Malformed use_stripe_sdk payload for {intent_id}: {reason}")]
    MalformedSdkPayload { intent_id: String, reason: String },
    #[error("Authentication already in progress for {intent_id}")]
    AuthenticationInProgress { intent_id: String },
    #[error("Authentication flow failed: {0}")]
    ChallengeFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthError {
    /// Whether the caller can reasonably retry the same attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
