use super::payment_intent::PaymentIntent;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

/// Terminal result of one authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthOutcome {
    Succeeded,
    /// The flow ended without satisfying the intent's requirement.
    Failed,
    Canceled,
}

/// States an attempt moves through, from creation to a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Created,
    Confirming,
    Classifying,
    AwaitingRedirect,
    AwaitingSdkChallenge,
    Resolving,
    Terminal(AuthOutcome),
}

impl AuthState {
    pub fn can_transition_to(&self, next: &AuthState) -> bool {
        use AuthState::*;
        matches!(
            (self, next),
            (Created, Confirming)
                | (Created, Classifying)
                | (Confirming, Classifying)
                | (Confirming, Terminal(AuthOutcome::Failed))
                | (Classifying, AwaitingRedirect)
                | (Classifying, AwaitingSdkChallenge)
                | (Classifying, Resolving)
                | (Classifying, Terminal(AuthOutcome::Failed))
                | (AwaitingRedirect | AwaitingSdkChallenge, Resolving)
                | (
                    AwaitingRedirect | AwaitingSdkChallenge,
                    Terminal(AuthOutcome::Canceled | AuthOutcome::Failed)
                )
                | (Resolving, Terminal(_))
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AuthState::Terminal(_))
    }

    /// Moves to `next` and logs the step.
    ///
    /// Unexpected steps panic in debug builds. Release builds log them and
    /// still take the step.
    pub fn advance(self, intent_id: &str, next: AuthState) -> AuthState {
        if self.can_transition_to(&next) {
            debug!(intent_id, from = %self, to = %next, "auth state transition");
        } else {
            warn!(intent_id, from = %self, to = %next, "unexpected auth state transition");
            debug_assert!(
                self.can_transition_to(&next),
                "unexpected auth state transition {self} -> {next}"
            );
        }
        next
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Terminal(outcome) => write!(f, "Terminal({outcome:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Final payload handed to the caller's callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAuthResult {
    pub intent: PaymentIntent,
    pub outcome: AuthOutcome,
}

/// Receives the single result of an attempt.
pub type AuthCallback = Box<dyn FnOnce(Result<PaymentAuthResult>) + Send + 'static>;

/// Opaque handle to the host surface that launches flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    pub name: String,
}

impl HostContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Status a UI flow reports when it finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FlowStatus {
    Completed,
    Canceled,
    Failed,
    Unknown(String),
}

impl From<String> for FlowStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "completed" | "succeeded" => FlowStatus::Completed,
            "canceled" => FlowStatus::Canceled,
            "failed" => FlowStatus::Failed,
            _ => FlowStatus::Unknown(code),
        }
    }
}

impl From<FlowStatus> for String {
    fn from(status: FlowStatus) -> Self {
        match status {
            FlowStatus::Completed => "completed".to_string(),
            FlowStatus::Canceled => "canceled".to_string(),
            FlowStatus::Failed => "failed".to_string(),
            FlowStatus::Unknown(code) => code,
        }
    }
}

/// Completion message a UI flow delivers back through the host's result channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCompletion {
    pub client_secret: String,
    pub status: FlowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FlowCompletion {
    pub fn completed(client_secret: impl Into<String>) -> Self {
        Self {
            client_secret: client_secret.into(),
            status: FlowStatus::Completed,
            error: None,
        }
    }

    pub fn canceled(client_secret: impl Into<String>) -> Self {
        Self {
            client_secret: client_secret.into(),
            status: FlowStatus::Canceled,
            error: None,
        }
    }

    pub fn failed(client_secret: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            client_secret: client_secret.into(),
            status: FlowStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn intent_id(&self) -> &str {
        PaymentIntent::parse_id_from_client_secret(&self.client_secret)
    }
}

/// Request to open an external redirect (3DS1 or `redirect_to_url`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectFlowRequest {
    pub request_code: i32,
    pub client_secret: String,
    pub url: String,
    pub return_url: Option<String>,
}

/// Request to run the in-process 3DS2 challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeFlowRequest {
    pub request_code: i32,
    pub client_secret: String,
    pub fingerprint: Map<String, Value>,
}
