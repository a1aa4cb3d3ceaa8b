use crate::domain::params::{ConfirmPaymentIntentParams, Credential};
use crate::domain::payment_intent::PaymentIntent;
use crate::domain::ports::IntentApi;
use crate::error::{AuthError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A call observed by [`InMemoryIntentApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Confirm { intent_id: String },
    Retrieve { intent_id: String },
}

/// Failure to inject for an intent's next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFailure {
    Network(String),
    InvalidRequest(String),
    Authentication(String),
}

impl From<ScriptedFailure> for AuthError {
    fn from(failure: ScriptedFailure) -> Self {
        match failure {
            ScriptedFailure::Network(message) => AuthError::Network(message),
            ScriptedFailure::InvalidRequest(message) => AuthError::InvalidRequest(message),
            ScriptedFailure::Authentication(message) => AuthError::Authentication(message),
        }
    }
}

/// A thread-safe in-memory stand-in for the payment intents API.
///
/// Holds the current server snapshot per intent id. Confirmation moves an
/// intent to its scripted post-confirmation snapshot when one is set. Every
/// call is recorded so tests can assert on network traffic.
#[derive(Default, Clone)]
pub struct InMemoryIntentApi {
    intents: Arc<RwLock<HashMap<String, PaymentIntent>>>,
    confirmations: Arc<RwLock<HashMap<String, PaymentIntent>>>,
    failures: Arc<RwLock<HashMap<String, ScriptedFailure>>>,
    calls: Arc<RwLock<Vec<ApiCall>>>,
}

impl InMemoryIntentApi {
    /// Creates a new, empty in-memory intent API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `intent` as the current server state. Intents without an id are ignored.
    pub async fn set_intent(&self, intent: PaymentIntent) {
        if let Some(id) = intent.id().map(str::to_string) {
            self.intents.write().await.insert(id, intent);
        }
    }

    /// Sets the snapshot the next confirmation of `intent.id()` produces.
    pub async fn on_confirm(&self, intent: PaymentIntent) {
        if let Some(id) = intent.id().map(str::to_string) {
            self.confirmations.write().await.insert(id, intent);
        }
    }

    /// Makes the next call for `intent_id` fail.
    pub async fn fail_next(&self, intent_id: &str, failure: ScriptedFailure) {
        self.failures
            .write()
            .await
            .insert(intent_id.to_string(), failure);
    }

    pub async fn calls(&self) -> Vec<ApiCall> {
        self.calls.read().await.clone()
    }

    pub async fn retrieve_count(&self, intent_id: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| matches!(call, ApiCall::Retrieve { intent_id: id } if id == intent_id))
            .count()
    }

    async fn check(&self, intent_id: &str, client_secret: &str, credential: &Credential) -> Result<PaymentIntent> {
        if let Some(failure) = self.failures.write().await.remove(intent_id) {
            return Err(failure.into());
        }
        if credential.api_key.trim().is_empty() {
            return Err(AuthError::Authentication("Invalid API key provided".to_string()));
        }
        let intents = self.intents.read().await;
        let intent = intents
            .get(intent_id)
            .ok_or_else(|| AuthError::InvalidRequest(format!("No such payment_intent: '{intent_id}'")))?;
        if intent.client_secret().is_some_and(|secret| secret != client_secret) {
            return Err(AuthError::InvalidRequest(
                "The client_secret provided does not match the payment intent".to_string(),
            ));
        }
        Ok(intent.clone())
    }
}

#[async_trait]
impl IntentApi for InMemoryIntentApi {
    async fn confirm(
        &self,
        intent_id: &str,
        params: &ConfirmPaymentIntentParams,
        credential: &Credential,
    ) -> Result<PaymentIntent> {
        self.calls.write().await.push(ApiCall::Confirm {
            intent_id: intent_id.to_string(),
        });
        let current = self.check(intent_id, &params.client_secret, credential).await?;

        match self.confirmations.write().await.remove(intent_id) {
            Some(confirmed) => {
                self.intents
                    .write()
                    .await
                    .insert(intent_id.to_string(), confirmed.clone());
                Ok(confirmed)
            }
            None => Ok(current),
        }
    }

    async fn retrieve(
        &self,
        intent_id: &str,
        client_secret: &str,
        credential: &Credential,
    ) -> Result<PaymentIntent> {
        self.calls.write().await.push(ApiCall::Retrieve {
            intent_id: intent_id.to_string(),
        });
        self.check(intent_id, client_secret, credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn intent(status: &str) -> PaymentIntent {
        PaymentIntent::from_json(&json!({
            "id": "pi_1",
            "object": "payment_intent",
            "client_secret": "pi_1_secret_a",
            "status": status
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_confirm_applies_scripted_snapshot() {
        let api = InMemoryIntentApi::new();
        api.set_intent(intent("requires_confirmation")).await;
        api.on_confirm(intent("requires_action")).await;

        let credential = Credential::new("pk_test");
        let params = ConfirmPaymentIntentParams::create("pi_1_secret_a", None);
        let confirmed = api.confirm("pi_1", &params, &credential).await.unwrap();
        assert!(confirmed.requires_action());

        let retrieved = api.retrieve("pi_1", "pi_1_secret_a", &credential).await.unwrap();
        assert_eq!(retrieved, confirmed);
        assert_eq!(api.retrieve_count("pi_1").await, 1);
    }

    #[tokio::test]
    async fn test_failures_and_validation() {
        let api = InMemoryIntentApi::new();
        api.set_intent(intent("succeeded")).await;
        let credential = Credential::new("pk_test");

        api.fail_next("pi_1", ScriptedFailure::Network("connection reset".to_string()))
            .await;
        assert!(matches!(
            api.retrieve("pi_1", "pi_1_secret_a", &credential).await,
            Err(AuthError::Network(_))
        ));
        // the injected failure is consumed
        assert!(api.retrieve("pi_1", "pi_1_secret_a", &credential).await.is_ok());

        assert!(matches!(
            api.retrieve("pi_1", "pi_1_secret_wrong", &credential).await,
            Err(AuthError::InvalidRequest(_))
        ));
        assert!(matches!(
            api.retrieve("pi_missing", "pi_missing_secret_a", &credential).await,
            Err(AuthError::InvalidRequest(_))
        ));
        assert!(matches!(
            api.retrieve("pi_1", "pi_1_secret_a", &Credential::new(" ")).await,
            Err(AuthError::Authentication(_))
        ));
    }
}
