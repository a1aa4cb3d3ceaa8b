use super::registry::InFlightRequest;
use crate::domain::auth::{AuthCallback, AuthOutcome, AuthState, PaymentAuthResult};
use crate::domain::params::Credential;
use crate::domain::payment_intent::{IntentStatus, PaymentIntent};
use crate::domain::ports::{CallbackExecutorRef, IntentApiRef};
use crate::error::{AuthError, Result};
use tracing::{info, warn};

/// Maps an intent's status to the outcome of the attempt that just finished.
///
/// Anything short of `succeeded` or `canceled` means the flow completed without
/// satisfying the requirement, so this attempt failed even though the intent
/// itself may still be usable.
pub fn outcome_for_status(status: Option<&IntentStatus>) -> AuthOutcome {
    match status {
        Some(IntentStatus::Succeeded) => AuthOutcome::Succeeded,
        Some(IntentStatus::Canceled) => AuthOutcome::Canceled,
        _ => AuthOutcome::Failed,
    }
}

/// Turns finished attempts into the single callback invocation the caller expects.
#[derive(Clone)]
pub struct OutcomeResolver {
    api: IntentApiRef,
    executor: CallbackExecutorRef,
}

impl OutcomeResolver {
    pub fn new(api: IntentApiRef, executor: CallbackExecutorRef) -> Self {
        Self { api, executor }
    }

    /// Hands `result` to `callback` through the host executor.
    pub fn deliver(&self, callback: AuthCallback, result: Result<PaymentAuthResult>) {
        self.executor.execute(Box::new(move || callback(result)));
    }

    /// Resolves from the snapshot already in hand; no network round trip.
    pub fn resolve_cached(
        &self,
        intent_id: &str,
        state: AuthState,
        intent: PaymentIntent,
        callback: AuthCallback,
    ) {
        let outcome = outcome_for_status(intent.status());
        state.advance(intent_id, AuthState::Terminal(outcome));
        info!(intent_id, ?outcome, "resolved without authentication");
        self.deliver(callback, Ok(PaymentAuthResult { intent, outcome }));
    }

    /// Re-fetches the intent after a UI flow reported completion.
    ///
    /// A local "completed" from the flow does not mean the server finalized the
    /// payment, so the outcome always comes from the fresh snapshot.
    pub async fn resolve_fresh(&self, request: InFlightRequest, credential: &Credential) {
        let InFlightRequest {
            intent_id,
            client_secret,
            state,
            callback,
            ..
        } = request;
        let state = state.advance(&intent_id, AuthState::Resolving);

        match self
            .api
            .retrieve(&intent_id, &client_secret, credential)
            .await
        {
            Ok(intent) => {
                let outcome = outcome_for_status(intent.status());
                state.advance(&intent_id, AuthState::Terminal(outcome));
                info!(intent_id = %intent_id, ?outcome, "authentication resolved");
                self.deliver(callback, Ok(PaymentAuthResult { intent, outcome }));
            }
            Err(err) => {
                state.advance(&intent_id, AuthState::Terminal(AuthOutcome::Failed));
                warn!(intent_id = %intent_id, error = %err, "failed to retrieve payment intent after authentication");
                self.deliver(callback, Err(err));
            }
        }
    }

    /// Ends the attempt as canceled. Cancellation is authoritative: no fetch.
    pub fn cancel(&self, request: InFlightRequest) {
        let InFlightRequest {
            intent_id,
            intent,
            state,
            callback,
            ..
        } = request;
        state.advance(&intent_id, AuthState::Terminal(AuthOutcome::Canceled));
        info!(intent_id = %intent_id, "authentication canceled by user");
        self.deliver(
            callback,
            Ok(PaymentAuthResult {
                intent,
                outcome: AuthOutcome::Canceled,
            }),
        );
    }

    pub fn fail(&self, request: InFlightRequest, error: AuthError) {
        let InFlightRequest {
            intent_id,
            state,
            callback,
            ..
        } = request;
        state.advance(&intent_id, AuthState::Terminal(AuthOutcome::Failed));
        warn!(intent_id = %intent_id, error = %error, "authentication flow failed");
        self.deliver(callback, Err(error));
    }
}
