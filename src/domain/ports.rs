use super::auth::{ChallengeFlowRequest, HostContext, RedirectFlowRequest};
use super::params::{ConfirmPaymentIntentParams, Credential};
use super::payment_intent::PaymentIntent;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Server-side payment intent operations.
///
/// Implementations fail only with `Network`, `InvalidRequest` or
/// `Authentication` errors.
#[async_trait]
pub trait IntentApi: Send + Sync {
    async fn confirm(
        &self,
        intent_id: &str,
        params: &ConfirmPaymentIntentParams,
        credential: &Credential,
    ) -> Result<PaymentIntent>;

    async fn retrieve(
        &self,
        intent_id: &str,
        client_secret: &str,
        credential: &Credential,
    ) -> Result<PaymentIntent>;
}

/// Starts authentication UIs on the host. Both calls return immediately; the
/// outcome comes back later as a [`FlowCompletion`](super::auth::FlowCompletion).
pub trait FlowLauncher: Send + Sync {
    fn launch_redirect_flow(&self, request: RedirectFlowRequest, host: &HostContext);
    fn launch_sdk_challenge_flow(&self, request: ChallengeFlowRequest, host: &HostContext);
}

/// Runs callbacks in whatever context the host requires for UI-safe delivery.
pub trait CallbackExecutor: Send + Sync {
    fn execute(&self, task: Box<dyn FnOnce() + Send + 'static>);
}

pub type IntentApiRef = Arc<dyn IntentApi>;
pub type FlowLauncherRef = Arc<dyn FlowLauncher>;
pub type CallbackExecutorRef = Arc<dyn CallbackExecutor>;
