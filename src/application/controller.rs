use super::correlator::{Correlation, ResultCorrelator};
use super::dispatcher::AuthDispatcher;
use super::registry::InFlightRegistry;
use super::resolver::OutcomeResolver;
use crate::config::AuthConfig;
use crate::domain::auth::{AuthCallback, FlowCompletion, HostContext};
use crate::domain::params::{ConfirmPaymentIntentParams, Credential};
use crate::domain::payment_intent::PaymentIntent;
use crate::domain::ports::{CallbackExecutorRef, FlowLauncherRef, IntentApiRef};
use crate::error::{AuthError, Result};
use tracing::{info, instrument};

/// Entry point for confirming payments and driving their authentication.
///
/// `PaymentAuthController` owns the in-flight registry and wires the dispatcher,
/// result correlator and outcome resolver together. Each attempt ends in exactly
/// one callback invocation, delivered through the configured executor and never
/// from inside a `start_*` call.
pub struct PaymentAuthController {
    dispatcher: AuthDispatcher,
    correlator: ResultCorrelator,
    resolver: OutcomeResolver,
    registry: InFlightRegistry,
}

impl PaymentAuthController {
    /// Creates a new `PaymentAuthController`.
    ///
    /// # Arguments
    ///
    /// * `config` - Request code and fallback return URL.
    /// * `api` - Confirms and retrieves payment intents.
    /// * `launcher` - Opens redirect and challenge flows on the host.
    /// * `executor` - Context callbacks are delivered in.
    pub fn new(
        config: AuthConfig,
        api: IntentApiRef,
        launcher: FlowLauncherRef,
        executor: CallbackExecutorRef,
    ) -> Self {
        let registry = InFlightRegistry::new();
        let resolver = OutcomeResolver::new(api.clone(), executor);
        let correlator = ResultCorrelator::new(config.request_code);
        let dispatcher = AuthDispatcher::new(
            config,
            api,
            launcher,
            registry.clone(),
            resolver.clone(),
        );
        Self {
            dispatcher,
            correlator,
            resolver,
            registry,
        }
    }

    /// Confirms the payment intent and authenticates it if the server asks for it.
    ///
    /// Returns `AuthenticationInProgress` if the intent already has an attempt
    /// outstanding; that attempt is left untouched and `callback` is dropped.
    #[instrument(skip_all, fields(intent_id = %params.intent_id(), host = %host.name))]
    pub async fn start_confirm_and_auth(
        &self,
        host: &HostContext,
        params: ConfirmPaymentIntentParams,
        credential: &Credential,
        callback: AuthCallback,
    ) -> Result<()> {
        self.dispatcher
            .confirm_and_authenticate(host, params, credential, callback)
            .await
    }

    /// Authenticates an already-confirmed payment intent.
    #[instrument(skip_all, fields(intent_id = intent.id().unwrap_or_default(), host = %host.name))]
    pub async fn start_auth(
        &self,
        host: &HostContext,
        intent: PaymentIntent,
        credential: &Credential,
        callback: AuthCallback,
    ) -> Result<()> {
        self.dispatcher
            .authenticate(host, intent, credential, callback)
            .await
    }

    /// Whether a result arriving on the host channel belongs to this controller.
    pub fn should_handle_result(
        &self,
        request_code: i32,
        result_code: i32,
        completion: Option<&FlowCompletion>,
    ) -> bool {
        self.correlator
            .should_handle_result(request_code, result_code, completion)
    }

    /// Consumes a flow completion and resolves the matching attempt.
    ///
    /// The attempt's own callback receives the outcome. `callback` is only used
    /// when no attempt matches, and then receives `NoResultToProcess`.
    #[instrument(skip_all, fields(intent_id = completion.intent_id()))]
    pub async fn handle_result(
        &self,
        completion: FlowCompletion,
        credential: &Credential,
        callback: AuthCallback,
    ) {
        match self.correlator.correlate(&self.registry, &completion) {
            Correlation::Miss => self
                .resolver
                .deliver(callback, Err(AuthError::NoResultToProcess)),
            Correlation::Canceled(request) => self.resolver.cancel(request),
            Correlation::Failed(request, message) => self
                .resolver
                .fail(request, AuthError::ChallengeFailed(message)),
            Correlation::Resolve(request) => self.resolver.resolve_fresh(request, credential).await,
        }
    }

    /// Drops the outstanding attempt for `intent_id` without invoking its callback.
    ///
    /// Used when the host surface is torn down before the flow reports back.
    pub fn abandon(&self, intent_id: &str) -> bool {
        let abandoned = self.registry.take(intent_id).is_some();
        if abandoned {
            info!(intent_id, "abandoned in-flight authentication");
        }
        abandoned
    }

    pub fn in_flight_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_in_flight(&self, intent_id: &str) -> bool {
        self.registry.contains(intent_id)
    }

    pub fn request_code(&self) -> i32 {
        self.correlator.request_code()
    }
}
