use super::registry::{InFlightRegistry, InFlightRequest, Reservation};
use super::resolver::OutcomeResolver;
use crate::config::AuthConfig;
use crate::domain::auth::{
    AuthCallback, AuthOutcome, AuthState, ChallengeFlowRequest, HostContext, RedirectFlowRequest,
};
use crate::domain::params::{ConfirmPaymentIntentParams, Credential};
use crate::domain::payment_intent::{NextActionType, PaymentIntent, SdkData, SdkDataType};
use crate::domain::ports::{FlowLauncherRef, IntentApiRef};
use crate::error::{AuthError, Result};
use tracing::{debug, info, warn};

/// What a payment intent needs before it can be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// No customer interaction; resolve from the snapshot in hand.
    Resolve,
    Redirect {
        url: String,
        return_url: Option<String>,
    },
    SdkChallenge(SdkData),
}

/// Decides the next step for `intent`.
///
/// Unrecognized actions fail open to [`NextStep::Resolve`] so the payer is never
/// blocked on something this client cannot drive. The only error is a
/// `use_stripe_sdk` payload without its discriminator.
pub fn classify(intent: &PaymentIntent, config: &AuthConfig) -> Result<NextStep> {
    if !intent.requires_action() {
        return Ok(NextStep::Resolve);
    }
    let intent_id = intent.id().unwrap_or_default();

    match intent.next_action_type() {
        Some(NextActionType::RedirectToUrl) => match intent.redirect_data() {
            Some(redirect) => Ok(NextStep::Redirect {
                url: redirect.url,
                return_url: redirect.return_url.or_else(|| config.return_url.clone()),
            }),
            None => {
                warn!(intent_id, "redirect_to_url action without a usable url");
                Ok(NextStep::Resolve)
            }
        },
        Some(NextActionType::UseStripeSdk) => {
            let Some(sdk) = intent.stripe_sdk_data()? else {
                return Ok(NextStep::Resolve);
            };
            match sdk.sdk_type.clone() {
                SdkDataType::ThreeDs1Redirect => match sdk.redirect_url() {
                    Some(url) => Ok(NextStep::Redirect {
                        url: url.to_string(),
                        return_url: config.return_url.clone(),
                    }),
                    None => Err(AuthError::MalformedSdkPayload {
                        intent_id: intent_id.to_string(),
                        reason: "3DS1 payload without a redirect url".to_string(),
                    }),
                },
                SdkDataType::ThreeDs2Fingerprint => Ok(NextStep::SdkChallenge(sdk)),
                SdkDataType::Unknown(code) => {
                    warn!(intent_id, sdk_type = %code, "unrecognized use_stripe_sdk type, skipping authentication");
                    Ok(NextStep::Resolve)
                }
            }
        }
        Some(NextActionType::Unknown(code)) => {
            warn!(intent_id, action = %code, "unrecognized next action, skipping authentication");
            Ok(NextStep::Resolve)
        }
        None => {
            warn!(intent_id, "requires_action without a next action");
            Ok(NextStep::Resolve)
        }
    }
}

/// Confirms intents when asked to, classifies them and launches the matching UI flow.
#[derive(Clone)]
pub struct AuthDispatcher {
    config: AuthConfig,
    api: IntentApiRef,
    launcher: FlowLauncherRef,
    registry: InFlightRegistry,
    resolver: OutcomeResolver,
}

impl AuthDispatcher {
    pub fn new(
        config: AuthConfig,
        api: IntentApiRef,
        launcher: FlowLauncherRef,
        registry: InFlightRegistry,
        resolver: OutcomeResolver,
    ) -> Self {
        Self {
            config,
            api,
            launcher,
            registry,
            resolver,
        }
    }

    /// Confirms the intent, then authenticates whatever the confirmation returned.
    ///
    /// Confirmation failures end the attempt through `callback`; only a
    /// concurrent attempt for the same intent is returned as an error.
    pub async fn confirm_and_authenticate(
        &self,
        host: &HostContext,
        params: ConfirmPaymentIntentParams,
        credential: &Credential,
        callback: AuthCallback,
    ) -> Result<()> {
        let reservation = self.registry.reserve(params.intent_id())?;
        let intent_id = reservation.intent_id().to_string();
        let state = AuthState::Created.advance(&intent_id, AuthState::Confirming);

        match self.api.confirm(&intent_id, &params, credential).await {
            Ok(intent) => {
                let state = state.advance(&intent_id, AuthState::Classifying);
                // the reservation is keyed by this secret's id, so the flow must echo it
                let client_secret = params.client_secret.clone();
                self.dispatch(
                    host,
                    reservation,
                    intent,
                    client_secret,
                    credential,
                    callback,
                    state,
                );
            }
            Err(err) => {
                state.advance(&intent_id, AuthState::Terminal(AuthOutcome::Failed));
                warn!(intent_id = %intent_id, error = %err, "payment intent confirmation failed");
                self.resolver.deliver(callback, Err(err));
            }
        }
        Ok(())
    }

    /// Authenticates an intent that is already confirmed.
    ///
    /// The intent must carry a client secret, which the flow echoes back and
    /// retrieval needs. The attempt is keyed by the id inside that secret, the
    /// same key the completion is correlated by, so a snapshot whose `id`
    /// disagrees with its secret is rejected.
    pub async fn authenticate(
        &self,
        host: &HostContext,
        intent: PaymentIntent,
        credential: &Credential,
        callback: AuthCallback,
    ) -> Result<()> {
        let client_secret = intent
            .client_secret()
            .map(str::to_string)
            .ok_or_else(|| AuthError::InvalidRequest("payment intent has no client secret".to_string()))?;
        let intent_id = PaymentIntent::parse_id_from_client_secret(&client_secret).to_string();
        if let Some(id) = intent.id()
            && id != intent_id
        {
            return Err(AuthError::InvalidRequest(format!(
                "payment intent {id} does not match its client secret"
            )));
        }

        let reservation = self.registry.reserve(&intent_id)?;
        let state = AuthState::Created.advance(&intent_id, AuthState::Classifying);
        self.dispatch(host, reservation, intent, client_secret, credential, callback, state);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch(
        &self,
        host: &HostContext,
        reservation: Reservation,
        intent: PaymentIntent,
        client_secret: String,
        credential: &Credential,
        callback: AuthCallback,
        state: AuthState,
    ) {
        let intent_id = reservation.intent_id().to_string();

        let step = match classify(&intent, &self.config) {
            Ok(step) => step,
            Err(err) => {
                state.advance(&intent_id, AuthState::Terminal(AuthOutcome::Failed));
                self.resolver.deliver(callback, Err(err));
                return;
            }
        };
        debug!(intent_id = %intent_id, ?step, "classified next action");

        match step {
            NextStep::Resolve => {
                let state = state.advance(&intent_id, AuthState::Resolving);
                self.resolver.resolve_cached(&intent_id, state, intent, callback);
            }
            NextStep::Redirect { url, return_url } => {
                let state = state.advance(&intent_id, AuthState::AwaitingRedirect);
                let request = RedirectFlowRequest {
                    request_code: self.config.request_code,
                    client_secret: client_secret.clone(),
                    url,
                    return_url,
                };
                // The record must exist before the flow can possibly complete.
                reservation.commit(self.in_flight(
                    &intent_id,
                    client_secret,
                    credential,
                    intent,
                    state,
                    callback,
                ));
                info!(intent_id = %intent_id, url = %request.url, "launching redirect flow");
                self.launcher.launch_redirect_flow(request, host);
            }
            NextStep::SdkChallenge(sdk) => {
                let state = state.advance(&intent_id, AuthState::AwaitingSdkChallenge);
                let request = ChallengeFlowRequest {
                    request_code: self.config.request_code,
                    client_secret: client_secret.clone(),
                    fingerprint: sdk.data,
                };
                reservation.commit(self.in_flight(
                    &intent_id,
                    client_secret,
                    credential,
                    intent,
                    state,
                    callback,
                ));
                info!(intent_id = %intent_id, "launching 3DS2 challenge flow");
                self.launcher.launch_sdk_challenge_flow(request, host);
            }
        }
    }

    fn in_flight(
        &self,
        intent_id: &str,
        client_secret: String,
        credential: &Credential,
        intent: PaymentIntent,
        state: AuthState,
        callback: AuthCallback,
    ) -> InFlightRequest {
        InFlightRequest {
            intent_id: intent_id.to_string(),
            client_secret,
            credential: credential.clone(),
            request_code: self.config.request_code,
            intent,
            state,
            callback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn intent(status: &str, next_action: Value) -> PaymentIntent {
        PaymentIntent::from_json(&json!({
            "id": "pi_1",
            "object": "payment_intent",
            "client_secret": "pi_1_secret_x",
            "status": status,
            "next_action": next_action
        }))
        .unwrap()
    }

    #[test]
    fn test_classify_without_action_resolves() {
        let config = AuthConfig::default();
        let succeeded = intent("succeeded", Value::Null);
        assert_eq!(classify(&succeeded, &config).unwrap(), NextStep::Resolve);

        // a stale redirect payload does not matter once the intent moved on
        let processing = intent(
            "processing",
            json!({"type": "redirect_to_url", "redirect_to_url": {"url": "https://bank.example"}}),
        );
        assert_eq!(classify(&processing, &config).unwrap(), NextStep::Resolve);
    }

    #[test]
    fn test_classify_redirect_falls_back_to_configured_return_url() {
        let config = AuthConfig::default().with_return_url("app://configured");
        let pi = intent(
            "requires_action",
            json!({"type": "redirect_to_url", "redirect_to_url": {"url": "https://bank.example"}}),
        );
        assert_eq!(
            classify(&pi, &config).unwrap(),
            NextStep::Redirect {
                url: "https://bank.example".to_string(),
                return_url: Some("app://configured".to_string()),
            }
        );

        let pi = intent(
            "requires_action",
            json!({"type": "redirect_to_url", "redirect_to_url": {
                "url": "https://bank.example", "return_url": "app://payload"
            }}),
        );
        assert!(matches!(
            classify(&pi, &config).unwrap(),
            NextStep::Redirect { return_url: Some(url), .. } if url == "app://payload"
        ));
    }

    #[test]
    fn test_classify_sdk_variants() {
        let config = AuthConfig::default();

        let three_ds1 = intent(
            "requires_action",
            json!({"type": "use_stripe_sdk", "use_stripe_sdk": {
                "type": "three_d_secure_redirect", "stripe_js": "https://hooks.stripe.com/3ds1"
            }}),
        );
        assert!(matches!(
            classify(&three_ds1, &config).unwrap(),
            NextStep::Redirect { url, .. } if url == "https://hooks.stripe.com/3ds1"
        ));

        let three_ds2 = intent(
            "requires_action",
            json!({"type": "use_stripe_sdk", "use_stripe_sdk": {
                "type": "stripe_3ds2_fingerprint", "three_d_secure_2_source": "src_1"
            }}),
        );
        match classify(&three_ds2, &config).unwrap() {
            NextStep::SdkChallenge(sdk) => {
                assert!(sdk.is_3ds2());
                assert_eq!(sdk.data["three_d_secure_2_source"], "src_1");
            }
            other => panic!("expected challenge, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_unrecognized_actions_fail_open() {
        let config = AuthConfig::default();
        let unknown_action = intent("requires_action", json!({"type": "display_qr_code"}));
        assert_eq!(classify(&unknown_action, &config).unwrap(), NextStep::Resolve);

        let unknown_sdk = intent(
            "requires_action",
            json!({"type": "use_stripe_sdk", "use_stripe_sdk": {"type": "stripe_4ds"}}),
        );
        assert_eq!(classify(&unknown_sdk, &config).unwrap(), NextStep::Resolve);
    }

    #[test]
    fn test_classify_malformed_sdk_payload_is_an_error() {
        let config = AuthConfig::default();
        let missing_type = intent(
            "requires_action",
            json!({"type": "use_stripe_sdk", "use_stripe_sdk": {}}),
        );
        assert!(matches!(
            classify(&missing_type, &config),
            Err(AuthError::MalformedSdkPayload { .. })
        ));

        let missing_url = intent(
            "requires_action",
            json!({"type": "use_stripe_sdk", "use_stripe_sdk": {"type": "three_d_secure_redirect"}}),
        );
        assert!(matches!(
            classify(&missing_url, &config),
            Err(AuthError::MalformedSdkPayload { .. })
        ));
    }
}
