#![allow(dead_code)]

use intent_auth::application::controller::PaymentAuthController;
use intent_auth::config::AuthConfig;
use intent_auth::domain::auth::{AuthCallback, HostContext, PaymentAuthResult};
use intent_auth::domain::params::Credential;
use intent_auth::domain::ports::IntentApiRef;
use intent_auth::domain::payment_intent::PaymentIntent;
use intent_auth::error::Result;
use intent_auth::infrastructure::executor::TokioCallbackExecutor;
use intent_auth::infrastructure::flow_launcher::RecordingFlowLauncher;
use intent_auth::infrastructure::in_memory::InMemoryIntentApi;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::oneshot;

pub struct Harness {
    pub controller: PaymentAuthController,
    pub api: InMemoryIntentApi,
    pub launcher: RecordingFlowLauncher,
    pub credential: Credential,
    pub host: HostContext,
}

/// Builds a controller over in-memory adapters. Must run inside a tokio runtime.
pub fn harness() -> Harness {
    harness_with(AuthConfig::default())
}

pub fn harness_with(config: AuthConfig) -> Harness {
    let api = InMemoryIntentApi::new();
    let launcher = RecordingFlowLauncher::new();
    let controller = controller_over(config, Arc::new(api.clone()), &launcher);
    Harness {
        controller,
        api,
        launcher,
        credential: Credential::new("pk_test_123"),
        host: HostContext::new("checkout"),
    }
}

/// Builds a controller over `api`, for tests that wrap the in-memory API.
pub fn controller_over(
    config: AuthConfig,
    api: IntentApiRef,
    launcher: &RecordingFlowLauncher,
) -> PaymentAuthController {
    PaymentAuthController::new(
        config,
        api,
        Arc::new(launcher.clone()),
        Arc::new(TokioCallbackExecutor::current()),
    )
}

/// A callback that forwards its result to the returned receiver.
pub fn capture() -> (AuthCallback, oneshot::Receiver<Result<PaymentAuthResult>>) {
    let (tx, rx) = oneshot::channel();
    let callback: AuthCallback = Box::new(move |result| {
        let _ = tx.send(result);
    });
    (callback, rx)
}

pub fn intent(id: &str, status: &str, next_action: Value) -> PaymentIntent {
    PaymentIntent::from_json(&json!({
        "id": id,
        "object": "payment_intent",
        "amount": 2000,
        "currency": "usd",
        "client_secret": format!("{id}_secret_abc"),
        "status": status,
        "next_action": next_action
    }))
    .expect("fixture is a payment intent")
}

pub fn client_secret(id: &str) -> String {
    format!("{id}_secret_abc")
}

pub fn three_ds2_intent(id: &str) -> PaymentIntent {
    intent(
        id,
        "requires_action",
        json!({
            "type": "use_stripe_sdk",
            "use_stripe_sdk": {
                "type": "stripe_3ds2_fingerprint",
                "three_d_secure_2_source": "src_3ds2",
                "directory_server_name": "visa"
            }
        }),
    )
}

pub fn three_ds1_intent(id: &str) -> PaymentIntent {
    intent(
        id,
        "requires_action",
        json!({
            "type": "use_stripe_sdk",
            "use_stripe_sdk": {
                "type": "three_d_secure_redirect",
                "stripe_js": "https://hooks.stripe.com/3d_secure/authenticate/src_3ds1"
            }
        }),
    )
}

pub fn redirect_intent(id: &str) -> PaymentIntent {
    intent(
        id,
        "requires_action",
        json!({
            "type": "redirect_to_url",
            "redirect_to_url": {"url": "https://hooks.stripe.com/redirect/authenticate"}
        }),
    )
}
