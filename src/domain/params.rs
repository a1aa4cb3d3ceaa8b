use super::payment_intent::PaymentIntent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Publishable key and optional connected account used for API calls.
///
/// Key validation is the transport's concern; this type only carries the values.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credential {
    pub api_key: String,
    pub stripe_account: Option<String>,
}

impl Credential {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            stripe_account: None,
        }
    }

    pub fn with_stripe_account(mut self, account: impl Into<String>) -> Self {
        self.stripe_account = Some(account.into());
        self
    }
}

// Keys must never end up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"<redacted>")
            .field("stripe_account", &self.stripe_account)
            .finish()
    }
}

/// Parameters for confirming a payment intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmPaymentIntentParams {
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_payment_method: Option<bool>,
    /// Additional form parameters forwarded verbatim.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra_params: Map<String, Value>,
}

impl ConfirmPaymentIntentParams {
    /// Confirms with an existing payment method attached to the intent.
    pub fn create(client_secret: impl Into<String>, return_url: Option<String>) -> Self {
        Self {
            client_secret: client_secret.into(),
            payment_method_id: None,
            source_id: None,
            return_url,
            save_payment_method: None,
            extra_params: Map::new(),
        }
    }

    pub fn with_payment_method_id(
        payment_method_id: impl Into<String>,
        client_secret: impl Into<String>,
        return_url: Option<String>,
    ) -> Self {
        Self {
            payment_method_id: Some(payment_method_id.into()),
            ..Self::create(client_secret, return_url)
        }
    }

    pub fn with_source_id(
        source_id: impl Into<String>,
        client_secret: impl Into<String>,
        return_url: Option<String>,
    ) -> Self {
        Self {
            source_id: Some(source_id.into()),
            ..Self::create(client_secret, return_url)
        }
    }

    pub fn intent_id(&self) -> &str {
        PaymentIntent::parse_id_from_client_secret(&self.client_secret)
    }

    /// Flattens the parameters into the form map the transport posts.
    pub fn to_param_map(&self) -> Map<String, Value> {
        let mut params = self.extra_params.clone();
        params.insert(
            "client_secret".to_string(),
            Value::String(self.client_secret.clone()),
        );
        if let Some(payment_method_id) = &self.payment_method_id {
            params.insert(
                "payment_method".to_string(),
                Value::String(payment_method_id.clone()),
            );
        }
        if let Some(source_id) = &self.source_id {
            params.insert("source".to_string(), Value::String(source_id.clone()));
        }
        if let Some(return_url) = &self.return_url {
            params.insert("return_url".to_string(), Value::String(return_url.clone()));
        }
        if let Some(save) = self.save_payment_method {
            params.insert("save_payment_method".to_string(), Value::Bool(save));
        }
        params
    }
}
