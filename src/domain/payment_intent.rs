use crate::error::{AuthError, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

const VALUE_PAYMENT_INTENT: &str = "payment_intent";
const CLIENT_SECRET_DELIMITER: &str = "_secret";

const FIELD_ID: &str = "id";
const FIELD_OBJECT: &str = "object";
const FIELD_AMOUNT: &str = "amount";
const FIELD_CANCELED_AT: &str = "canceled_at";
const FIELD_CAPTURE_METHOD: &str = "capture_method";
const FIELD_CLIENT_SECRET: &str = "client_secret";
const FIELD_CONFIRMATION_METHOD: &str = "confirmation_method";
const FIELD_CREATED: &str = "created";
const FIELD_CURRENCY: &str = "currency";
const FIELD_DESCRIPTION: &str = "description";
const FIELD_LIVEMODE: &str = "livemode";
const FIELD_NEXT_ACTION: &str = "next_action";
const FIELD_PAYMENT_METHOD_TYPES: &str = "payment_method_types";
const FIELD_RECEIPT_EMAIL: &str = "receipt_email";
const FIELD_SOURCE: &str = "source";
const FIELD_STATUS: &str = "status";
const FIELD_TYPE: &str = "type";

/// Lifecycle status of a payment intent.
///
/// Codes this crate does not know are kept verbatim in [`IntentStatus::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntentStatus {
    Canceled,
    Processing,
    RequiresAction,
    RequiresAuthorization,
    RequiresCapture,
    RequiresConfirmation,
    RequiresPaymentMethod,
    Succeeded,
    Unknown(String),
}

impl IntentStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "canceled" => Self::Canceled,
            "processing" => Self::Processing,
            "requires_action" => Self::RequiresAction,
            "requires_authorization" => Self::RequiresAuthorization,
            "requires_capture" => Self::RequiresCapture,
            "requires_confirmation" => Self::RequiresConfirmation,
            "requires_payment_method" => Self::RequiresPaymentMethod,
            "succeeded" => Self::Succeeded,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Canceled => "canceled",
            Self::Processing => "processing",
            Self::RequiresAction => "requires_action",
            Self::RequiresAuthorization => "requires_authorization",
            Self::RequiresCapture => "requires_capture",
            Self::RequiresConfirmation => "requires_confirmation",
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::Succeeded => "succeeded",
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Discriminator of the `next_action` payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NextActionType {
    RedirectToUrl,
    UseStripeSdk,
    Unknown(String),
}

impl NextActionType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "redirect_to_url" => Self::RedirectToUrl,
            "use_stripe_sdk" => Self::UseStripeSdk,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire code, which is also the key of the nested payload inside `next_action`.
    pub fn code(&self) -> &str {
        match self {
            Self::RedirectToUrl => "redirect_to_url",
            Self::UseStripeSdk => "use_stripe_sdk",
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for NextActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Target of a `redirect_to_url` next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectData {
    pub url: String,
    pub return_url: Option<String>,
}

impl RedirectData {
    const FIELD_URL: &'static str = "url";
    const FIELD_RETURN_URL: &'static str = "return_url";

    /// Builds redirect data from the nested `redirect_to_url` object.
    ///
    /// Yields `None` when `url` is missing, not a string, or empty.
    pub fn from_payload(payload: &Map<String, Value>) -> Option<Self> {
        let url = non_empty_str(payload, Self::FIELD_URL)?;
        let return_url = non_empty_str(payload, Self::FIELD_RETURN_URL);
        Some(Self {
            url: url.to_string(),
            return_url: return_url.map(str::to_string),
        })
    }
}

/// Kind of challenge requested through `use_stripe_sdk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SdkDataType {
    ThreeDs1Redirect,
    ThreeDs2Fingerprint,
    Unknown(String),
}

impl SdkDataType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "three_d_secure_redirect" => Self::ThreeDs1Redirect,
            "stripe_3ds2_fingerprint" => Self::ThreeDs2Fingerprint,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ThreeDs1Redirect => "three_d_secure_redirect",
            Self::ThreeDs2Fingerprint => "stripe_3ds2_fingerprint",
            Self::Unknown(code) => code,
        }
    }
}

/// Payload of a `use_stripe_sdk` next action.
///
/// The raw object is kept intact for the challenge UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkData {
    pub sdk_type: SdkDataType,
    pub data: Map<String, Value>,
}

impl SdkData {
    const FIELD_STRIPE_JS: &'static str = "stripe_js";

    /// Reads the discriminator from an already-gated payload.
    ///
    /// A missing discriminator is a server contract violation and fails hard.
    pub fn from_payload(intent_id: &str, data: &Map<String, Value>) -> Result<Self> {
        let code = data.get(FIELD_TYPE).and_then(Value::as_str).ok_or_else(|| {
            AuthError::MalformedSdkPayload {
                intent_id: intent_id.to_string(),
                reason: "missing type discriminator".to_string(),
            }
        })?;
        Ok(Self {
            sdk_type: SdkDataType::from_code(code),
            data: data.clone(),
        })
    }

    pub fn is_3ds1(&self) -> bool {
        self.sdk_type == SdkDataType::ThreeDs1Redirect
    }

    pub fn is_3ds2(&self) -> bool {
        self.sdk_type == SdkDataType::ThreeDs2Fingerprint
    }

    /// URL embedded in a 3DS1 payload.
    pub fn redirect_url(&self) -> Option<&str> {
        non_empty_str(&self.data, Self::FIELD_STRIPE_JS)
    }
}

/// Immutable snapshot of a payment intent as returned by the server.
///
/// Every field is optional-decoded: a missing or wrong-typed value leaves that
/// field empty without failing the whole parse. `next_action_type` is derived
/// from `next_action` at parse time and has no setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    id: Option<String>,
    object_type: Option<String>,
    payment_method_types: Vec<String>,
    amount: Option<i64>,
    canceled_at: Option<i64>,
    capture_method: Option<String>,
    client_secret: Option<String>,
    confirmation_method: Option<String>,
    created: Option<i64>,
    currency: Option<String>,
    description: Option<String>,
    livemode: Option<bool>,
    next_action: Option<Map<String, Value>>,
    next_action_type: Option<NextActionType>,
    receipt_email: Option<String>,
    source: Option<String>,
    status: Option<IntentStatus>,
}

impl PaymentIntent {
    /// Parses a raw JSON document. Malformed JSON and non-intent objects yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str::<Value>(raw)
            .ok()
            .and_then(|value| Self::from_json(&value))
    }

    /// Parses a JSON value, rejecting anything whose `object` is not `"payment_intent"`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if obj.get(FIELD_OBJECT).and_then(Value::as_str) != Some(VALUE_PAYMENT_INTENT) {
            return None;
        }

        let next_action = obj.get(FIELD_NEXT_ACTION).and_then(Value::as_object).cloned();
        let next_action_type = next_action
            .as_ref()
            .and_then(|action| action.get(FIELD_TYPE))
            .and_then(Value::as_str)
            .map(NextActionType::from_code);

        let payment_method_types = obj
            .get(FIELD_PAYMENT_METHOD_TYPES)
            .and_then(Value::as_array)
            .map(|types| {
                types
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            id: opt_string(obj, FIELD_ID),
            object_type: opt_string(obj, FIELD_OBJECT),
            payment_method_types,
            amount: obj.get(FIELD_AMOUNT).and_then(Value::as_i64),
            canceled_at: obj.get(FIELD_CANCELED_AT).and_then(Value::as_i64),
            capture_method: opt_string(obj, FIELD_CAPTURE_METHOD),
            client_secret: opt_string(obj, FIELD_CLIENT_SECRET),
            confirmation_method: opt_string(obj, FIELD_CONFIRMATION_METHOD),
            created: obj.get(FIELD_CREATED).and_then(Value::as_i64),
            currency: opt_string(obj, FIELD_CURRENCY).map(|c| c.to_lowercase()),
            description: opt_string(obj, FIELD_DESCRIPTION),
            livemode: obj.get(FIELD_LIVEMODE).and_then(Value::as_bool),
            next_action,
            next_action_type,
            receipt_email: opt_string(obj, FIELD_RECEIPT_EMAIL),
            source: opt_string(obj, FIELD_SOURCE),
            status: opt_string(obj, FIELD_STATUS).map(|s| IntentStatus::from_code(&s)),
        })
    }

    /// Serializes the snapshot back to its wire shape, omitting absent fields.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        put_opt(&mut obj, FIELD_ID, self.id.clone().map(Value::String));
        put_opt(&mut obj, FIELD_OBJECT, self.object_type.clone().map(Value::String));
        obj.insert(
            FIELD_PAYMENT_METHOD_TYPES.to_string(),
            Value::Array(
                self.payment_method_types
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
        put_opt(&mut obj, FIELD_AMOUNT, self.amount.map(Value::from));
        put_opt(&mut obj, FIELD_CANCELED_AT, self.canceled_at.map(Value::from));
        put_opt(&mut obj, FIELD_CAPTURE_METHOD, self.capture_method.clone().map(Value::String));
        put_opt(&mut obj, FIELD_CLIENT_SECRET, self.client_secret.clone().map(Value::String));
        put_opt(
            &mut obj,
            FIELD_CONFIRMATION_METHOD,
            self.confirmation_method.clone().map(Value::String),
        );
        put_opt(&mut obj, FIELD_CREATED, self.created.map(Value::from));
        put_opt(&mut obj, FIELD_CURRENCY, self.currency.clone().map(Value::String));
        put_opt(&mut obj, FIELD_DESCRIPTION, self.description.clone().map(Value::String));
        put_opt(&mut obj, FIELD_LIVEMODE, self.livemode.map(Value::Bool));
        put_opt(&mut obj, FIELD_NEXT_ACTION, self.next_action.clone().map(Value::Object));
        put_opt(&mut obj, FIELD_RECEIPT_EMAIL, self.receipt_email.clone().map(Value::String));
        put_opt(&mut obj, FIELD_SOURCE, self.source.clone().map(Value::String));
        put_opt(
            &mut obj,
            FIELD_STATUS,
            self.status.as_ref().map(|s| Value::String(s.code().to_string())),
        );
        Value::Object(obj)
    }

    /// Extracts the intent id from a client secret such as `pi_123_secret_456`.
    ///
    /// Returns the whole input when the delimiter is absent.
    pub fn parse_id_from_client_secret(client_secret: &str) -> &str {
        client_secret
            .split_once(CLIENT_SECRET_DELIMITER)
            .map_or(client_secret, |(id, _)| id)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn payment_method_types(&self) -> &[String] {
        &self.payment_method_types
    }

    pub fn amount(&self) -> Option<i64> {
        self.amount
    }

    pub fn canceled_at(&self) -> Option<i64> {
        self.canceled_at
    }

    pub fn capture_method(&self) -> Option<&str> {
        self.capture_method.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn confirmation_method(&self) -> Option<&str> {
        self.confirmation_method.as_deref()
    }

    pub fn created(&self) -> Option<i64> {
        self.created
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_livemode(&self) -> Option<bool> {
        self.livemode
    }

    pub fn next_action(&self) -> Option<&Map<String, Value>> {
        self.next_action.as_ref()
    }

    pub fn next_action_type(&self) -> Option<&NextActionType> {
        self.next_action_type.as_ref()
    }

    pub fn receipt_email(&self) -> Option<&str> {
        self.receipt_email.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn status(&self) -> Option<&IntentStatus> {
        self.status.as_ref()
    }

    pub fn requires_action(&self) -> bool {
        self.status == Some(IntentStatus::RequiresAction)
    }

    pub fn requires_confirmation(&self) -> bool {
        self.status == Some(IntentStatus::RequiresConfirmation)
    }

    /// Redirect target, present only for a `redirect_to_url` action while the
    /// intent still requires action.
    pub fn redirect_data(&self) -> Option<RedirectData> {
        if self.next_action_type != Some(NextActionType::RedirectToUrl) || !self.requires_action()
        {
            return None;
        }
        let payload = self
            .next_action
            .as_ref()?
            .get(NextActionType::RedirectToUrl.code())?
            .as_object()?;
        RedirectData::from_payload(payload)
    }

    pub fn redirect_url(&self) -> Option<String> {
        self.redirect_data().map(|data| data.url)
    }

    /// SDK challenge payload, `Ok(None)` unless the next action is `use_stripe_sdk`.
    pub fn stripe_sdk_data(&self) -> Result<Option<SdkData>> {
        if self.next_action_type != Some(NextActionType::UseStripeSdk) {
            return Ok(None);
        }
        let intent_id = self.id.as_deref().unwrap_or_default();
        let payload = self
            .next_action
            .as_ref()
            .and_then(|action| action.get(NextActionType::UseStripeSdk.code()))
            .and_then(Value::as_object)
            .ok_or_else(|| AuthError::MalformedSdkPayload {
                intent_id: intent_id.to_string(),
                reason: "missing use_stripe_sdk object".to_string(),
            })?;
        SdkData::from_payload(intent_id, payload).map(Some)
    }
}

impl Hash for PaymentIntent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.object_type.hash(state);
        self.payment_method_types.hash(state);
        self.amount.hash(state);
        self.canceled_at.hash(state);
        self.capture_method.hash(state);
        self.client_secret.hash(state);
        self.confirmation_method.hash(state);
        self.created.hash(state);
        self.currency.hash(state);
        self.description.hash(state);
        self.livemode.hash(state);
        match &self.next_action {
            Some(action) => {
                1u8.hash(state);
                hash_object(action, state);
            }
            None => 0u8.hash(state),
        }
        self.next_action_type.hash(state);
        self.receipt_email.hash(state);
        self.source.hash(state);
        self.status.hash(state);
    }
}

/// Hashes `map` independently of key order, matching `Map` equality.
fn hash_object<H: Hasher>(map: &Map<String, Value>, state: &mut H) {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries.len().hash(state);
    for (key, value) in entries {
        key.hash(state);
        hash_value(value, state);
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            n.to_string().hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            hash_object(map, state);
        }
    }
}

fn opt_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    non_empty_str(obj, key)
        .filter(|s| *s != "null")
        .map(str::to_string)
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn put_opt(obj: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        obj.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn redirect_intent(status: &str) -> Value {
        json!({
            "id": "pi_1",
            "object": "payment_intent",
            "status": status,
            "next_action": {
                "type": "redirect_to_url",
                "redirect_to_url": {
                    "url": "https://hooks.stripe.com/3d_secure/authenticate",
                    "return_url": "app://return"
                }
            }
        })
    }

    #[test]
    fn test_parse_rejects_other_object_types() {
        assert!(PaymentIntent::from_json(&json!({"object": "card", "id": "pi_1"})).is_none());
        assert!(PaymentIntent::from_json(&json!({"id": "pi_1"})).is_none());
        assert!(PaymentIntent::from_json(&json!(["payment_intent"])).is_none());
        assert!(PaymentIntent::parse("not json").is_none());
    }

    #[test]
    fn test_wrong_typed_fields_degrade_to_none() {
        let intent = PaymentIntent::from_json(&json!({
            "object": "payment_intent",
            "id": 42,
            "amount": "1000",
            "livemode": "yes",
            "currency": "USD",
            "description": "null",
            "next_action": "redirect",
            "payment_method_types": ["card", 3, null]
        }))
        .unwrap();

        assert_eq!(intent.id(), None);
        assert_eq!(intent.amount(), None);
        assert_eq!(intent.is_livemode(), None);
        assert_eq!(intent.currency(), Some("usd"));
        assert_eq!(intent.description(), None);
        assert_eq!(intent.next_action(), None);
        assert_eq!(intent.next_action_type(), None);
        assert_eq!(intent.payment_method_types(), ["card".to_string()]);
    }

    #[test]
    fn test_unknown_status_and_action_codes_are_preserved() {
        let intent = PaymentIntent::from_json(&json!({
            "object": "payment_intent",
            "status": "requires_magic",
            "next_action": {"type": "display_qr_code"}
        }))
        .unwrap();

        assert_eq!(
            intent.status(),
            Some(&IntentStatus::Unknown("requires_magic".to_string()))
        );
        assert_eq!(
            intent.next_action_type(),
            Some(&NextActionType::Unknown("display_qr_code".to_string()))
        );
        assert!(intent.redirect_data().is_none());
        assert!(intent.stripe_sdk_data().unwrap().is_none());
    }

    #[test]
    fn test_redirect_url_requires_requires_action_status() {
        let intent = PaymentIntent::from_json(&redirect_intent("requires_action")).unwrap();
        assert_eq!(
            intent.redirect_url().as_deref(),
            Some("https://hooks.stripe.com/3d_secure/authenticate")
        );
        assert_eq!(
            intent.redirect_data().unwrap().return_url.as_deref(),
            Some("app://return")
        );

        for status in ["succeeded", "requires_confirmation", "processing", "canceled"] {
            let intent = PaymentIntent::from_json(&redirect_intent(status)).unwrap();
            assert_eq!(intent.redirect_url(), None, "status {status}");
        }
    }

    #[test]
    fn test_redirect_data_without_url_is_absent() {
        let intent = PaymentIntent::from_json(&json!({
            "object": "payment_intent",
            "status": "requires_action",
            "next_action": {
                "type": "redirect_to_url",
                "redirect_to_url": {"url": 7, "return_url": "app://return"}
            }
        }))
        .unwrap();
        assert_eq!(intent.next_action_type(), Some(&NextActionType::RedirectToUrl));
        assert!(intent.redirect_data().is_none());
    }

    #[test]
    fn test_sdk_data_missing_discriminator_is_fatal() {
        let intent = PaymentIntent::from_json(&json!({
            "id": "pi_sdk",
            "object": "payment_intent",
            "status": "requires_action",
            "next_action": {
                "type": "use_stripe_sdk",
                "use_stripe_sdk": {"three_d_secure_2_source": "src_1"}
            }
        }))
        .unwrap();

        match intent.stripe_sdk_data() {
            Err(AuthError::MalformedSdkPayload { intent_id, .. }) => assert_eq!(intent_id, "pi_sdk"),
            other => panic!("expected malformed payload, got {other:?}"),
        }
    }

    #[test]
    fn test_sdk_data_types() {
        let payload = json!({"type": "three_d_secure_redirect", "stripe_js": "https://hooks.stripe.com/3ds1"});
        let sdk = SdkData::from_payload("pi_1", payload.as_object().unwrap()).unwrap();
        assert!(sdk.is_3ds1());
        assert!(!sdk.is_3ds2());
        assert_eq!(sdk.redirect_url(), Some("https://hooks.stripe.com/3ds1"));

        let payload = json!({"type": "stripe_3ds2_fingerprint", "three_d_secure_2_source": "src_1"});
        let sdk = SdkData::from_payload("pi_1", payload.as_object().unwrap()).unwrap();
        assert!(sdk.is_3ds2());
        assert_eq!(sdk.redirect_url(), None);
    }

    #[test]
    fn test_parse_id_from_client_secret() {
        assert_eq!(PaymentIntent::parse_id_from_client_secret("pi_123_secret_456"), "pi_123");
        assert_eq!(PaymentIntent::parse_id_from_client_secret("no-delimiter"), "no-delimiter");
        assert_eq!(PaymentIntent::parse_id_from_client_secret(""), "");
        assert_eq!(PaymentIntent::parse_id_from_client_secret("_secret_x"), "");
    }

    #[test]
    fn test_to_json_reparses_to_equal_snapshot() {
        let original = PaymentIntent::from_json(&json!({
            "id": "pi_1",
            "object": "payment_intent",
            "amount": 1099,
            "currency": "eur",
            "client_secret": "pi_1_secret_abc",
            "livemode": false,
            "payment_method_types": ["card"],
            "status": "requires_action",
            "next_action": {"type": "use_stripe_sdk", "use_stripe_sdk": {"type": "stripe_3ds2_fingerprint"}}
        }))
        .unwrap();

        let reparsed = PaymentIntent::from_json(&original.to_json()).unwrap();
        assert_eq!(reparsed, original);
        assert!(original.to_json().get("description").is_none());
    }

    fn hash_of(intent: &PaymentIntent) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        intent.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_hash_ignores_next_action_key_order() {
        let a = PaymentIntent::parse(
            r#"{"object": "payment_intent", "id": "pi_1", "next_action": {
                "type": "use_stripe_sdk",
                "use_stripe_sdk": {"type": "stripe_3ds2_fingerprint", "directory_server": {"name": "visa", "id": 1}}
            }}"#,
        )
        .unwrap();
        let b = PaymentIntent::parse(
            r#"{"next_action": {
                "use_stripe_sdk": {"directory_server": {"id": 1, "name": "visa"}, "type": "stripe_3ds2_fingerprint"},
                "type": "use_stripe_sdk"
            }, "id": "pi_1", "object": "payment_intent"}"#,
        )
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut c_json = a.to_json();
        c_json["next_action"]["use_stripe_sdk"]["directory_server"]["id"] = json!(2);
        let c = PaymentIntent::from_json(&c_json).unwrap();
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
    }
}
