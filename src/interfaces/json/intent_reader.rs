use crate::domain::payment_intent::PaymentIntent;
use crate::error::{AuthError, Result};
use serde_json::Value;
use std::io::Read;

/// Reads payment intents from a JSON source.
///
/// The source may hold any sequence of whitespace-separated JSON documents.
/// A top-level array is flattened, so both `{..} {..}` and `[{..}, {..}]`
/// yield one item per intent.
pub struct IntentReader<R: Read> {
    source: R,
}

impl<R: Read> IntentReader<R> {
    /// Creates a new `IntentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily decodes intents.
    ///
    /// Documents that are not payment intents yield `InvalidRequest`. A syntax
    /// error yields `Json` and ends the stream.
    pub fn intents(self) -> impl Iterator<Item = Result<PaymentIntent>> {
        let mut failed = false;
        serde_json::Deserializer::from_reader(self.source)
            .into_iter::<Value>()
            .map_while(move |document| {
                if failed {
                    return None;
                }
                failed = document.is_err();
                Some(document)
            })
            .flat_map(|document| match document {
                Ok(Value::Array(items)) => items.into_iter().map(decode).collect::<Vec<_>>(),
                Ok(value) => vec![decode(value)],
                Err(e) => vec![Err(AuthError::from(e))],
            })
    }
}

fn decode(value: Value) -> Result<PaymentIntent> {
    PaymentIntent::from_json(&value).ok_or_else(|| {
        let object = value
            .get("object")
            .and_then(Value::as_str)
            .unwrap_or("<missing>");
        AuthError::InvalidRequest(format!("expected a payment_intent object, found {object}"))
    })
}
