use crate::domain::auth::{AuthCallback, AuthState};
use crate::domain::params::Credential;
use crate::domain::payment_intent::PaymentIntent;
use crate::error::{AuthError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;

/// Correlation record for one authentication attempt awaiting its UI flow.
pub struct InFlightRequest {
    pub intent_id: String,
    pub client_secret: String,
    pub credential: Credential,
    pub request_code: i32,
    /// Latest snapshot seen before the flow was launched.
    pub intent: PaymentIntent,
    pub state: AuthState,
    pub callback: AuthCallback,
}

impl fmt::Debug for InFlightRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlightRequest")
            .field("intent_id", &self.intent_id)
            .field("request_code", &self.request_code)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

enum Slot {
    /// Attempt admitted but still confirming or classifying.
    Reserved,
    Awaiting(InFlightRequest),
}

/// Outstanding attempts keyed by intent id.
///
/// Dispatch inserts (reserve, then commit); the result correlator removes.
/// An id holds at most one slot, which is what rejects concurrent dispatch.
#[derive(Default, Clone)]
pub struct InFlightRegistry {
    slots: Arc<DashMap<String, Slot>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the intent id for a new attempt.
    ///
    /// Fails with `AuthenticationInProgress` if any attempt already holds it.
    pub fn reserve(&self, intent_id: &str) -> Result<Reservation> {
        match self.slots.entry(intent_id.to_string()) {
            Entry::Occupied(_) => Err(AuthError::AuthenticationInProgress {
                intent_id: intent_id.to_string(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::Reserved);
                Ok(Reservation {
                    registry: self.clone(),
                    intent_id: intent_id.to_string(),
                    released: false,
                })
            }
        }
    }

    /// Removes and returns the awaiting record for `intent_id`.
    ///
    /// Reservations that have not launched a flow yet are left alone.
    pub fn take(&self, intent_id: &str) -> Option<InFlightRequest> {
        self.slots
            .remove_if(intent_id, |_, slot| matches!(slot, Slot::Awaiting(_)))
            .and_then(|(_, slot)| match slot {
                Slot::Awaiting(request) => Some(request),
                Slot::Reserved => None,
            })
    }

    pub fn contains(&self, intent_id: &str) -> bool {
        self.slots.contains_key(intent_id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Guard over a reserved intent id.
///
/// Dropping it without [`Reservation::commit`] frees the id, so an attempt that
/// terminates early or whose future is dropped never leaves a stale slot.
pub struct Reservation {
    registry: InFlightRegistry,
    intent_id: String,
    released: bool,
}

impl Reservation {
    pub fn intent_id(&self) -> &str {
        &self.intent_id
    }

    /// Replaces the reservation with the awaiting record.
    pub fn commit(mut self, request: InFlightRequest) {
        self.registry
            .slots
            .insert(self.intent_id.clone(), Slot::Awaiting(request));
        self.released = true;
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if !self.released {
            self.registry
                .slots
                .remove_if(&self.intent_id, |_, slot| matches!(slot, Slot::Reserved));
        }
    }
}
