//! Domain layer: the payment intent model, attempt vocabulary and the ports
//! the orchestrator talks to.

pub mod auth;
pub mod params;
pub mod payment_intent;
pub mod ports;
