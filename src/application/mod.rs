//! Application layer containing the authentication orchestration.
//!
//! `PaymentAuthController` is the entry point. It dispatches attempts, parks
//! them in an in-flight registry while a UI flow runs, and resolves them when
//! the host delivers the flow's completion.

pub mod controller;
pub mod correlator;
pub mod dispatcher;
pub mod registry;
pub mod resolver;
