//! Client-side orchestration of payment-intent authentication.
//!
//! Confirms a payment intent, drives whatever 3-D Secure flow the server asks
//! for and reports one terminal outcome per attempt. Transport and UI live
//! behind the ports in [`domain::ports`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
