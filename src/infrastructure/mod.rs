//! Adapters for the domain ports that need no external systems.

pub mod executor;
pub mod flow_launcher;
pub mod in_memory;
