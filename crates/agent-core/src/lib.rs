//! Core abstractions for agent-crew
//!
//! This crate defines the fundamental traits and types shared by the LLM
//! layer, the crew engine and the HTTP service.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
