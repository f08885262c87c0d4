//! Shared utilities for agent-crew
//!
//! Logging setup and the environment-driven service configuration used by
//! the `agent-server` binary.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat};
pub use logging::init_tracing;
