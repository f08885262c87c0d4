//! HTTP service for agent-crew
//!
//! Exposes `POST /process`, which hands a user prompt to a three-agent crew
//! (research, analysis, writing), and `GET /health`. Both routes are also
//! mounted under `/api/crewai`.
//!
//! The HTTP layer only knows about [`PromptProcessor`]; [`CrewService`] is
//! the production implementation.

pub mod error;
pub mod prompts;
pub mod routes;
pub mod service;

pub use error::{Result, ServiceError};
pub use routes::{AppState, router};
pub use service::{CrewService, PromptProcessor};
