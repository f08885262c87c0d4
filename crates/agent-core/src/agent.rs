//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// An agent receives a fully rendered prompt and returns text. How the text
/// is produced (a single LLM call, a stub in tests) is up to the
/// implementation. Agents are expected to be cheap to construct; the crew
/// engine builds a fresh set per run.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    ///
    /// The context carries per-run state such as the current task name and
    /// accumulated token usage.
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
