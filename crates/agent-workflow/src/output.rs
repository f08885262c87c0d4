//! Results of a crew run

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output of a single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Task name
    pub name: String,
    /// Agent that produced the output
    pub agent: String,
    /// Task description as configured
    pub description: String,
    /// Raw text returned by the agent
    pub raw: String,
}

/// Token and request counters for a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetrics {
    /// Prompt tokens across all requests
    pub prompt_tokens: usize,
    /// Completion tokens across all requests
    pub completion_tokens: usize,
    /// Number of LLM requests that succeeded
    pub successful_requests: usize,
}

impl UsageMetrics {
    /// Prompt plus completion tokens
    pub fn total_tokens(&self) -> usize {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Output of a crew run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Output of the last task
    pub raw: String,
    /// Every task output, in execution order
    pub tasks_output: Vec<TaskOutput>,
    /// Aggregated usage
    pub token_usage: UsageMetrics,
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
