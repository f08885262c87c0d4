//! Execution context for agents
//!
//! The `Context` struct is a key-value store that lives for exactly one crew
//! run. The executor records which task is running; agents record how many
//! tokens they spent.

use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Name of the task currently being executed
    pub const TASK_NAME: &str = "task_name";
    /// Prompt tokens consumed so far in this run
    pub const INPUT_TOKENS: &str = "input_tokens";
    /// Completion tokens consumed so far in this run
    pub const OUTPUT_TOKENS: &str = "output_tokens";
    /// Number of LLM requests issued so far in this run
    pub const REQUESTS: &str = "requests";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let mut ctx = Context::new().with_task_name("research");
/// ctx.record_usage(120, 40);
///
/// assert_eq!(ctx.task_name(), Some("research"));
/// assert_eq!(ctx.input_tokens(), 120);
/// assert_eq!(ctx.requests(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current task name
    pub fn with_task_name(mut self, name: impl Into<String>) -> Self {
        self.set_task_name(name);
        self
    }

    /// Get the current task name
    pub fn task_name(&self) -> Option<&str> {
        self.get(keys::TASK_NAME).and_then(|v| v.as_str())
    }

    /// Set the current task name
    pub fn set_task_name(&mut self, name: impl Into<String>) {
        self.insert(keys::TASK_NAME, serde_json::json!(name.into()));
    }

    /// Add the token counts of one LLM request to the running totals
    pub fn record_usage(&mut self, input_tokens: usize, output_tokens: usize) {
        self.add_counter(keys::INPUT_TOKENS, input_tokens);
        self.add_counter(keys::OUTPUT_TOKENS, output_tokens);
        self.add_counter(keys::REQUESTS, 1);
    }

    /// Prompt tokens consumed so far
    pub fn input_tokens(&self) -> usize {
        self.counter(keys::INPUT_TOKENS)
    }

    /// Completion tokens consumed so far
    pub fn output_tokens(&self) -> usize {
        self.counter(keys::OUTPUT_TOKENS)
    }

    /// LLM requests issued so far
    pub fn requests(&self) -> usize {
        self.counter(keys::REQUESTS)
    }

    fn counter(&self, key: &str) -> usize {
        self.get(key)
            .and_then(serde_json::Value::as_u64)
            .map_or(0, |v| v as usize)
    }

    fn add_counter(&mut self, key: &str, amount: usize) {
        let total = self.counter(key) + amount;
        self.insert(key, serde_json::json!(total));
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_name() {
        let mut ctx = Context::new();
        assert!(ctx.task_name().is_none());

        ctx.set_task_name("analysis");
        assert_eq!(ctx.task_name(), Some("analysis"));

        ctx.set_task_name("writing");
        assert_eq!(ctx.task_name(), Some("writing"));
        assert_eq!(ctx.get(keys::TASK_NAME), Some(&serde_json::json!("writing")));
    }

    #[test]
    fn test_usage_accumulates() {
        let mut ctx = Context::new();
        assert_eq!(ctx.input_tokens(), 0);

        ctx.record_usage(100, 20);
        ctx.record_usage(50, 30);

        assert_eq!(ctx.input_tokens(), 150);
        assert_eq!(ctx.output_tokens(), 50);
        assert_eq!(ctx.requests(), 2);
    }
}
