//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Agent or crew could not be assembled
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// A task failed while the crew was running
    #[error("Task '{task}' failed: {source}")]
    TaskFailed {
        /// Name of the failing task
        task: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the name of the task that produced it
    pub fn in_task(self, task: impl Into<String>) -> Self {
        Error::TaskFailed {
            task: task.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ProcessingFailed("empty response".to_string());
        assert_eq!(err.to_string(), "Agent processing failed: empty response");
    }

    #[test]
    fn test_task_failed_display() {
        let err = Error::ProcessingFailed("rate limited".to_string()).in_task("research");
        assert_eq!(
            err.to_string(),
            "Task 'research' failed: Agent processing failed: rate limited"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
