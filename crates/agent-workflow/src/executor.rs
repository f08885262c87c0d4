//! Crew execution
//!
//! The SequentialExecutor walks the task list in order:
//! 1. Collect the context for the task (declared upstream outputs, or all prior outputs)
//! 2. Render the task prompt
//! 3. Hand it to the task's agent
//! 4. Record the output; the first failure aborts the run

use crate::crew::Crew;
use crate::output::{CrewOutput, TaskOutput, UsageMetrics};
use agent_core::{Context, Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info};

/// Separator placed between upstream outputs in a task's context
pub const CONTEXT_DIVIDER: &str = "\n\n----------\n\n";

/// Runs a crew to completion
#[async_trait]
pub trait CrewExecutor: Send + Sync {
    /// Execute every task of the crew and return the final output
    async fn execute(&self, crew: &Crew) -> Result<CrewOutput>;
}

/// Executes tasks one at a time, in declaration order
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl SequentialExecutor {
    /// Create a new sequential executor
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CrewExecutor for SequentialExecutor {
    async fn execute(&self, crew: &Crew) -> Result<CrewOutput> {
        let mut context = Context::new();
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(crew.tasks().len());
        let total = crew.tasks().len();

        for (index, task) in crew.tasks().iter().enumerate() {
            if crew.is_verbose() {
                info!(
                    "Running task {}/{}: {} ({})",
                    index + 1,
                    total,
                    task.name(),
                    task.agent().name()
                );
            }

            let task_context = match task.context() {
                Some(upstream) => {
                    let by_name: HashMap<&str, &str> = outputs
                        .iter()
                        .map(|o| (o.name.as_str(), o.raw.as_str()))
                        .collect();
                    upstream
                        .iter()
                        .map(|dep| {
                            by_name.get(dep.name()).copied().ok_or_else(|| {
                                Error::ProcessingFailed(format!(
                                    "Context task '{}' has not run before '{}'",
                                    dep.name(),
                                    task.name()
                                ))
                            })
                        })
                        .collect::<Result<Vec<_>>>()?
                        .join(CONTEXT_DIVIDER)
                }
                None => outputs
                    .iter()
                    .map(|o| o.raw.as_str())
                    .collect::<Vec<_>>()
                    .join(CONTEXT_DIVIDER),
            };
            debug!(task = task.name(), context_chars = task_context.len(), "Context collected");

            context.set_task_name(task.name());
            let raw = task
                .agent()
                .process(task.prompt(&task_context), &mut context)
                .await
                .map_err(|e| e.in_task(task.name()))?;

            if crew.is_verbose() {
                info!("Task {} completed", task.name());
            }

            outputs.push(TaskOutput {
                name: task.name().to_string(),
                agent: task.agent().name().to_string(),
                description: task.description().to_string(),
                raw,
            });
        }

        let raw = outputs
            .last()
            .map(|o| o.raw.clone())
            .ok_or_else(|| Error::ProcessingFailed("Crew has no tasks".to_string()))?;

        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
            token_usage: UsageMetrics {
                prompt_tokens: context.input_tokens(),
                completion_tokens: context.output_tokens(),
                successful_requests: context.requests(),
            },
        })
    }
}
