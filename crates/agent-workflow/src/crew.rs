//! Crew definition and validation

use crate::executor::{CrewExecutor, SequentialExecutor};
use crate::output::CrewOutput;
use crate::task::Task;
use agent_core::{Agent, Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A set of agents and the ordered tasks they work on
///
/// Built through [`CrewBuilder`], which checks that the task graph can run
/// in declaration order.
pub struct Crew {
    agents: Vec<Arc<dyn Agent>>,
    tasks: Vec<Arc<Task>>,
    verbose: bool,
}

impl Crew {
    /// Start building a crew
    pub fn builder() -> CrewBuilder {
        CrewBuilder::new()
    }

    /// Registered agents, in registration order
    pub fn agents(&self) -> &[Arc<dyn Agent>] {
        &self.agents
    }

    /// Tasks, in execution order
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    /// Whether the executor logs progress at `info`
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Run the crew with the sequential executor
    pub async fn kickoff(&self) -> Result<CrewOutput> {
        self.kickoff_with(&SequentialExecutor::new()).await
    }

    /// Run the crew with a custom executor
    pub async fn kickoff_with(&self, executor: &dyn CrewExecutor) -> Result<CrewOutput> {
        executor.execute(self).await
    }
}

impl fmt::Debug for Crew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crew")
            .field(
                "agents",
                &self.agents.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("tasks", &self.tasks)
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Builder for Crew
#[derive(Default)]
pub struct CrewBuilder {
    agents: Vec<Arc<dyn Agent>>,
    tasks: Vec<Arc<Task>>,
    verbose: bool,
}

impl CrewBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent
    ///
    /// Agents that own a task are registered automatically, so this is only
    /// needed to list an agent that has no task yet.
    pub fn add_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.push(agent);
        self
    }

    /// Append a task
    pub fn add_task(mut self, task: Arc<Task>) -> Self {
        self.tasks.push(task);
        self
    }

    /// Enable progress logging
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Build and validate the crew
    pub fn build(self) -> Result<Crew> {
        if self.tasks.is_empty() {
            return Err(Error::InitializationFailed(
                "Crew needs at least one task".to_string(),
            ));
        }

        let mut seen: Vec<&Arc<Task>> = Vec::with_capacity(self.tasks.len());
        let mut names = HashSet::new();
        for task in &self.tasks {
            if !names.insert(task.name()) {
                return Err(Error::InitializationFailed(format!(
                    "Duplicate task name '{}'",
                    task.name()
                )));
            }
            for dep in task.context().unwrap_or_default() {
                if !seen.iter().any(|earlier| Arc::ptr_eq(*earlier, dep)) {
                    return Err(Error::InitializationFailed(format!(
                        "Task '{}' depends on '{}', which is not an earlier task of this crew",
                        task.name(),
                        dep.name()
                    )));
                }
            }
            seen.push(task);
        }

        let mut agents = self.agents;
        for task in &self.tasks {
            if !agents.iter().any(|a| Arc::ptr_eq(a, task.agent())) {
                agents.push(task.agent().clone());
            }
        }

        Ok(Crew {
            agents,
            tasks: self.tasks,
            verbose: self.verbose,
        })
    }
}
