//! Task definition

use agent_core::{Agent, Error, Result};
use std::fmt;
use std::sync::Arc;

/// A unit of work owned by one agent
///
/// A task may declare upstream tasks as context. When it does, the executor
/// feeds it exactly those outputs; when it does not, it receives the outputs
/// of every task that ran before it.
pub struct Task {
    name: String,
    description: String,
    expected_output: String,
    agent: Arc<dyn Agent>,
    context: Option<Vec<Arc<Task>>>,
}

impl Task {
    /// Start building a task with a unique name
    pub fn builder(name: impl Into<String>) -> TaskBuilder {
        TaskBuilder::new(name)
    }

    /// Task name, unique within a crew
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the agent is asked to do
    pub fn description(&self) -> &str {
        &self.description
    }

    /// What a good answer looks like
    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    /// The agent that runs this task
    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }

    /// Explicit upstream tasks, if any were declared
    pub fn context(&self) -> Option<&[Arc<Task>]> {
        self.context.as_deref()
    }

    /// Names of the explicit upstream tasks
    pub fn context_names(&self) -> Vec<&str> {
        self.context()
            .map(|deps| deps.iter().map(|t| t.name()).collect())
            .unwrap_or_default()
    }

    /// Render the full prompt handed to the agent
    pub fn prompt(&self, context: &str) -> String {
        let mut prompt = format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\n\
             you MUST return the actual complete content as the final answer, not a summary.",
            self.description, self.expected_output
        );

        if !context.trim().is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(context);
        }

        prompt
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("agent", &self.agent.name())
            .field("context", &self.context_names())
            .finish_non_exhaustive()
    }
}

/// Builder for Task
pub struct TaskBuilder {
    name: String,
    description: String,
    expected_output: String,
    agent: Option<Arc<dyn Agent>>,
    context: Option<Vec<Arc<Task>>>,
}

impl TaskBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            expected_output: String::new(),
            agent: None,
            context: None,
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the expected output
    pub fn expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = expected_output.into();
        self
    }

    /// Set the owning agent
    pub fn agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Declare upstream tasks whose outputs become this task's context
    pub fn context(mut self, tasks: Vec<Arc<Task>>) -> Self {
        self.context = Some(tasks);
        self
    }

    /// Build the task
    pub fn build(self) -> Result<Task> {
        if self.name.trim().is_empty() {
            return Err(Error::InitializationFailed(
                "Task name must not be empty".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(Error::InitializationFailed(format!(
                "Task '{}' has no description",
                self.name
            )));
        }
        if self.expected_output.trim().is_empty() {
            return Err(Error::InitializationFailed(format!(
                "Task '{}' has no expected output",
                self.name
            )));
        }
        let agent = self.agent.ok_or_else(|| {
            Error::InitializationFailed(format!("Task '{}' has no agent", self.name))
        })?;

        Ok(Task {
            name: self.name,
            description: self.description,
            expected_output: self.expected_output,
            agent,
            context: self.context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Context;
    use async_trait::async_trait;

    struct NoopAgent;

    #[async_trait]
    impl Agent for NoopAgent {
        async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
            Ok(input)
        }

        fn name(&self) -> &str {
            "noop"
        }
    }

    fn task(name: &str) -> TaskBuilder {
        Task::builder(name)
            .description(format!("Do {name}"))
            .expected_output("Something useful")
            .agent(Arc::new(NoopAgent))
    }

    #[test]
    fn test_prompt_without_context() {
        let t = task("research").build().unwrap();
        assert_eq!(
            t.prompt(""),
            "Do research\n\nThis is the expected criteria for your final answer: Something useful\n\
             you MUST return the actual complete content as the final answer, not a summary."
        );
    }

    #[test]
    fn test_prompt_with_context() {
        let t = task("analysis").build().unwrap();
        let prompt = t.prompt("Fact A");
        assert!(prompt.starts_with("Do analysis\n\n"));
        assert!(prompt.ends_with("\n\nThis is the context you're working with:\nFact A"));
    }

    #[test]
    fn test_context_names() {
        let first = Arc::new(task("research").build().unwrap());
        let second = Arc::new(task("analysis").context(vec![first.clone()]).build().unwrap());
        let third = task("writing")
            .context(vec![first.clone(), second.clone()])
            .build()
            .unwrap();

        assert!(first.context().is_none());
        assert_eq!(second.context_names(), vec!["research"]);
        assert_eq!(third.context_names(), vec!["research", "analysis"]);
    }

    #[test]
    fn test_build_validation() {
        assert!(Task::builder("x").expected_output("y").agent(Arc::new(NoopAgent)).build().is_err());
        assert!(Task::builder("x").description("d").agent(Arc::new(NoopAgent)).build().is_err());
        assert!(Task::builder("x").description("d").expected_output("y").build().is_err());
        assert!(task("").build().is_err());
    }

    #[test]
    fn test_debug_shows_agent_and_context() {
        let first = Arc::new(task("research").build().unwrap());
        let second = task("analysis").context(vec![first]).build().unwrap();
        let debug = format!("{second:?}");
        assert!(debug.contains("\"analysis\""));
        assert!(debug.contains("\"noop\""));
        assert!(debug.contains("[\"research\"]"));
    }

    #[test]
    fn test_agent_receives_rendered_prompt() {
        let t = task("research").build().unwrap();
        let mut ctx = Context::new();

        let echoed =
            tokio_test::block_on(t.agent().process(t.prompt("Earlier notes"), &mut ctx)).unwrap();

        assert_eq!(echoed, t.prompt("Earlier notes"));
    }
}
