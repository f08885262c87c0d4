//! Role-scoped agent backed by a language model

use agent_core::{Agent, Context, Error, Result};
use agent_llm::LLM;
use async_trait::async_trait;
use tracing::{debug, info};

/// An agent defined by a role, a goal and a backstory
///
/// The three strings become the system prompt; whatever the agent is asked
/// to do arrives as the user message. Each call is a single completion with
/// no tool loop.
#[derive(Debug, Clone)]
pub struct RoleAgent {
    role: String,
    goal: String,
    backstory: String,
    llm: LLM,
    verbose: bool,
}

impl RoleAgent {
    /// Start building an agent for the given role
    pub fn builder(role: impl Into<String>) -> RoleAgentBuilder {
        RoleAgentBuilder::new(role)
    }

    /// The agent's role
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The agent's goal
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// The agent's backstory
    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    /// The model this agent talks to
    pub fn llm(&self) -> &LLM {
        &self.llm
    }

    /// Whether the agent logs its work at `info`
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// System prompt sent with every request
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}

#[async_trait]
impl Agent for RoleAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let task = context.task_name().unwrap_or("-").to_string();
        if self.verbose {
            info!(agent = %self.role, task = %task, "Agent started task");
        }

        let response = self
            .llm
            .complete(self.system_prompt(), input)
            .await
            .map_err(|e| Error::ProcessingFailed(e.to_string()))?;

        context.record_usage(response.usage.input_tokens, response.usage.output_tokens);
        debug!(
            agent = %self.role,
            stop_reason = ?response.stop_reason,
            tokens = response.usage.total(),
            "Agent received completion"
        );

        let text = response.message.text().ok_or_else(|| {
            Error::ProcessingFailed(format!("{} received an empty response", self.role))
        })?;

        if self.verbose {
            info!(agent = %self.role, task = %task, chars = text.len(), "Agent finished task");
        }

        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        &self.role
    }
}

/// Builder for RoleAgent
pub struct RoleAgentBuilder {
    role: String,
    goal: String,
    backstory: String,
    llm: Option<LLM>,
    verbose: bool,
}

impl RoleAgentBuilder {
    /// Create a new builder
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            llm: None,
            verbose: false,
        }
    }

    /// Set the goal
    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    /// Set the backstory
    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// Bind the agent to a model
    pub fn llm(mut self, llm: LLM) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Enable task-level logging
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<RoleAgent> {
        if self.role.trim().is_empty() {
            return Err(Error::InitializationFailed(
                "Agent role must not be empty".to_string(),
            ));
        }
        let llm = self.llm.ok_or_else(|| {
            Error::InitializationFailed(format!("No LLM configured for agent '{}'", self.role))
        })?;

        Ok(RoleAgent {
            role: self.role,
            goal: self.goal,
            backstory: self.backstory,
            llm,
            verbose: self.verbose,
        })
    }
}
