//! Prompt processing service
//!
//! [`CrewService`] is built once at startup. Every call assembles a fresh
//! crew (three agents, three dependent tasks) around the prompt and runs it
//! to completion.

use crate::error::Result;
use crate::prompts::{
    ANALYSIS_EXPECTED_OUTPUT, ANALYSIS_TASK, ANALYST, AgentProfile, RESEARCH_EXPECTED_OUTPUT,
    RESEARCH_TASK, RESEARCHER, TaskTemplates, WRITER, WRITING_EXPECTED_OUTPUT, WRITING_TASK,
};
use agent_core::Agent;
use agent_llm::LLM;
use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
use agent_utils::Config;
use agent_workflow::{Crew, CrewExecutor, RoleAgent, SequentialExecutor, Task};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{Instrument, Span, error, info, info_span};

/// Turns a user prompt into a final text result
#[async_trait]
pub trait PromptProcessor: Send + Sync {
    /// Process the prompt and return the final text
    async fn process(&self, prompt: &str) -> Result<String>;
}

/// Runs the research, analysis and writing crew against an LLM
pub struct CrewService {
    llm: LLM,
    executor: Arc<dyn CrewExecutor>,
    templates: TaskTemplates,
    verbose: bool,
    span: Span,
}

impl CrewService {
    /// Create a service bound to the given model handle
    pub fn new(llm: LLM, service_name: &str) -> Result<Self> {
        let span = info_span!("crew_service", model = %llm.model(), service = %service_name);
        Ok(Self {
            llm,
            executor: Arc::new(SequentialExecutor::new()),
            templates: TaskTemplates::new()?,
            verbose: false,
            span,
        })
    }

    /// Create a service from configuration, talking to the configured OpenAI endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        let openai = OpenAIConfig::new(config.openai_api_key.clone())
            .with_api_base(config.openai_api_base.clone())
            .with_timeout(config.timeout_secs);
        let provider = Arc::new(OpenAIProvider::with_config(openai)?);
        let mut llm = LLM::new(provider, config.model.clone());
        if let Some(temperature) = config.temperature {
            llm = llm.with_temperature(temperature);
        }
        if let Some(max_tokens) = config.max_tokens {
            llm = llm.with_max_tokens(max_tokens);
        }

        Ok(Self::new(llm, &config.service_name)?.with_verbose(config.verbose))
    }

    /// Replace the crew executor
    pub fn with_executor(mut self, executor: Arc<dyn CrewExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Enable task progress logging in agents and crew
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The model handle shared by every agent
    pub fn llm(&self) -> &LLM {
        &self.llm
    }

    /// Assemble the crew for one prompt
    ///
    /// The analysis task sees the research output; the writing task sees
    /// both.
    pub fn build_crew(&self, prompt: &str) -> Result<Crew> {
        let researcher = self.agent(&RESEARCHER)?;
        let analyst = self.agent(&ANALYST)?;
        let writer = self.agent(&WRITER)?;

        let research = Arc::new(
            Task::builder(RESEARCH_TASK)
                .description(self.templates.render(RESEARCH_TASK, prompt)?)
                .expected_output(RESEARCH_EXPECTED_OUTPUT)
                .agent(researcher.clone())
                .build()?,
        );
        let analysis = Arc::new(
            Task::builder(ANALYSIS_TASK)
                .description(self.templates.render(ANALYSIS_TASK, prompt)?)
                .expected_output(ANALYSIS_EXPECTED_OUTPUT)
                .agent(analyst.clone())
                .context(vec![research.clone()])
                .build()?,
        );
        let writing = Arc::new(
            Task::builder(WRITING_TASK)
                .description(self.templates.render(WRITING_TASK, prompt)?)
                .expected_output(WRITING_EXPECTED_OUTPUT)
                .agent(writer.clone())
                .context(vec![research.clone(), analysis.clone()])
                .build()?,
        );

        Ok(Crew::builder()
            .add_agent(researcher)
            .add_agent(analyst)
            .add_agent(writer)
            .add_task(research)
            .add_task(analysis)
            .add_task(writing)
            .verbose(self.verbose)
            .build()?)
    }

    fn agent(&self, profile: &AgentProfile) -> Result<Arc<dyn Agent>> {
        let agent = RoleAgent::builder(profile.role)
            .goal(profile.goal)
            .backstory(profile.backstory)
            .llm(self.llm.clone())
            .verbose(self.verbose)
            .build()?;
        Ok(Arc::new(agent))
    }

    async fn run(&self, prompt: &str) -> Result<String> {
        let crew = self.build_crew(prompt)?;

        info!("Starting crew execution");
        let output = crew.kickoff_with(self.executor.as_ref()).await.map_err(|e| {
            error!("Crew execution failed: {e}");
            e
        })?;
        info!(
            tasks = output.tasks_output.len(),
            tokens = output.token_usage.total_tokens(),
            requests = output.token_usage.successful_requests,
            "Crew execution completed"
        );

        Ok(output.raw)
    }
}

impl std::fmt::Debug for CrewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrewService")
            .field("llm", &self.llm)
            .field("templates", &self.templates)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PromptProcessor for CrewService {
    async fn process(&self, prompt: &str) -> Result<String> {
        self.run(prompt).instrument(self.span.clone()).await
    }
}
