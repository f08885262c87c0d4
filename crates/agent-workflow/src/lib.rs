//! Multi-agent orchestration for agent-crew
//!
//! A [`Crew`] is an ordered list of [`Task`]s, each owned by an agent. Tasks
//! may name upstream tasks whose outputs are handed to them as context. A
//! [`CrewExecutor`] runs the crew; [`SequentialExecutor`] is the default
//! implementation and runs tasks one after another in declaration order.
//!
//! # Example
//!
//! ```no_run
//! use agent_workflow::{Crew, RoleAgent, Task};
//! use agent_llm::LLM;
//! use agent_llm::providers::OpenAIProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> agent_core::Result<()> {
//! let provider = Arc::new(OpenAIProvider::from_env().map_err(|e| agent_core::Error::InitializationFailed(e.to_string()))?);
//! let llm = LLM::new(provider, "gpt-4o-mini");
//!
//! let researcher = Arc::new(
//!     RoleAgent::builder("Research Specialist")
//!         .goal("Gather facts")
//!         .backstory("You dig.")
//!         .llm(llm.clone())
//!         .build()?,
//! );
//! let writer = Arc::new(
//!     RoleAgent::builder("Content Writer")
//!         .goal("Write clearly")
//!         .backstory("You write.")
//!         .llm(llm)
//!         .build()?,
//! );
//!
//! let research = Arc::new(
//!     Task::builder("research")
//!         .description("Research Rust async runtimes")
//!         .expected_output("A list of facts")
//!         .agent(researcher)
//!         .build()?,
//! );
//! let summary = Arc::new(
//!     Task::builder("summary")
//!         .description("Summarise the research")
//!         .expected_output("Three paragraphs")
//!         .agent(writer)
//!         .context(vec![research.clone()])
//!         .build()?,
//! );
//!
//! let crew = Crew::builder().add_task(research).add_task(summary).build()?;
//! let output = crew.kickoff().await?;
//! println!("{output}");
//! # Ok(())
//! # }
//! ```

pub mod crew;
pub mod executor;
pub mod output;
pub mod role_agent;
pub mod task;

// Re-export for convenience
pub use crew::{Crew, CrewBuilder};
pub use executor::{CrewExecutor, SequentialExecutor};
pub use output::{CrewOutput, TaskOutput, UsageMetrics};
pub use role_agent::{RoleAgent, RoleAgentBuilder};
pub use task::{Task, TaskBuilder};
