//! Agent profiles and task description templates for the crew
//!
//! Task descriptions are MiniJinja templates with a single `prompt`
//! variable. The prompt is always passed as a value, so template syntax in
//! user input is never evaluated.

use crate::error::Result;
use minijinja::{Environment, context};

/// Role, goal and backstory of one crew member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    /// Role name, also used as the agent's name
    pub role: &'static str,
    /// What the agent tries to achieve
    pub goal: &'static str,
    /// Persona text added to the system prompt
    pub backstory: &'static str,
}

/// Gathers material on the topic
pub const RESEARCHER: AgentProfile = AgentProfile {
    role: "Research Specialist",
    goal: "Conduct thorough research and gather comprehensive information on given topics",
    backstory: "You are an expert researcher with years of experience in gathering, \
                analyzing, and synthesizing information from various sources. You have a keen eye \
                for detail and can quickly identify the most relevant and reliable information.",
};

/// Turns research into insights
pub const ANALYST: AgentProfile = AgentProfile {
    role: "Data Analyst",
    goal: "Analyze information, identify patterns, and provide insights and recommendations",
    backstory: "You are a data analyst with strong analytical skills and experience \
                in interpreting complex information. You excel at finding patterns, drawing \
                conclusions, and providing actionable insights.",
};

/// Writes the final summary
pub const WRITER: AgentProfile = AgentProfile {
    role: "Content Writer",
    goal: "Create engaging, well-structured, and informative content based on research findings",
    backstory: "You are a skilled content writer with expertise in transforming \
                complex research into clear, engaging, and accessible content. You have a talent \
                for storytelling and can adapt your writing style to different audiences.",
};

/// Task names, in execution order
pub const RESEARCH_TASK: &str = "research";
pub const ANALYSIS_TASK: &str = "analysis";
pub const WRITING_TASK: &str = "writing";

const RESEARCH_TEMPLATE: &str = "Research the following topic thoroughly: {{ prompt }}

Gather comprehensive information including:
- Key concepts and definitions
- Current trends and developments
- Important facts and statistics
- Relevant examples or case studies

Provide a detailed research summary.";

const ANALYSIS_TEMPLATE: &str = "Analyze the research findings from the previous task about: {{ prompt }}

Provide:
- Key insights and patterns
- Important implications
- Potential opportunities or challenges
- Recommendations or next steps

Base your analysis on the research provided.";

const WRITING_TEMPLATE: &str = "Create a well-structured, engaging summary based on the research and analysis about: {{ prompt }}

The content should:
- Be clear and accessible to a general audience
- Include the most important findings and insights
- Be well-organized with proper structure
- Provide actionable takeaways

Use the research and analysis from previous tasks.";

/// Expected output of the research task
pub const RESEARCH_EXPECTED_OUTPUT: &str =
    "A comprehensive research summary with key findings and relevant information";
/// Expected output of the analysis task
pub const ANALYSIS_EXPECTED_OUTPUT: &str =
    "A detailed analysis with insights, implications, and recommendations";
/// Expected output of the writing task
pub const WRITING_EXPECTED_OUTPUT: &str =
    "A well-written, structured summary that synthesizes the research and analysis";

/// Compiled task description templates
pub struct TaskTemplates {
    env: Environment<'static>,
}

impl TaskTemplates {
    /// Compile the built-in templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(RESEARCH_TASK, RESEARCH_TEMPLATE)?;
        env.add_template(ANALYSIS_TASK, ANALYSIS_TEMPLATE)?;
        env.add_template(WRITING_TASK, WRITING_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the description of the named task for a prompt
    pub fn render(&self, task: &str, prompt: &str) -> Result<String> {
        let template = self.env.get_template(task)?;
        Ok(template.render(context! { prompt => prompt })?)
    }
}

impl std::fmt::Debug for TaskTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskTemplates")
            .field("templates", &[RESEARCH_TASK, ANALYSIS_TASK, WRITING_TASK])
            .finish_non_exhaustive()
    }
}
