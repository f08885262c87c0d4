//! LLM provider abstraction layer for agent-crew
//!
//! This crate provides provider-agnostic abstractions for talking to chat
//! completion models:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - [`LLM`], a cheap-to-clone handle that binds a provider to a model
//! - The OpenAI chat-completions provider (behind the `openai` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod model;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use model::LLM;
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "openai")]
pub mod providers;
