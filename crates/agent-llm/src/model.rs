//! Shared language model handle

use crate::{CompletionRequest, CompletionResponse, LLMProvider, Message, Result};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A provider bound to a model and its sampling settings
///
/// Temperature and token limit are only sent when set; otherwise the
/// provider's defaults apply. `LLM` is what agents hold. Cloning is cheap: every clone shares the same
/// provider (and therefore the same HTTP connection pool).
///
/// # Example
///
/// ```no_run
/// use agent_llm::LLM;
/// use agent_llm::providers::OpenAIProvider;
/// use std::sync::Arc;
///
/// # async fn example() -> agent_llm::Result<()> {
/// let provider = Arc::new(OpenAIProvider::from_env()?);
/// let llm = LLM::new(provider, "gpt-4o-mini").with_temperature(0.2);
///
/// let response = llm.complete("You are terse.", "Name one prime.").await?;
/// println!("{}", response.message.content);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LLM {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
}

impl LLM {
    /// Bind a provider to a model, leaving sampling settings to the provider
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token limit
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sampling temperature, if set
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Completion token limit, if set
    pub fn max_tokens(&self) -> Option<usize> {
        self.max_tokens
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send a single-turn conversation
    pub async fn complete(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<CompletionResponse> {
        let mut builder = CompletionRequest::builder(&self.model)
            .system(system)
            .add_message(Message::user(user));
        if let Some(max_tokens) = self.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        let request = builder.build();

        debug!(model = %self.model, "Dispatching completion request");
        self.provider.complete(request).await
    }
}

impl fmt::Debug for LLM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LLM")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockLLMProvider;
    use crate::{LLMError, StopReason, TokenUsage};

    #[tokio::test]
    async fn test_complete_builds_request() {
        let mut provider = MockLLMProvider::new();
        provider
            .expect_complete()
            .withf(|req| {
                req.model == "gpt-4o-mini"
                    && req.system.as_deref() == Some("be brief")
                    && req.messages == vec![Message::user("hi")]
                    && req.max_tokens == Some(256)
                    && req.temperature == Some(0.1)
            })
            .times(1)
            .returning(|_| {
                Ok(CompletionResponse {
                    message: Message::assistant("hello"),
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage {
                        input_tokens: 3,
                        output_tokens: 1,
                    },
                })
            });

        let llm = LLM::new(Arc::new(provider), "gpt-4o-mini")
            .with_temperature(0.1)
            .with_max_tokens(256);

        let response = llm.complete("be brief", "hi").await.unwrap();
        assert_eq!(response.message.text(), Some("hello"));
        assert_eq!(response.usage.total(), 4);
    }

    #[tokio::test]
    async fn test_complete_propagates_errors() {
        let mut provider = MockLLMProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::AuthenticationFailed));

        let llm = LLM::new(Arc::new(provider), "gpt-4o-mini");
        let err = llm.complete("sys", "user").await.unwrap_err();
        assert!(matches!(err, LLMError::AuthenticationFailed));
    }

    #[test]
    fn test_defaults() {
        let llm = LLM::new(Arc::new(MockLLMProvider::new()), "gpt-4o-mini");
        assert_eq!(llm.model(), "gpt-4o-mini");
        assert_eq!(llm.max_tokens(), None);
        assert_eq!(llm.temperature(), None);
    }

    #[tokio::test]
    async fn test_unset_sampling_settings_are_not_sent() {
        let mut provider = MockLLMProvider::new();
        provider
            .expect_complete()
            .withf(|req| req.max_tokens.is_none() && req.temperature.is_none())
            .times(1)
            .returning(|_| {
                Ok(CompletionResponse {
                    message: Message::assistant("ok"),
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage::default(),
                })
            });

        let llm = LLM::new(Arc::new(provider), "gpt-4o-mini");
        llm.complete("sys", "user").await.unwrap();
    }
}
