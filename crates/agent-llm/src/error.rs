//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Map a non-success HTTP status and its body to an error
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            401 => LLMError::AuthenticationFailed,
            429 => LLMError::RateLimitExceeded(body),
            400 => LLMError::InvalidRequest(body),
            404 => LLMError::ModelNotFound(model.to_string()),
            _ => LLMError::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            LLMError::from_status(401, String::new(), "gpt-4o-mini"),
            LLMError::AuthenticationFailed
        ));
        assert!(matches!(
            LLMError::from_status(429, "slow down".to_string(), "gpt-4o-mini"),
            LLMError::RateLimitExceeded(body) if body == "slow down"
        ));
        assert!(matches!(
            LLMError::from_status(404, String::new(), "gpt-x"),
            LLMError::ModelNotFound(model) if model == "gpt-x"
        ));

        let err = LLMError::from_status(502, "bad gateway".to_string(), "gpt-4o-mini");
        assert_eq!(err.to_string(), "API request failed: HTTP 502: bad gateway");
    }
}
