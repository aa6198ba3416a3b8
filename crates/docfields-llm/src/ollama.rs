//! Ollama Provider Implementation
//!
//! Runs extraction against a local Ollama instance instead of a hosted model.
//!
//! # Examples
//!
//! ```no_run
//! use docfields_llm::OllamaProvider;
//! use docfields_domain::traits::LlmProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3");
//! let reply = LlmProvider::generate(&provider, "Say hello").unwrap();
//! ```

use crate::http::{self, RequestPolicy};
use crate::LlmError;
use docfields_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "llama3";

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    policy: RequestPolicy,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: reqwest::Client::new(),
            policy: RequestPolicy::default(),
        }
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the number of retries after a transient failure
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.policy.max_retries = max_retries;
        self
    }

    /// Give up on a request after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.policy.timeout = Some(timeout);
        self
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Response format is invalid
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let reply: OllamaGenerateResponse =
            http::post_json(&self.client, &url, &[], &request_body, &self.policy, &self.model)
                .await?;
        Ok(reply.response)
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for async function
        http::block_on(async { self.generate(prompt).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{Reply, StubServer};

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama3");
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model, "llama3");
        assert_eq!(provider.policy.max_retries, 0);
        assert!(provider.policy.timeout.is_none());
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, "mistral");
    }

    #[test]
    fn test_ollama_provider_builders() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama3")
            .with_max_retries(5)
            .with_timeout(Duration::from_secs(30));
        assert_eq!(provider.policy.max_retries, 5);
        assert_eq!(provider.policy.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_request_body_shape() {
        let body = OllamaGenerateRequest {
            model: "llama3",
            prompt: "hi",
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "llama3", "prompt": "hi", "stream": false})
        );
    }

    #[test]
    fn test_blocking_generate_retries_server_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(StubServer::start(vec![
            Reply::Status(503, r#"{"error": "loading model"}"#),
            Reply::Status(200, r#"{"response": "{\"name\": \"Ali\"}", "done": true}"#),
        ]));

        let provider = OllamaProvider::new(&server.url, "llama3").with_max_retries(1);
        let reply = LlmProviderTrait::generate(&provider, "Extract").unwrap();

        assert_eq!(reply, r#"{"name": "Ali"}"#);
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_missing_model_not_retried() {
        let server = StubServer::start(vec![Reply::Status(404, r#"{"error": "not found"}"#)]).await;
        let provider = OllamaProvider::new(&server.url, "llama9").with_max_retries(2);

        let result = provider.generate("test").await;
        assert!(matches!(result, Err(LlmError::ModelNotAvailable(m)) if m == "llama9"));
        assert_eq!(server.hits(), 1);
    }

    // Integration tests (requires running Ollama)
    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama3");
        let result = provider.generate("Say 'hello' and nothing else").await;

        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Nothing listens on port 9 (discard) on a test machine
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3");

        let result = provider.generate("test").await;

        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other.map(|_| ())),
        }
    }
}
