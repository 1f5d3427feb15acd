//! Ledgerlens LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `ledgerlens-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Ollama `/api/generate` integration
//!
//! # Examples
//!
//! ```
//! use ledgerlens_llm::MockProvider;
//! use ledgerlens_domain::traits::LlmProvider;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let provider = MockProvider::new(r#"{"metrics": {}}"#);
//! let result = rt.block_on(provider.generate("test prompt", 0.1)).unwrap();
//! assert_eq!(result, r#"{"metrics": {}}"#);
//! ```

#![warn(missing_docs)]

pub mod ollama;

use ledgerlens_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body was not the expected envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request exceeded its deadline
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses can be keyed by a substring of the prompt, which lets a test
/// answer each statement section differently.
///
/// # Examples
///
/// ```
/// use ledgerlens_llm::MockProvider;
///
/// let mut provider = MockProvider::new("{}");
/// provider.add_response("profit or loss", r#"{"Revenue": {"current_year": 10}}"#);
/// provider.add_error("cash flows");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    call_count: Arc<Mutex<usize>>,
    temperatures: Arc<Mutex<Vec<f64>>>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            temperatures: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer prompts containing `needle` with `response`
    ///
    /// Earlier registrations win when several needles match.
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push((needle.into(), MockReply::Text(response.into())));
        }
    }

    /// Fail prompts containing `needle` with a communication error
    pub fn add_error(&mut self, needle: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push((needle.into(), MockReply::Error));
        }
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|c| *c).unwrap_or(0)
    }

    /// Temperatures passed to each call, in order
    pub fn temperatures(&self) -> Vec<f64> {
        self.temperatures
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        if let Ok(mut count) = self.call_count.lock() {
            *count = 0;
        }
    }

    fn respond(&self, prompt: &str, temperature: f64) -> Result<String, LlmError> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }
        if let Ok(mut temps) = self.temperatures.lock() {
            temps.push(temperature);
        }

        let responses = self
            .responses
            .lock()
            .map_err(|e| LlmError::Other(format!("Mock lock poisoned: {}", e)))?;
        match responses.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
            Some((_, MockReply::Text(text))) => Ok(text.clone()),
            Some((needle, MockReply::Error)) => Err(LlmError::Communication(format!(
                "Mock failure for prompt containing '{}'",
                needle
            ))),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str, temperature: f64) -> Result<String, Self::Error> {
        self.respond(prompt, temperature)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
