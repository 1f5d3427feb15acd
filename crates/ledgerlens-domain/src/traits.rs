//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Implementations live in other crates.

use std::future::Future;

/// Trait for text-generation providers
///
/// Implemented by the infrastructure layer (ledgerlens-llm). A call is a single
/// request/response exchange: prompt in, generated text out.
pub trait LlmProvider {
    /// Error type for generation failures (transport, status, envelope)
    type Error;

    /// Generate a completion for `prompt` at the given sampling temperature
    fn generate(
        &self,
        prompt: &str,
        temperature: f64,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Model identifier reported in logs
    fn model_name(&self) -> &str {
        "llm"
    }
}
