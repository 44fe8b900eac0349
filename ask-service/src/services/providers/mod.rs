//! AI provider abstractions and implementations.
//!
//! The relay talks to its upstream through [`TextProvider`], so the Gemini
//! backend can be swapped for the mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} API error: {status} {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream request timed out after {0}s")]
    Timeout(u64),

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),
}

/// Result of a provider call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    /// First text part of the first candidate, if the upstream sent one.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,
}

/// Generation parameters for AI requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<i32>,

    /// Token budget for model-side reasoning. `Some(0)` turns it off.
    pub thinking_budget: Option<i32>,

    /// Ask the provider not to block any content category.
    pub disable_safety_filters: bool,
}

impl GenerationParams {
    /// Fixed configuration used for every `/ask` call.
    pub fn relay() -> Self {
        Self {
            temperature: Some(0.7),
            max_tokens: Some(512),
            thinking_budget: Some(0),
            disable_safety_filters: true,
        }
    }
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short provider name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Generate a text response for a single-turn prompt.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;
}
