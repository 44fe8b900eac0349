//! Mock provider implementation for testing.

use super::{GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

enum MockOutcome {
    Answer(Option<String>),
    ApiError { status: u16, body: String },
}

/// Mock text provider returning a canned outcome and recording prompts.
pub struct MockTextProvider {
    outcome: MockOutcome,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    /// Provider that answers every prompt with `text`.
    pub fn answering(text: impl Into<String>) -> Self {
        Self::with_outcome(MockOutcome::Answer(Some(text.into())))
    }

    /// Provider whose response carries no text part.
    pub fn silent() -> Self {
        Self::with_outcome(MockOutcome::Answer(None))
    }

    /// Provider that fails every call with a non-success status.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::with_outcome(MockOutcome::ApiError {
            status,
            body: body.into(),
        })
    }

    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.outcome {
            MockOutcome::Answer(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: text.as_ref().map_or(0, |t| t.len() as i32 / 4),
            }),
            MockOutcome::ApiError { status, body } => Err(ProviderError::Api {
                provider: self.name(),
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
