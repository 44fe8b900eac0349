//! The load → truncate → generate sequence behind `POST /ask`.

use crate::dtos::AskResponse;
use crate::error::AskError;
use crate::models::KnowledgeDocument;
use crate::services::knowledge::{build_context, KnowledgeError, KnowledgeSource};
use crate::services::metrics;
use crate::services::prompt::build_prompt;
use crate::services::providers::{GenerationParams, TextProvider};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AskService {
    knowledge: Arc<dyn KnowledgeSource>,
    provider: Arc<dyn TextProvider>,
    max_context_chars: usize,
}

impl AskService {
    pub fn new(
        knowledge: Arc<dyn KnowledgeSource>,
        provider: Arc<dyn TextProvider>,
        max_context_chars: usize,
    ) -> Self {
        Self {
            knowledge,
            provider,
            max_context_chars,
        }
    }

    /// Load the current knowledge set. An empty set counts as unavailable.
    pub async fn load_knowledge(&self) -> Result<Vec<KnowledgeDocument>, AskError> {
        let docs = self.knowledge.load().await.map_err(|e| {
            tracing::warn!(error = %e, "Knowledge unavailable");
            AskError::from(e)
        })?;

        if docs.is_empty() {
            tracing::warn!("Knowledge source returned no documents");
            return Err(AskError::KnowledgeUnavailable(KnowledgeError::Empty));
        }

        Ok(docs)
    }

    /// Answer `question` from the knowledge context.
    ///
    /// The question is echoed back untouched; the answer is the trimmed first
    /// text part of the upstream response, or empty when there is none.
    pub async fn handle_ask(&self, question: &str) -> Result<AskResponse, AskError> {
        if question.trim().is_empty() {
            return Err(AskError::InvalidRequest);
        }

        let docs = self.load_knowledge().await?;
        let context = build_context(&docs, self.max_context_chars);
        metrics::record_context_chars(context.chars().count());

        let prompt = build_prompt(question, &context);

        tracing::info!(
            provider = self.provider.name(),
            model = %self.provider.model(),
            documents = docs.len(),
            context_len = context.len(),
            "Forwarding question upstream"
        );

        let started = Instant::now();
        let result = self
            .provider
            .generate(&prompt, &GenerationParams::relay())
            .await;
        metrics::record_upstream_latency(
            self.provider.name(),
            self.provider.model(),
            started.elapsed().as_secs_f64(),
        );

        let response = result.map_err(|e| {
            tracing::error!(
                provider = self.provider.name(),
                error = %e,
                "Upstream generation failed"
            );
            AskError::from(e)
        })?;
        metrics::record_tokens(
            self.provider.model(),
            response.input_tokens,
            response.output_tokens,
        );

        let answer = response
            .text
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        Ok(AskResponse {
            question: question.to_string(),
            answer,
        })
    }
}
