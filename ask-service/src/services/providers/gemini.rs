//! Gemini AI provider implementation.
//!
//! Implements single-turn text generation against Google's Gemini
//! `generateContent` REST method.

use super::{GenerationParams, ProviderError, ProviderResponse, TextProvider};
use crate::config::GeminiSettings;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const PROVIDER_NAME: &str = "Gemini";

/// Every harm category Gemini lets callers tune.
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
];

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: Option<u64>,
}

impl From<&GeminiSettings> for GeminiConfig {
    fn from(settings: &GeminiSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            api_base: settings.api_base.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    /// Without `timeout_secs` the client never gives up on a slow upstream.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the given method. The key travels as a query parameter.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn build_request(&self, prompt: &str, params: &GenerationParams) -> GenerateContentRequest {
        let safety_settings = params.disable_safety_filters.then(|| {
            HARM_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect()
        });

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
                thinking_config: params
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            }),
            safety_settings,
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProviderError {
        match self.config.timeout_secs {
            Some(secs) if err.is_timeout() => ProviderError::Timeout(secs),
            // The URL carries the API key; keep it out of the message.
            _ => ProviderError::Network(err.without_url().to_string()),
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = self.build_request(prompt, params);

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .query(&[("key", self.config.api_key.expose_secret().as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        error = %e.without_url(),
                        "Failed to read Gemini error body"
                    );
                    String::new()
                }
            };
            return Err(ProviderError::Api {
                provider: PROVIDER_NAME,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let api_response: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(parse_response(&api_response))
    }
}

/// Pull the first candidate's first text part and token usage out of a
/// `generateContent` response. Missing or mistyped fields yield `None`/0.
fn parse_response(api_response: &Value) -> ProviderResponse {
    let text = api_response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string);

    let token_count = |pointer: &str| {
        api_response
            .pointer(pointer)
            .and_then(Value::as_i64)
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0)
    };

    ProviderResponse {
        text,
        input_tokens: token_count("/usageMetadata/promptTokenCount"),
        output_tokens: token_count("/usageMetadata/candidatesTokenCount"),
    }
}

// ============================================================================
// Gemini API Request Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<SafetySetting>>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: i32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}
