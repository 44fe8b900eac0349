//! Test helpers for ask-service integration tests.
//!
//! Each test gets its own knowledge directory and a wiremock stand-in for the
//! Gemini API, so nothing leaves the machine.

#![allow(dead_code)]

use ask_service::config::{
    AskConfig, GeminiSettings, KnowledgeSettings, ObservabilitySettings, DEFAULT_KNOWLEDGE_FILE,
    DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_MODEL,
};
use ask_service::startup::build_router;
use ask_service::AppState;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";

pub const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

pub fn test_config(knowledge_dir: &Path, api_base: &str) -> AskConfig {
    AskConfig {
        common: Config { port: 0 },
        gemini: GeminiSettings {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            model: DEFAULT_MODEL.to_string(),
            api_base: api_base.to_string(),
            timeout_secs: None,
        },
        knowledge: KnowledgeSettings {
            dir: knowledge_dir.to_path_buf(),
            file_name: DEFAULT_KNOWLEDGE_FILE.to_string(),
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        },
        observability: ObservabilitySettings {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
    }
}

/// Router wired to a temp knowledge directory and a mock upstream.
pub struct TestApp {
    pub router: Router,
    pub upstream: MockServer,
    pub knowledge_dir: TempDir,
}

impl TestApp {
    /// `knowledge` is written to `data.json`; `None` leaves the directory empty.
    pub async fn spawn(knowledge: Option<&str>) -> Self {
        let knowledge_dir = tempfile::tempdir().expect("Failed to create knowledge dir");
        if let Some(contents) = knowledge {
            std::fs::write(knowledge_dir.path().join(DEFAULT_KNOWLEDGE_FILE), contents)
                .expect("Failed to write knowledge file");
        }

        let upstream = MockServer::start().await;
        let config = test_config(knowledge_dir.path(), &upstream.uri());
        let state = AppState::from_config(config).expect("Failed to build state");

        Self {
            router: build_router(state),
            upstream,
            knowledge_dir,
        }
    }

    /// Make the upstream answer every generate call with `body`.
    pub async fn upstream_responds(&self, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", TEST_API_KEY))
            .respond_with(template)
            .mount(&self.upstream)
            .await;
    }

    /// Make the upstream answer with a single text part.
    pub async fn upstream_answers(&self, text: &str) {
        self.upstream_responds(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })))
        .await;
    }

    /// Bodies of every request the upstream has seen.
    pub async fn upstream_requests(&self) -> Vec<Value> {
        self.upstream
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("Upstream body is not JSON"))
            .collect()
    }

    pub async fn post_ask(&self, body: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}
