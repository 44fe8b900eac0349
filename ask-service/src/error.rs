//! Failure taxonomy for `/ask` and its HTTP mapping.

use crate::services::knowledge::KnowledgeError;
use crate::services::providers::ProviderError;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AskError {
    #[error("Invalid body: {{ question: string }} expected")]
    InvalidRequest,

    #[error("No knowledge loaded. Add JSON files in ./knowledge_json/ first.")]
    KnowledgeUnavailable(#[source] KnowledgeError),

    #[error(transparent)]
    Upstream(#[from] ProviderError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AskError {
    /// Label used for the `outcome` dimension of request metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            AskError::InvalidRequest => "invalid_request",
            AskError::KnowledgeUnavailable(_) => "knowledge_unavailable",
            AskError::Upstream(_) => "upstream_error",
            AskError::Internal(_) => "internal_error",
        }
    }
}

impl From<KnowledgeError> for AskError {
    fn from(err: KnowledgeError) -> Self {
        AskError::KnowledgeUnavailable(err)
    }
}

impl From<AskError> for AppError {
    fn from(err: AskError) -> Self {
        match err {
            AskError::InvalidRequest | AskError::KnowledgeUnavailable(_) => {
                AppError::BadRequest(anyhow::anyhow!(err.to_string()))
            }
            AskError::Upstream(err) => AppError::InternalError(anyhow::Error::new(err)),
            AskError::Internal(err) => AppError::InternalError(err),
        }
    }
}
