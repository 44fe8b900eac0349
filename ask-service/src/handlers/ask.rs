use crate::dtos::{AskRequest, AskResponse};
use crate::error::AskError;
use crate::services::metrics;
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, Json};
use service_core::error::AppError;

/// `POST /ask` — answer a question from the knowledge context.
///
/// The body is parsed by hand so every malformed shape gets the same 400.
pub async fn ask(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AskResponse>, AppError> {
    let result = match AskRequest::from_body(&body) {
        Ok(request) => state.ask_service.handle_ask(&request.question).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => {
            metrics::record_request("ok");
            tracing::info!(answer_len = response.answer.len(), "Answered question");
            Ok(Json(response))
        }
        Err(err) => {
            metrics::record_request(err.outcome());
            match &err {
                AskError::InvalidRequest | AskError::KnowledgeUnavailable(_) => {
                    tracing::warn!(error = %err, outcome = err.outcome(), "Rejected ask request")
                }
                AskError::Upstream(_) | AskError::Internal(_) => {
                    tracing::error!(error = %err, outcome = err.outcome(), "Ask request failed")
                }
            }
            Err(err.into())
        }
    }
}
