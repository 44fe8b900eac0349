//! Request and response bodies for `POST /ask`.

use crate::error::AskError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
}

impl AskRequest {
    /// Parse a raw request body.
    ///
    /// The body must be a JSON object whose `question` is a string that is not
    /// blank. The question is kept untrimmed.
    pub fn from_body(body: &[u8]) -> Result<Self, AskError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| AskError::InvalidRequest)?;

        let question = value
            .as_object()
            .and_then(|obj| obj.get("question"))
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
            .ok_or(AskError::InvalidRequest)?;

        Ok(Self {
            question: question.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
}
