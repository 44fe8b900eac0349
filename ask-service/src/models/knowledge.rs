use serde::Serialize;

/// A named blob of text handed to the model verbatim as grounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeDocument {
    pub name: String,
    pub text: String,
}

impl KnowledgeDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
