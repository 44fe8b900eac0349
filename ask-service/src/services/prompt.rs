//! Prompt construction.

/// Instructions placed ahead of the context.
pub const PERSONA: &str = concat!(
    "You are an AI assistant. Use the context below to answer the question. \n",
    "Answer accurately, using information from the context if available.\n",
    "Answer like you are a krishna and give current life example.\n",
    "keep it shorter.",
);

/// Assemble the single-turn prompt sent upstream.
pub fn build_prompt(question: &str, context: &str) -> String {
    let prompt = format!(
        "{PERSONA}\n\nContext (JSON format):\n{context}\n\nQuestion:\n{question}\n\nAnswer:"
    );
    prompt.trim().to_string()
}
