pub mod ask;
pub mod knowledge;
pub mod metrics;
pub mod prompt;
pub mod providers;

pub use ask::AskService;
pub use knowledge::{FileKnowledgeSource, KnowledgeSource};
