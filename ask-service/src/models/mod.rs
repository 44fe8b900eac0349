//! Domain models for the ask service.

pub mod knowledge;

pub use knowledge::KnowledgeDocument;
