//! Knowledge loading and context assembly.
//!
//! Knowledge is re-read from disk on every request so edits to the file are
//! picked up without a restart.

use crate::config::KnowledgeSettings;
use crate::models::KnowledgeDocument;
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Knowledge source returned no documents")]
    Empty,

    #[error("Knowledge file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read knowledge file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Knowledge file {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of the documents used to ground answers.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn load(&self) -> Result<Vec<KnowledgeDocument>, KnowledgeError>;
}

/// Loads a single JSON file and exposes it as one document.
pub struct FileKnowledgeSource {
    path: PathBuf,
    name: String,
}

impl FileKnowledgeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn from_settings(settings: &KnowledgeSettings) -> Self {
        Self::new(settings.file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl KnowledgeSource for FileKnowledgeSource {
    async fn load(&self) -> Result<Vec<KnowledgeDocument>, KnowledgeError> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                KnowledgeError::NotFound(self.path.clone())
            } else {
                KnowledgeError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        let data: Value = serde_json::from_str(&raw).map_err(|e| KnowledgeError::Parse {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = raw.len(),
            "Loaded knowledge file"
        );

        // Compact re-serialisation; key order is preserved.
        Ok(vec![KnowledgeDocument::new(self.name.clone(), data.to_string())])
    }
}

/// Join document texts with newlines and keep at most `max_chars` characters.
///
/// Truncation is a plain prefix cut on character boundaries.
pub fn build_context(docs: &[KnowledgeDocument], max_chars: usize) -> String {
    let mut context = docs
        .iter()
        .map(|doc| doc.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    if let Some((byte_idx, _)) = context.char_indices().nth(max_chars) {
        context.truncate(byte_idx);
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_knowledge(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn loads_single_document_named_after_file() {
        let (_dir, path) = write_knowledge("{\n  \"b\": 2,\n  \"a\": [1, 2]\n}\n");

        let docs = FileKnowledgeSource::new(&path).load().await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "data.json");
        assert_eq!(docs[0].text, r#"{"b":2,"a":[1,2]}"#);
    }

    #[tokio::test]
    async fn non_object_json_is_accepted() {
        let (_dir, path) = write_knowledge(r#"["verse one", "verse two"]"#);

        let docs = FileKnowledgeSource::new(&path).load().await.unwrap();

        assert_eq!(docs[0].text, r#"["verse one","verse two"]"#);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileKnowledgeSource::new(dir.path().join("data.json"));

        let err = source.load().await.unwrap_err();

        assert!(matches!(err, KnowledgeError::NotFound(ref p) if p == source.path()));
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let (_dir, path) = write_knowledge("{ not json");

        let err = FileKnowledgeSource::new(&path).load().await.unwrap_err();

        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }

    #[tokio::test]
    async fn directory_in_place_of_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data.json")).unwrap();

        let err = FileKnowledgeSource::new(dir.path().join("data.json"))
            .load()
            .await
            .unwrap_err();

        assert!(matches!(err, KnowledgeError::Io { .. }));
    }

    #[test]
    fn from_settings_uses_configured_file() {
        let settings = KnowledgeSettings {
            dir: PathBuf::from("/srv/kb"),
            file_name: "gita.json".to_string(),
            max_context_chars: 10,
        };
        let source = FileKnowledgeSource::from_settings(&settings);
        assert_eq!(source.path(), Path::new("/srv/kb/gita.json"));
    }

    #[test]
    fn context_joins_documents_with_newlines() {
        let docs = vec![
            KnowledgeDocument::new("a.json", "{\"a\":1}"),
            KnowledgeDocument::new("b.json", "{\"b\":2}"),
        ];
        assert_eq!(build_context(&docs, 100), "{\"a\":1}\n{\"b\":2}");
    }

    #[test]
    fn context_is_cut_to_budget() {
        let docs = vec![KnowledgeDocument::new("data.json", "abcdefghij")];
        let context = build_context(&docs, 4);
        assert_eq!(context, "abcd");
    }

    #[test]
    fn context_budget_counts_characters_not_bytes() {
        let docs = vec![KnowledgeDocument::new("data.json", "कृष्ण says hi")];
        let context = build_context(&docs, 3);
        assert_eq!(context.chars().count(), 3);
        assert_eq!(context, "कृष");
    }

    #[test]
    fn context_is_deterministic_and_bounded() {
        let docs = vec![
            KnowledgeDocument::new("a", "x".repeat(50)),
            KnowledgeDocument::new("b", "y".repeat(50)),
        ];
        for max in [0, 1, 50, 51, 101, 500] {
            let first = build_context(&docs, max);
            let second = build_context(&docs, max);
            assert_eq!(first, second);
            assert!(first.chars().count() <= max);
        }
    }

    #[test]
    fn empty_document_list_gives_empty_context() {
        assert_eq!(build_context(&[], 14_000), "");
    }
}
