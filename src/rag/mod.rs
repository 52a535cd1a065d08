//! Managed RAG index abstraction.
//!
//! The index service owns embedding, storage, and retrieval of imported
//! chunk files. Import is a long-running operation: a freshly imported
//! chunk may not be queryable immediately, and callers needing freshness
//! must poll the returned handle or accept staleness.

mod vertex;

pub use vertex::VertexRagClient;

use crate::error::Result;
use async_trait::async_trait;

/// A corpus inside the index service.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    /// Full resource name, used in API calls.
    pub name: String,
    /// Human-chosen display name, used for lookup.
    pub display_name: String,
}

/// Handle for an in-flight import.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImportOperation {
    /// Operation resource name.
    pub name: String,
}

/// A file imported into a corpus.
#[derive(Debug, Clone)]
pub struct RagFile {
    pub name: String,
    pub display_name: String,
}

/// Trait for managed RAG index implementations.
#[async_trait]
pub trait RagIndex: Send + Sync {
    /// Look up a corpus by display name. `None` means not-found; other
    /// failures are errors, never conflated with absence.
    async fn get_corpus(&self, display_name: &str) -> Result<Option<Corpus>>;

    /// Create a corpus with the given display name.
    async fn create_corpus(&self, display_name: &str) -> Result<Corpus>;

    /// Explicit two-step get-then-create.
    async fn get_or_create_corpus(&self, display_name: &str) -> Result<Corpus> {
        match self.get_corpus(display_name).await? {
            Some(corpus) => Ok(corpus),
            None => self.create_corpus(display_name).await,
        }
    }

    /// Issue an import of a chunk file into the corpus. Returns the
    /// operation handle without awaiting completion.
    async fn import(&self, corpus: &Corpus, source_uri: &str) -> Result<ImportOperation>;

    /// Check whether an import operation has completed.
    async fn import_done(&self, operation: &ImportOperation) -> Result<bool>;

    /// List files currently in the corpus.
    async fn list_files(&self, corpus: &Corpus) -> Result<Vec<RagFile>>;

    /// Run a retrieval-grounded query against the corpus.
    async fn query(&self, corpus: &Corpus, question: &str) -> Result<String>;
}
