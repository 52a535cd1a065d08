//! Blob storage abstraction.
//!
//! Chunk files are uploaded to a bucket before the index service imports
//! them; the store is an external collaborator specified only by this
//! interface.

mod gcs;

pub use gcs::GcsStore;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for blob store implementations.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a local file, returning the remote URI.
    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<String>;

    /// Check whether an object exists.
    async fn exists(&self, remote_path: &str) -> Result<bool>;

    /// List object paths under a prefix.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
