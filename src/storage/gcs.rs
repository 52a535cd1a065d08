//! Google Cloud Storage client over the JSON API.

use super::BlobStore;
use crate::config::StorageSettings;
use crate::error::{BriefError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

const API_BASE: &str = "https://storage.googleapis.com/storage/v1";
const UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1";

/// GCS-backed blob store.
#[derive(Debug)]
pub struct GcsStore {
    http: reqwest::Client,
    project_id: String,
    bucket: String,
    token: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<ObjectEntry>,
}

#[derive(Deserialize)]
struct ObjectEntry {
    name: String,
}

impl GcsStore {
    /// Create a store from settings. Credentials and project are resolved
    /// here, once; both are required.
    pub fn new(settings: &StorageSettings) -> Result<Self> {
        let project_id = settings.project_id.clone().ok_or_else(|| {
            BriefError::Config("storage.project_id is required for full mode".to_string())
        })?;
        let bucket = settings.bucket_name().ok_or_else(|| {
            BriefError::Config("storage.bucket could not be resolved".to_string())
        })?;
        let token = settings.load_token()?;

        Ok(Self {
            http: reqwest::Client::new(),
            project_id,
            bucket,
            token,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Look up the bucket. `None` means not-found; any other failure is an
    /// error in its own right, never conflated with absence.
    pub async fn get_bucket(&self) -> Result<Option<String>> {
        let url = format!("{}/b/{}", API_BASE, self.bucket);
        let resp = self.http.get(&url).bearer_auth(&self.token).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(self.bucket.clone())),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(BriefError::Storage(format!(
                    "Bucket lookup failed ({}): {}",
                    status, body
                )))
            }
        }
    }

    /// Create the bucket in the configured project.
    pub async fn create_bucket(&self) -> Result<()> {
        let url = format!("{}/b?project={}", API_BASE, self.project_id);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "name": self.bucket }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(BriefError::Storage(format!(
                "Bucket creation failed ({}): {}",
                status, body
            )));
        }

        info!("Created bucket {}", self.bucket);
        Ok(())
    }

    /// Two-step get-then-create. Absence triggers creation; other lookup
    /// failures propagate untouched.
    pub async fn ensure_bucket(&self) -> Result<()> {
        match self.get_bucket().await? {
            Some(_) => Ok(()),
            None => self.create_bucket().await,
        }
    }
}

#[async_trait]
impl BlobStore for GcsStore {
    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<String> {
        let bytes = tokio::fs::read(local_path).await?;

        let url = format!(
            "{}/b/{}/o?uploadType=media&name={}",
            UPLOAD_BASE,
            self.bucket,
            urlencoding::encode(remote_path)
        );

        debug!("Uploading {} bytes to {}", bytes.len(), remote_path);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(BriefError::Storage(format!(
                "Upload of {} failed ({}): {}",
                remote_path, status, body
            )));
        }

        Ok(format!("gs://{}/{}", self.bucket, remote_path))
    }

    async fn exists(&self, remote_path: &str) -> Result<bool> {
        let url = format!(
            "{}/b/{}/o/{}",
            API_BASE,
            self.bucket,
            urlencoding::encode(remote_path)
        );
        let resp = self.http.get(&url).bearer_auth(&self.token).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(BriefError::Storage(format!(
                    "Object lookup failed ({}): {}",
                    status, body
                )))
            }
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/b/{}/o?prefix={}",
            API_BASE,
            self.bucket,
            urlencoding::encode(prefix)
        );
        let resp = self.http.get(&url).bearer_auth(&self.token).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(BriefError::Storage(format!(
                "Object listing failed ({}): {}",
                status, body
            )));
        }

        let list: ListResponse = resp.json().await?;
        Ok(list.items.into_iter().map(|o| o.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_project() {
        let settings = StorageSettings::default();
        assert!(matches!(
            GcsStore::new(&settings).unwrap_err(),
            BriefError::Config(_)
        ));
    }

    #[test]
    fn test_list_response_parsing() {
        let json = r#"{"items": [{"name": "rag_upload/a.jsonl"}, {"name": "rag_upload/b.jsonl"}]}"#;
        let list: ListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].name, "rag_upload/a.jsonl");
    }

    #[test]
    fn test_list_response_without_items() {
        let list: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.items.is_empty());
    }
}
