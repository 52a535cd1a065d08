//! Vertex AI RAG Engine client over the REST surface.

use super::{Corpus, ImportOperation, RagFile, RagIndex};
use crate::config::RagSettings;
use crate::error::{BriefError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Vertex AI RAG client.
pub struct VertexRagClient {
    http: reqwest::Client,
    project_id: String,
    token: String,
    settings: RagSettings,
}

impl VertexRagClient {
    pub fn new(project_id: &str, token: String, settings: RagSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: project_id.to_string(),
            token,
            settings,
        }
    }

    fn api_base(&self) -> String {
        format!(
            "https://{}-aiplatform.googleapis.com/v1beta1",
            self.settings.location
        )
    }

    fn parent(&self) -> String {
        format!(
            "projects/{}/locations/{}",
            self.project_id, self.settings.location
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;
        check_response(resp).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        check_response(resp).await
    }
}

async fn check_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(BriefError::Index(format!(
            "Request failed ({}): {}",
            status, body
        )));
    }
    Ok(resp.json().await?)
}

/// Find a corpus by display name in a `ragCorpora` list response.
fn corpus_from_list(list: &Value, display_name: &str) -> Option<Corpus> {
    list["ragCorpora"].as_array()?.iter().find_map(|c| {
        if c["displayName"].as_str() == Some(display_name) {
            Some(Corpus {
                name: c["name"].as_str()?.to_string(),
                display_name: display_name.to_string(),
            })
        } else {
            None
        }
    })
}

/// Extract the answer text from a `generateContent` response.
fn answer_from_response(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let answer: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect::<Vec<_>>()
        .join("");
    if answer.is_empty() {
        None
    } else {
        Some(answer)
    }
}

#[async_trait]
impl RagIndex for VertexRagClient {
    async fn get_corpus(&self, display_name: &str) -> Result<Option<Corpus>> {
        let url = format!("{}/{}/ragCorpora", self.api_base(), self.parent());
        let list = self.get_json(&url).await?;
        Ok(corpus_from_list(&list, display_name))
    }

    async fn create_corpus(&self, display_name: &str) -> Result<Corpus> {
        let url = format!("{}/{}/ragCorpora", self.api_base(), self.parent());
        let body = json!({
            "displayName": display_name,
            "backendConfig": {
                "ragEmbeddingModelConfig": {
                    "vertexPredictionEndpoint": {
                        "publisherModel": format!(
                            "publishers/google/models/{}",
                            self.settings.embed_model
                        )
                    }
                }
            }
        });

        info!("Creating RAG corpus '{}'", display_name);
        self.post_json(&url, &body).await?;

        // Creation is a long-running operation; the corpus becomes listable
        // shortly after. Poll the listing a few times before giving up.
        for _ in 0..5 {
            if let Some(corpus) = self.get_corpus(display_name).await? {
                return Ok(corpus);
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }

        Err(BriefError::Index(format!(
            "Corpus '{}' was created but never became visible",
            display_name
        )))
    }

    async fn import(&self, corpus: &Corpus, source_uri: &str) -> Result<ImportOperation> {
        let url = format!("{}/{}/ragFiles:import", self.api_base(), corpus.name);
        // Chunk files are pre-split JSONL; re-chunking is disabled.
        let body = json!({
            "importRagFilesConfig": {
                "gcsSource": { "uris": [source_uri] },
                "ragFileTransformationConfig": {
                    "ragFileChunkingConfig": {
                        "fixedLengthChunking": { "chunkSize": 0, "chunkOverlap": 0 }
                    }
                },
                "maxEmbeddingRequestsPerMin": self.settings.max_embedding_requests_per_min
            }
        });

        let response = self.post_json(&url, &body).await?;
        let name = response["name"].as_str().ok_or_else(|| {
            BriefError::Index("Import response carried no operation name".to_string())
        })?;

        debug!("Import operation issued: {}", name);
        Ok(ImportOperation {
            name: name.to_string(),
        })
    }

    async fn import_done(&self, operation: &ImportOperation) -> Result<bool> {
        let url = format!("{}/{}", self.api_base(), operation.name);
        let status = self.get_json(&url).await?;
        Ok(status["done"].as_bool().unwrap_or(false))
    }

    async fn list_files(&self, corpus: &Corpus) -> Result<Vec<RagFile>> {
        let url = format!("{}/{}/ragFiles", self.api_base(), corpus.name);
        let response = self.get_json(&url).await?;

        let files = response["ragFiles"]
            .as_array()
            .map(|files| {
                files
                    .iter()
                    .filter_map(|f| {
                        Some(RagFile {
                            name: f["name"].as_str()?.to_string(),
                            display_name: f["displayName"].as_str().unwrap_or("").to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(files)
    }

    async fn query(&self, corpus: &Corpus, question: &str) -> Result<String> {
        let url = format!(
            "{}/{}/publishers/google/models/{}:generateContent",
            self.api_base(),
            self.parent(),
            self.settings.query_model
        );
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": question }] }],
            "tools": [{
                "retrieval": {
                    "vertexRagStore": {
                        "ragResources": [{ "ragCorpus": corpus.name }]
                    }
                }
            }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "maxOutputTokens": self.settings.max_output_tokens
            }
        });

        let response = self.post_json(&url, &body).await?;
        answer_from_response(&response)
            .ok_or_else(|| BriefError::Index("Query returned no answer text".to_string()))
    }
}
