//! Pipeline orchestrator for brawlbrief.
//!
//! Sequences one video run: transcript, extraction, filtering, chunking,
//! serialization, upload, and index import. In local mode (oracle disabled)
//! the run stops after the transcript.

use crate::catalog::BrawlerCatalog;
use crate::chunking::{chunk_analysis, write_chunks_to_path};
use crate::config::Settings;
use crate::error::{BriefError, Result};
use crate::extraction::{
    build_brief_prompt, ExtractionClient, MatchPolicy, MentionFilter, UsageMetrics,
};
use crate::rag::{RagFile, RagIndex, VertexRagClient};
use crate::storage::{BlobStore, GcsStore};
use crate::transcript::{TranscriptSource, YoutubeTranscriptSource};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Characters of transcript surfaced in local-mode results.
const TRANSCRIPT_PREVIEW_CHARS: usize = 500;

/// The main orchestrator for the brawlbrief pipeline.
pub struct Orchestrator {
    settings: Settings,
    catalog: Arc<BrawlerCatalog>,
    filter: MentionFilter,
    transcripts: Arc<dyn TranscriptSource>,
    oracle: Option<ExtractionClient>,
    storage: Option<GcsStore>,
    index: Option<Arc<dyn RagIndex>>,
    temp_dir: PathBuf,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("temp_dir", &self.temp_dir)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create a new orchestrator from settings.
    ///
    /// Full mode wires the oracle, blob store, and index clients; all of
    /// their credential requirements fail here, at startup.
    pub fn new(settings: Settings) -> Result<Self> {
        let catalog = Arc::new(BrawlerCatalog::load(settings.catalog.path.as_deref())?);

        let policy: MatchPolicy = settings
            .filter
            .match_policy
            .parse()
            .map_err(BriefError::Config)?;
        let filter = MentionFilter::new(catalog.clone(), policy);

        let transcripts: Arc<dyn TranscriptSource> = Arc::new(YoutubeTranscriptSource::new());

        let (oracle, storage, index) = if settings.oracle.enabled {
            let oracle = ExtractionClient::new(&settings.oracle)?;
            let storage = GcsStore::new(&settings.storage)?;
            let token = settings.storage.load_token()?;
            let project_id = settings.storage.project_id.clone().ok_or_else(|| {
                BriefError::Config("GCP project_id is required for full mode".to_string())
            })?;
            let index: Arc<dyn RagIndex> = Arc::new(VertexRagClient::new(
                &project_id,
                token,
                settings.rag.clone(),
            ));
            (Some(oracle), Some(storage), Some(index))
        } else {
            info!("Oracle disabled, running in local mode");
            (None, None, None)
        };

        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            settings,
            catalog,
            filter,
            transcripts,
            oracle,
            storage,
            index,
            temp_dir,
        })
    }

    /// Create a local-mode orchestrator with an injected transcript source.
    pub fn with_transcript_source(
        settings: Settings,
        transcripts: Arc<dyn TranscriptSource>,
    ) -> Result<Self> {
        let catalog = Arc::new(BrawlerCatalog::load(settings.catalog.path.as_deref())?);
        let policy: MatchPolicy = settings
            .filter
            .match_policy
            .parse()
            .map_err(BriefError::Config)?;
        let filter = MentionFilter::new(catalog.clone(), policy);
        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            settings,
            catalog,
            filter,
            transcripts,
            oracle: None,
            storage: None,
            index: None,
            temp_dir,
        })
    }

    /// Get the catalog.
    pub fn catalog(&self) -> &BrawlerCatalog {
        &self.catalog
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Process one video URL through the pipeline.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn process(&self, input: &str) -> Result<ProcessOutcome> {
        info!("Fetching transcript");
        let transcript = self.transcripts.fetch(input).await?;
        info!(
            "Transcript fetched: {} segments, {} chars",
            transcript.segments.len(),
            transcript.full_text.len()
        );

        let (oracle, storage, index) = match (&self.oracle, &self.storage, &self.index) {
            (Some(o), Some(s), Some(i)) => (o, s, i),
            _ => {
                return Ok(ProcessOutcome::Local(LocalRunResult {
                    video_id: transcript.video_id.clone(),
                    transcript_preview: transcript.preview(TRANSCRIPT_PREVIEW_CHARS),
                    segments_count: transcript.segments.len(),
                }));
            }
        };

        // Extract
        info!("Extracting structured brief");
        let prompt = build_brief_prompt(&transcript.full_text, &self.catalog)?;
        let (analysis, usage) = oracle.extract(&prompt).await?;
        info!("{}", usage.log_line());

        // Filter hallucinated mentions against the catalog
        let filtered = self.filter.filter(&analysis);
        info!(
            "Filter kept {} of {} mentions",
            filtered.brawlers_mentioned.len(),
            analysis.brawlers_mentioned.len()
        );

        // Chunk + serialize
        let file_id = transcript.file_id();
        let chunks = chunk_analysis(&filtered, &file_id, &transcript.publish_date);
        let file_name = format!("{}_chunks.jsonl", transcript.video_id);
        let local_path = self.temp_dir.join(&file_name);
        write_chunks_to_path(&chunks, &local_path)?;
        info!("Wrote {} chunks to {}", chunks.len(), local_path.display());

        // Upload
        storage.ensure_bucket().await?;
        let remote_path = format!("{}/{}", self.settings.storage.upload_prefix, file_name);
        let chunk_uri = storage.upload(&local_path, &remote_path).await?;
        info!("Uploaded chunk file to {}", chunk_uri);

        // Index import: issued, not awaited. Imported chunks may take a
        // while to become queryable.
        let corpus = index
            .get_or_create_corpus(&self.settings.rag.corpus_name)
            .await?;
        let operation = index.import(&corpus, &chunk_uri).await?;
        info!("Import operation issued: {}", operation.name);

        if let Err(e) = std::fs::remove_file(&local_path) {
            warn!("Failed to cleanup chunk file: {}", e);
        }

        Ok(ProcessOutcome::Full(FullRunResult {
            video_id: transcript.video_id,
            title: transcript.title,
            publish_date: transcript.publish_date,
            summary: filtered.summary.clone(),
            brawlers: filtered
                .brawlers_mentioned
                .iter()
                .map(|m| m.name.clone())
                .collect(),
            chunk_count: chunks.len(),
            chunk_uri,
            import_operation: operation.name,
            usage,
        }))
    }

    /// Run a grounded query against the configured corpus.
    pub async fn query(&self, question: &str) -> Result<String> {
        let index = self.require_index()?;
        let corpus = index
            .get_corpus(&self.settings.rag.corpus_name)
            .await?
            .ok_or_else(|| {
                BriefError::Index(format!(
                    "Corpus '{}' not found; process a video first",
                    self.settings.rag.corpus_name
                ))
            })?;
        index.query(&corpus, question).await
    }

    /// List files imported into the configured corpus.
    pub async fn list_files(&self) -> Result<Vec<RagFile>> {
        let index = self.require_index()?;
        let corpus = index
            .get_corpus(&self.settings.rag.corpus_name)
            .await?
            .ok_or_else(|| {
                BriefError::Index(format!(
                    "Corpus '{}' not found; process a video first",
                    self.settings.rag.corpus_name
                ))
            })?;
        index.list_files(&corpus).await
    }

    fn require_index(&self) -> Result<&Arc<dyn RagIndex>> {
        self.index.as_ref().ok_or_else(|| {
            BriefError::Config(
                "Running in local mode; enable [oracle] and configure [storage] for index access"
                    .to_string(),
            )
        })
    }
}

/// Result of processing one video.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ProcessOutcome {
    /// Local mode: transcript only.
    Local(LocalRunResult),
    /// Full mode: extracted, chunked, uploaded, import issued.
    Full(FullRunResult),
}

/// Local-mode run summary.
#[derive(Debug, Serialize)]
pub struct LocalRunResult {
    pub video_id: String,
    pub transcript_preview: String,
    pub segments_count: usize,
}

/// Full-mode run summary.
#[derive(Debug, Serialize)]
pub struct FullRunResult {
    pub video_id: String,
    pub title: String,
    pub publish_date: String,
    pub summary: String,
    pub brawlers: Vec<String>,
    pub chunk_count: usize,
    pub chunk_uri: String,
    pub import_operation: String,
    pub usage: UsageMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{TranscriptSegment, VideoTranscript};
    use async_trait::async_trait;

    struct StubSource {
        text: String,
        segments: usize,
    }

    #[async_trait]
    impl TranscriptSource for StubSource {
        async fn fetch(&self, _input: &str) -> Result<VideoTranscript> {
            Ok(VideoTranscript {
                video_id: "stubvid0001".to_string(),
                title: "Stub_Title".to_string(),
                publish_date: "2025-07-10".to_string(),
                full_text: self.text.clone(),
                segments: (0..self.segments)
                    .map(|i| TranscriptSegment {
                        text: format!("seg {}", i),
                        start_seconds: i as f64,
                        duration_seconds: 1.0,
                    })
                    .collect(),
            })
        }
    }

    fn local_settings() -> Settings {
        let mut settings = Settings::default();
        settings.general.temp_dir = std::env::temp_dir()
            .join("brawlbrief-test")
            .to_string_lossy()
            .to_string();
        settings
    }

    #[tokio::test]
    async fn test_local_mode_preview_and_segment_count() {
        let source = Arc::new(StubSource {
            text: "a".repeat(1000),
            segments: 3,
        });
        let orchestrator =
            Orchestrator::with_transcript_source(local_settings(), source).unwrap();

        let outcome = orchestrator.process("stubvid0001").await.unwrap();
        match outcome {
            ProcessOutcome::Local(result) => {
                assert_eq!(result.video_id, "stubvid0001");
                assert_eq!(result.segments_count, 3);
                assert_eq!(result.transcript_preview.len(), 503);
                assert!(result.transcript_preview.ends_with("..."));
                assert_eq!(&result.transcript_preview[..500], "a".repeat(500));
            }
            ProcessOutcome::Full(_) => panic!("expected local outcome"),
        }
    }

    #[tokio::test]
    async fn test_local_mode_short_transcript_not_truncated() {
        let source = Arc::new(StubSource {
            text: "short transcript".to_string(),
            segments: 1,
        });
        let orchestrator =
            Orchestrator::with_transcript_source(local_settings(), source).unwrap();

        let outcome = orchestrator.process("stubvid0001").await.unwrap();
        match outcome {
            ProcessOutcome::Local(result) => {
                assert_eq!(result.transcript_preview, "short transcript");
            }
            ProcessOutcome::Full(_) => panic!("expected local outcome"),
        }
    }

    #[test]
    fn test_invalid_match_policy_is_a_config_error() {
        let mut settings = local_settings();
        settings.filter.match_policy = "ignorcase".to_string();
        let source = Arc::new(StubSource {
            text: String::new(),
            segments: 0,
        });

        let err = Orchestrator::with_transcript_source(settings, source).unwrap_err();
        match err {
            BriefError::Config(msg) => assert!(msg.contains("ignorcase")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_query_requires_full_mode() {
        let source = Arc::new(StubSource {
            text: String::new(),
            segments: 0,
        });
        let orchestrator =
            Orchestrator::with_transcript_source(local_settings(), source).unwrap();

        let err = orchestrator.query("Is Grom strong?").await.unwrap_err();
        assert!(matches!(err, BriefError::Config(_)));
    }

    #[test]
    fn test_outcome_serialization_carries_mode_tag() {
        let outcome = ProcessOutcome::Local(LocalRunResult {
            video_id: "v".to_string(),
            transcript_preview: "p".to_string(),
            segments_count: 1,
        });
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["mode"], "local");
        assert_eq!(value["segments_count"], 1);
    }
}
