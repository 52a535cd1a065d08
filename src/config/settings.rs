//! Configuration settings for brawlbrief.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub catalog: CatalogSettings,
    pub oracle: OracleSettings,
    pub filter: FilterSettings,
    pub storage: StorageSettings,
    pub rag: RagSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Directory for temporary files (chunk files before upload).
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.brawlbrief".to_string(),
            temp_dir: "/tmp/brawlbrief".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Catalog override settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct CatalogSettings {
    /// Path to a custom catalog TOML file (replaces the builtin roster).
    pub path: Option<String>,
}


/// Extraction oracle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// Whether the oracle is configured. When false the pipeline runs in
    /// local mode: transcript only, no extraction or indexing.
    pub enabled: bool,
    /// Chat model used for structured extraction.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum completion tokens.
    pub max_tokens: u32,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

/// Mention filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Name matching policy against the catalog (exact, ignore_case).
    pub match_policy: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            match_policy: "exact".to_string(),
        }
    }
}

/// Blob storage (GCS) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// GCP project ID.
    pub project_id: Option<String>,
    /// Bucket name. Defaults to "{project_id}-bucket" when unset.
    pub bucket: Option<String>,
    /// Object prefix for uploaded chunk files.
    pub upload_prefix: String,
    /// Environment variable holding the GCP OAuth access token.
    /// Read once at client construction, never inside request logic.
    pub token_env: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            project_id: None,
            bucket: None,
            upload_prefix: "rag_upload".to_string(),
            token_env: "GCP_ACCESS_TOKEN".to_string(),
        }
    }
}

impl StorageSettings {
    /// Resolve the bucket name, deriving it from the project when unset.
    pub fn bucket_name(&self) -> Option<String> {
        self.bucket.clone().or_else(|| {
            self.project_id
                .as_ref()
                .map(|p| format!("{}-bucket", p))
        })
    }

    /// Read the GCP access token from the configured environment variable.
    ///
    /// Called once at client construction; a missing token is a fatal
    /// configuration error, never a per-request one.
    pub fn load_token(&self) -> crate::error::Result<String> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(crate::error::BriefError::Config(format!(
                "{} not set. Obtain one with: gcloud auth print-access-token",
                self.token_env
            ))),
        }
    }
}

/// Managed RAG index settings (Vertex AI RAG Engine).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Corpus display name holding the indexed video chunks.
    pub corpus_name: String,
    /// Vertex AI region.
    pub location: String,
    /// Embedding model backing the corpus.
    pub embed_model: String,
    /// Generative model used for grounded queries.
    pub query_model: String,
    /// Query sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens for query answers.
    pub max_output_tokens: u32,
    /// Embedding request rate cap applied on import.
    pub max_embedding_requests_per_min: u32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            corpus_name: "youtube_videos".to_string(),
            location: "us-central1".to_string(),
            embed_model: "text-embedding-005".to_string(),
            query_model: "gemini-2.0-flash-lite".to_string(),
            temperature: 0.0,
            max_output_tokens: 256,
            max_embedding_requests_per_min: 900,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::BriefError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("brawlbrief")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}
