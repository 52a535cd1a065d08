//! Brawlbrief - Brawl Stars video briefs with managed RAG
//!
//! A CLI tool that turns Brawl Stars YouTube videos into structured,
//! catalog-checked briefs and indexes them in a managed RAG corpus for
//! grounded question answering.
//!
//! # Overview
//!
//! Brawlbrief allows you to:
//! - Fetch YouTube video transcripts and metadata
//! - Extract a structured brief (summary, topics, brawler mentions) with an LLM
//! - Filter hallucinated brawler names against the official roster
//! - Chunk briefs into retrieval units and upload them as JSONL to GCS
//! - Import chunks into a Vertex AI RAG corpus and ask grounded questions
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `catalog` - The brawler roster used to validate mentions
//! - `transcript` - YouTube transcript and metadata fetching
//! - `extraction` - Prompt contract, LLM client, and mention filter
//! - `chunking` - Chunk construction and JSONL serialization
//! - `storage` - Blob storage abstraction (GCS)
//! - `rag` - Managed RAG index abstraction (Vertex AI)
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use brawlbrief::config::Settings;
//! use brawlbrief::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let outcome = orchestrator.process("dQw4w9WgXcQ").await?;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod storage;
pub mod transcript;

pub use error::{BriefError, Result};
