//! YouTube transcript source.
//!
//! Metadata comes from yt-dlp; the caption track itself is downloaded
//! directly (json3 format) so no audio is ever fetched.

use super::{sanitize_title, TranscriptSegment, TranscriptSource, VideoTranscript};
use crate::error::{BriefError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

/// Caption languages tried in preference order.
const CAPTION_LANGS: &[&str] = &["en", "en-US", "en-GB", "en-orig"];

/// YouTube transcript source backed by yt-dlp.
pub struct YoutubeTranscriptSource {
    video_id_regex: Regex,
    http: reqwest::Client,
}

impl YoutubeTranscriptSource {
    pub fn new() -> Self {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        Self {
            video_id_regex,
            http: reqwest::Client::new(),
        }
    }

    /// Extract the video ID from a YouTube URL or bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Fetch video metadata and the caption track URL via yt-dlp.
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoInfo> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let output = tokio::process::Command::new("yt-dlp")
            .args(["--dump-json", "--no-download", "--no-warnings", &url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BriefError::ToolNotFound("yt-dlp".to_string())
                } else {
                    BriefError::Transcript(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BriefError::Transcript(format!(
                "Video {} not found or unavailable: {}",
                video_id, stderr
            )));
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| BriefError::Transcript(format!("Failed to parse yt-dlp output: {}", e)))?;

        let title = sanitize_title(json["title"].as_str().unwrap_or("Unknown_Title"));

        // yt-dlp reports upload_date as YYYYMMDD
        let publish_date = json["upload_date"]
            .as_str()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y%m%d").ok())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let caption_url = find_caption_url(&json).ok_or_else(|| {
            BriefError::Transcript(format!(
                "No caption track available for video {}",
                video_id
            ))
        })?;

        Ok(VideoInfo {
            title,
            publish_date,
            caption_url,
        })
    }

    /// Download and parse the json3 caption track.
    async fn fetch_captions(&self, caption_url: &str) -> Result<Vec<TranscriptSegment>> {
        let raw = self
            .http
            .get(caption_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| BriefError::Transcript(format!("Caption download failed: {}", e)))?
            .text()
            .await?;

        parse_json3(&raw)
    }
}

impl Default for YoutubeTranscriptSource {
    fn default() -> Self {
        Self::new()
    }
}

struct VideoInfo {
    title: String,
    publish_date: String,
    caption_url: String,
}

/// Pick a json3 caption URL from yt-dlp metadata, preferring manual
/// subtitles over automatic ones and English over other languages.
fn find_caption_url(metadata: &serde_json::Value) -> Option<String> {
    for source in ["subtitles", "automatic_captions"] {
        let tracks = match metadata[source].as_object() {
            Some(t) if !t.is_empty() => t,
            _ => continue,
        };

        let lang_keys: Vec<&String> = CAPTION_LANGS
            .iter()
            .filter_map(|l| tracks.keys().find(|k| k.as_str() == *l))
            .chain(tracks.keys())
            .collect();

        for lang in lang_keys {
            if let Some(formats) = tracks[lang].as_array() {
                for format in formats {
                    if format["ext"].as_str() == Some("json3") {
                        if let Some(url) = format["url"].as_str() {
                            return Some(url.to_string());
                        }
                    }
                }
            }
        }
    }
    None
}

#[derive(Deserialize)]
struct Json3Track {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: f64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: f64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a YouTube json3 caption payload into timed segments.
fn parse_json3(raw: &str) -> Result<Vec<TranscriptSegment>> {
    let track: Json3Track = serde_json::from_str(raw)
        .map_err(|e| BriefError::Transcript(format!("Failed to parse caption track: {}", e)))?;

    let mut segments = Vec::new();
    for event in track.events {
        let text: String = event
            .segs
            .iter()
            .map(|s| s.utf8.as_str())
            .collect::<String>()
            .replace('\n', " ")
            .trim()
            .to_string();

        if text.is_empty() {
            continue;
        }

        segments.push(TranscriptSegment {
            text,
            start_seconds: event.start_ms / 1000.0,
            duration_seconds: event.duration_ms / 1000.0,
        });
    }

    Ok(segments)
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn fetch(&self, input: &str) -> Result<VideoTranscript> {
        let video_id = self.extract_video_id(input).ok_or_else(|| {
            BriefError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", input))
        })?;

        info!("Fetching metadata for {}", video_id);
        let info = self.fetch_metadata(&video_id).await?;

        debug!("Downloading captions for {}", video_id);
        let segments = self.fetch_captions(&info.caption_url).await?;

        if segments.is_empty() {
            return Err(BriefError::Transcript(format!(
                "Caption track for video {} is empty",
                video_id
            )));
        }

        let full_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(VideoTranscript {
            video_id,
            title: info.title,
            publish_date: info.publish_date,
            full_text,
            segments,
        })
    }
}
