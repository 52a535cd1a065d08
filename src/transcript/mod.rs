//! Transcript retrieval from external providers.
//!
//! The pipeline never computes transcripts itself; a [`TranscriptSource`]
//! wraps whichever external provider supplies the text and timed segments.

mod youtube;

pub use youtube::YoutubeTranscriptSource;

use crate::error::Result;
use async_trait::async_trait;

/// One timed caption segment.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

/// A fetched transcript with the video metadata the pipeline needs.
#[derive(Debug, Clone)]
pub struct VideoTranscript {
    /// YouTube video id.
    pub video_id: String,
    /// Sanitized title (safe for ids and file names).
    pub title: String,
    /// Publish date as YYYY-MM-DD, empty when unknown.
    pub publish_date: String,
    /// Full transcript text.
    pub full_text: String,
    /// Ordered timed segments.
    pub segments: Vec<TranscriptSegment>,
}

impl VideoTranscript {
    /// Correlation key for chunk ids and uploaded file names.
    pub fn file_id(&self) -> String {
        format!("{}_{}", self.video_id, self.title)
    }

    /// Bounded preview of the transcript, with an ellipsis marker when
    /// truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.full_text.chars().take(max_chars).collect();
        if self.full_text.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript for a video URL or bare id.
    ///
    /// Videos without captions fail with a transcript error; that run
    /// cannot proceed.
    async fn fetch(&self, input: &str) -> Result<VideoTranscript>;
}

/// Sanitize a raw title for use in ids: non-alphanumerics become `_`,
/// runs collapse, edges are trimmed.
pub fn sanitize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_sep = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript_with_text(text: &str) -> VideoTranscript {
        VideoTranscript {
            video_id: "abc123def45".to_string(),
            title: "Some_Title".to_string(),
            publish_date: "2025-07-10".to_string(),
            full_text: text.to_string(),
            segments: vec![],
        }
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(
            sanitize_title("Jae-Yong Ranks ALL 93 Brawlers! (Worst To Best)"),
            "Jae_Yong_Ranks_ALL_93_Brawlers_Worst_To_Best"
        );
        assert_eq!(sanitize_title("___hello   world___"), "hello_world");
        assert_eq!(sanitize_title(""), "");
    }

    #[test]
    fn test_file_id() {
        let t = transcript_with_text("x");
        assert_eq!(t.file_id(), "abc123def45_Some_Title");
    }

    #[test]
    fn test_preview_truncates_with_ellipsis() {
        let t = transcript_with_text(&"a".repeat(1000));
        let preview = t.preview(500);
        assert_eq!(preview.len(), 503);
        assert!(preview.ends_with("..."));
        assert_eq!(&preview[..500], "a".repeat(500));
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        let t = transcript_with_text("short");
        assert_eq!(t.preview(500), "short");
    }
}
