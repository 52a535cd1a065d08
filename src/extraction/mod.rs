//! Structured extraction of video briefs from transcripts.
//!
//! The oracle (an OpenAI chat model) receives the rendered prompt contract
//! and must answer with a JSON object matching [`AnalysisResult`] exactly.
//! Anything else is a schema violation, not something to coerce locally.

mod client;
mod filter;
mod prompt;

pub use client::ExtractionClient;
pub use filter::{MatchPolicy, MentionFilter};
pub use prompt::{build_brief_prompt, PromptContract};

use serde::{Deserialize, Serialize};

/// The structured brief produced by the oracle for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisResult {
    /// Free-text summary of the video (advisory bound: ~100 words).
    pub summary: String,
    /// Short topic labels, in transcript order.
    pub key_topics: Vec<String>,
    /// Brawlers the oracle claims were discussed.
    pub brawlers_mentioned: Vec<BrawlerMention>,
    /// Season/meta recommendations (advisory bound: ~100 words).
    pub meta_notes: String,
}

/// One claimed brawler mention with its discussion context and tips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrawlerMention {
    pub name: String,
    pub context_in_transcript: String,
    pub relevant_tips_or_strategies: String,
}

/// Token usage reported by the oracle for one extraction call.
///
/// Values are passed through from the API response; cost is only present
/// when the oracle reports one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageMetrics {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub cost: Option<f64>,
}

impl UsageMetrics {
    /// One-line rendering for logs and CLI output.
    pub fn log_line(&self) -> String {
        let cost = match self.cost {
            Some(c) => format!("${:.6}", c),
            None => "n/a".to_string(),
        };
        format!(
            "Prompt tokens: {}, Completion tokens: {}, Total tokens: {}, Cost: {}",
            self.prompt_tokens, self.completion_tokens, self.total_tokens, cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_rejects_unknown_fields() {
        let json = r#"{
            "summary": "s",
            "key_topics": [],
            "brawlers_mentioned": [],
            "meta_notes": "m",
            "extra": true
        }"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn test_analysis_result_rejects_missing_fields() {
        let json = r#"{"summary": "s", "key_topics": []}"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn test_analysis_result_decodes_exact_shape() {
        let json = r#"{
            "summary": "Tier list rundown",
            "key_topics": ["tier list", "meta"],
            "brawlers_mentioned": [
                {
                    "name": "Leon",
                    "context_in_transcript": "Ranked highly for ambushes",
                    "relevant_tips_or_strategies": "Use invisibility to close distance"
                }
            ],
            "meta_notes": "Assassins favored this season"
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.brawlers_mentioned.len(), 1);
        assert_eq!(result.brawlers_mentioned[0].name, "Leon");
    }

    #[test]
    fn test_usage_metrics_log_line() {
        let metrics = UsageMetrics {
            prompt_tokens: 100,
            completion_tokens: 50,
            total_tokens: 150,
            cost: None,
        };
        assert_eq!(
            metrics.log_line(),
            "Prompt tokens: 100, Completion tokens: 50, Total tokens: 150, Cost: n/a"
        );
    }
}
