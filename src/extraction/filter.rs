//! Hallucination guard: drop extracted mentions not in the catalog.
//!
//! The prompt instructs the oracle to stick to the official roster, but the
//! oracle is not a trusted enforcer. Off-list names are logged at warn and
//! dropped, never surfaced as errors.

use super::{AnalysisResult, BrawlerMention};
use crate::catalog::BrawlerCatalog;
use std::sync::Arc;
use tracing::warn;

/// Name matching policy against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Exact, case-sensitive match (documented default).
    #[default]
    Exact,
    /// Tolerate casing drift from the oracle.
    IgnoreCase,
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(MatchPolicy::Exact),
            "ignore_case" | "ignorecase" => Ok(MatchPolicy::IgnoreCase),
            _ => Err(format!("Unknown match policy: {}", s)),
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPolicy::Exact => write!(f, "exact"),
            MatchPolicy::IgnoreCase => write!(f, "ignore_case"),
        }
    }
}

/// Filters oracle output against the catalog allow-list.
pub struct MentionFilter {
    catalog: Arc<BrawlerCatalog>,
    policy: MatchPolicy,
}

impl MentionFilter {
    pub fn new(catalog: Arc<BrawlerCatalog>, policy: MatchPolicy) -> Self {
        Self { catalog, policy }
    }

    fn matches(&self, name: &str) -> bool {
        match self.policy {
            MatchPolicy::Exact => self.catalog.contains(name),
            MatchPolicy::IgnoreCase => self.catalog.contains_ignore_case(name),
        }
    }

    /// Produce a new result whose mentions all pass the allow-list.
    ///
    /// Keeps the original mention order; every other field passes through
    /// unchanged. Output mention count is never larger than the input's.
    pub fn filter(&self, analysis: &AnalysisResult) -> AnalysisResult {
        let (kept, dropped): (Vec<BrawlerMention>, Vec<BrawlerMention>) = analysis
            .brawlers_mentioned
            .iter()
            .cloned()
            .partition(|m| self.matches(&m.name));

        for mention in &dropped {
            warn!("Dropping mention not in catalog: {}", mention.name);
        }

        AnalysisResult {
            summary: analysis.summary.clone(),
            key_topics: analysis.key_topics.clone(),
            brawlers_mentioned: kept,
            meta_notes: analysis.meta_notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(name: &str) -> BrawlerMention {
        BrawlerMention {
            name: name.to_string(),
            context_in_transcript: format!("{} discussion", name),
            relevant_tips_or_strategies: String::new(),
        }
    }

    fn analysis(names: &[&str]) -> AnalysisResult {
        AnalysisResult {
            summary: "summary".to_string(),
            key_topics: vec!["topic".to_string()],
            brawlers_mentioned: names.iter().map(|n| mention(n)).collect(),
            meta_notes: "meta".to_string(),
        }
    }

    fn exact_filter() -> MentionFilter {
        MentionFilter::new(Arc::new(BrawlerCatalog::builtin()), MatchPolicy::Exact)
    }

    #[test]
    fn test_drops_hallucinated_names() {
        let input = analysis(&["Leon", "Leom"]);
        let output = exact_filter().filter(&input);
        assert_eq!(output.brawlers_mentioned.len(), 1);
        assert_eq!(output.brawlers_mentioned[0].name, "Leon");
    }

    #[test]
    fn test_preserves_relative_order() {
        let input = analysis(&["Spike", "Fakename", "Leon", "Crow"]);
        let output = exact_filter().filter(&input);
        let names: Vec<&str> = output
            .brawlers_mentioned
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Spike", "Leon", "Crow"]);
    }

    #[test]
    fn test_never_grows_and_passes_other_fields_through() {
        let input = analysis(&["Leon", "Leom", "Grom"]);
        let output = exact_filter().filter(&input);
        assert!(output.brawlers_mentioned.len() <= input.brawlers_mentioned.len());
        assert_eq!(output.summary, input.summary);
        assert_eq!(output.key_topics, input.key_topics);
        assert_eq!(output.meta_notes, input.meta_notes);
    }

    #[test]
    fn test_exact_policy_rejects_casing_drift() {
        let input = analysis(&["leon"]);
        let output = exact_filter().filter(&input);
        assert!(output.brawlers_mentioned.is_empty());
    }

    #[test]
    fn test_ignore_case_policy_accepts_casing_drift() {
        let filter = MentionFilter::new(
            Arc::new(BrawlerCatalog::builtin()),
            MatchPolicy::IgnoreCase,
        );
        let input = analysis(&["leon", "LEOM"]);
        let output = filter.filter(&input);
        assert_eq!(output.brawlers_mentioned.len(), 1);
        assert_eq!(output.brawlers_mentioned[0].name, "leon");
    }

    #[test]
    fn test_duplicate_mentions_survive_independently() {
        // Mentions need not be unique; the filter judges each on its own.
        let input = analysis(&["Leon", "Leon"]);
        let output = exact_filter().filter(&input);
        assert_eq!(output.brawlers_mentioned.len(), 2);
    }

    #[test]
    fn test_match_policy_parsing() {
        assert_eq!("exact".parse::<MatchPolicy>().unwrap(), MatchPolicy::Exact);
        assert_eq!(
            "ignore_case".parse::<MatchPolicy>().unwrap(),
            MatchPolicy::IgnoreCase
        );
        assert!("fuzzy".parse::<MatchPolicy>().is_err());
    }
}
