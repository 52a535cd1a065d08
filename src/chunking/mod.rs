//! Decomposition of a filtered brief into retrievable chunks.
//!
//! One global chunk carries the summary/topics/meta view of the video; one
//! chunk per confirmed mention carries that brawler's context and tips.
//! Chunking is a pure function: same brief, file id, and publish date always
//! produce the same chunk sequence.

mod jsonl;

pub use jsonl::{read_chunks, write_chunks, write_chunks_to_path};

use crate::extraction::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Namespaced filter tag attached to a chunk for scoped retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Restrict {
    pub namespace: String,
    pub allow: Vec<String>,
}

impl Restrict {
    /// A restrict with a single allowed value.
    pub fn single(namespace: &str, value: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            allow: vec![value.to_string()],
        }
    }
}

/// A self-contained retrievable text unit.
///
/// The field set is the wire contract with the index service: exactly `id`,
/// `text`, and `restricts`, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub restricts: Vec<Restrict>,
}

/// Decompose a filtered analysis into `1 + mentions` chunks.
///
/// The global chunk comes first, then one chunk per mention in filtered
/// order. A mention with empty context or tips still yields a chunk. When
/// two mentions lowercase to the same id, later ones get an index suffix
/// instead of overwriting.
pub fn chunk_analysis(
    analysis: &AnalysisResult,
    file_id: &str,
    publish_date: &str,
) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(1 + analysis.brawlers_mentioned.len());

    let global_text = format!(
        "Summary: {}\nTopics: {}\nMeta: {}",
        analysis.summary,
        analysis.key_topics.join(", "),
        analysis.meta_notes
    );
    chunks.push(Chunk {
        id: format!("{}_global", file_id),
        text: global_text,
        restricts: vec![
            Restrict::single("chunk_type", "global"),
            Restrict::single("publish_date", publish_date),
        ],
    });

    let mut seen: HashMap<String, usize> = HashMap::new();
    for mention in &analysis.brawlers_mentioned {
        let base_id = format!("{}_{}", file_id, mention.name.to_lowercase());
        let count = seen.entry(base_id.clone()).or_insert(0);
        *count += 1;
        let id = if *count == 1 {
            base_id
        } else {
            format!("{}_{}", base_id, count)
        };

        let text = format!(
            "Brawler: {}. \n Context: {}. \n Tips: {}",
            mention.name, mention.context_in_transcript, mention.relevant_tips_or_strategies
        );

        chunks.push(Chunk {
            id,
            text,
            restricts: vec![
                Restrict::single("chunk_type", "brawler"),
                Restrict::single("brawler", &mention.name),
                Restrict::single("publish_date", publish_date),
            ],
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::BrawlerMention;

    fn mention(name: &str, context: &str, tips: &str) -> BrawlerMention {
        BrawlerMention {
            name: name.to_string(),
            context_in_transcript: context.to_string(),
            relevant_tips_or_strategies: tips.to_string(),
        }
    }

    fn analysis(mentions: Vec<BrawlerMention>) -> AnalysisResult {
        AnalysisResult {
            summary: "Tier list recap".to_string(),
            key_topics: vec!["meta".to_string(), "rankings".to_string()],
            brawlers_mentioned: mentions,
            meta_notes: "Favor throwers".to_string(),
        }
    }

    #[test]
    fn test_chunk_count_is_one_plus_mentions() {
        let a = analysis(vec![
            mention("Leon", "strong pick", "flank with invisibility"),
            mention("Spike", "solid", "bait supers"),
        ]);
        let chunks = chunk_analysis(&a, "vid_title", "2025-07-10");
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_empty_mentions_yields_global_only() {
        let a = analysis(vec![]);
        let chunks = chunk_analysis(&a, "vid_title", "2025-07-10");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "vid_title_global");
    }

    #[test]
    fn test_global_chunk_layout() {
        let a = analysis(vec![]);
        let chunks = chunk_analysis(&a, "vid", "2025-07-10");
        assert_eq!(
            chunks[0].text,
            "Summary: Tier list recap\nTopics: meta, rankings\nMeta: Favor throwers"
        );
        assert_eq!(
            chunks[0].restricts,
            vec![
                Restrict::single("chunk_type", "global"),
                Restrict::single("publish_date", "2025-07-10"),
            ]
        );
    }

    #[test]
    fn test_entity_chunk_ids_and_restricts() {
        let a = analysis(vec![mention("Leon", "ctx", "tips")]);
        let chunks = chunk_analysis(&a, "abc123_Some_Title", "2025-07-10");
        let leon = &chunks[1];
        assert_eq!(leon.id, "abc123_Some_Title_leon");
        assert_eq!(
            leon.restricts,
            vec![
                Restrict::single("chunk_type", "brawler"),
                Restrict::single("brawler", "Leon"),
                Restrict::single("publish_date", "2025-07-10"),
            ]
        );
        assert_eq!(leon.text, "Brawler: Leon. \n Context: ctx. \n Tips: tips");
    }

    #[test]
    fn test_empty_context_still_yields_chunk() {
        let a = analysis(vec![mention("Grom", "", "")]);
        let chunks = chunk_analysis(&a, "vid", "2025-07-10");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].id, "vid_grom");
    }

    #[test]
    fn test_colliding_ids_get_index_suffix() {
        let a = analysis(vec![
            mention("Leon", "first", ""),
            mention("LEON", "second", ""),
            mention("leon", "third", ""),
        ]);
        let chunks = chunk_analysis(&a, "vid", "2025-07-10");
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["vid_global", "vid_leon", "vid_leon_2", "vid_leon_3"]);

        let unique: std::collections::HashSet<&&str> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let a = analysis(vec![mention("Leon", "ctx", "tips")]);
        let first = chunk_analysis(&a, "vid", "2025-07-10");
        let second = chunk_analysis(&a, "vid", "2025-07-10");
        assert_eq!(first, second);
    }
}
