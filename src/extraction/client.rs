//! Oracle client for structured extraction.

use super::{AnalysisResult, UsageMetrics};
use crate::config::OracleSettings;
use crate::error::{BriefError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    CreateChatCompletionRequestArgs, ResponseFormat,
};
use tracing::{debug, instrument};

/// Client invoking the external oracle with a rendered prompt contract.
///
/// Holds no retry logic; the caller decides whether an oracle failure is
/// worth another attempt.
pub struct ExtractionClient {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ExtractionClient {
    /// Create a client from oracle settings.
    ///
    /// Missing credentials fail here, at startup, never per-call.
    pub fn new(settings: &OracleSettings) -> Result<Self> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => {}
            _ => {
                return Err(BriefError::Config(
                    "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'"
                        .to_string(),
                ))
            }
        }

        Ok(Self {
            client: create_client(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    /// Run one extraction call and decode the structured result.
    ///
    /// The response must decode into the exact [`AnalysisResult`] shape;
    /// any mismatch is a schema violation, never coerced.
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn extract(&self, prompt: &str) -> Result<(AnalysisResult, UsageMetrics)> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| BriefError::Oracle(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| BriefError::Oracle(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| BriefError::Oracle(format!("Extraction request failed: {}", e)))?;

        let usage = response
            .usage
            .map(|u| UsageMetrics {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
                cost: None,
            })
            .unwrap_or_default();

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| BriefError::Oracle("Empty response from oracle".to_string()))?;

        debug!("Oracle response: {}", excerpt(content, 500));

        let analysis = decode_analysis(content)?;
        Ok((analysis, usage))
    }
}

/// Strict decode of the oracle output into [`AnalysisResult`].
fn decode_analysis(content: &str) -> Result<AnalysisResult> {
    serde_json::from_str(content).map_err(|e| {
        BriefError::SchemaViolation(format!("{}. Response was: {}", e, excerpt(content, 500)))
    })
}

/// Character-bounded excerpt of a response for logs and error messages.
fn excerpt(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_analysis_exact_shape() {
        let json = r#"{
            "summary": "Short tier list recap",
            "key_topics": ["rankings"],
            "brawlers_mentioned": [],
            "meta_notes": "Play tanks"
        }"#;
        let analysis = decode_analysis(json).unwrap();
        assert_eq!(analysis.summary, "Short tier list recap");
        assert!(analysis.brawlers_mentioned.is_empty());
    }

    #[test]
    fn test_decode_analysis_fails_closed_on_mismatch() {
        // Prose wrapper around the JSON is a contract violation.
        let wrapped = "Here is the brief:\n{\"summary\": \"s\"}";
        let err = decode_analysis(wrapped).unwrap_err();
        assert!(matches!(err, BriefError::SchemaViolation(_)));
    }

    #[test]
    fn test_decode_analysis_fails_on_wrong_types() {
        let json = r#"{
            "summary": "s",
            "key_topics": "not a list",
            "brawlers_mentioned": [],
            "meta_notes": "m"
        }"#;
        assert!(matches!(
            decode_analysis(json).unwrap_err(),
            BriefError::SchemaViolation(_)
        ));
    }
}
