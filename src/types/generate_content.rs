use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Content;

/// Body of a `models/{model}:generateContent` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, ending with the new user turn.
    pub contents: Vec<Content>,

    /// Optional system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Sampling and length settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a new request for the given contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Set the system instruction.
    pub fn with_system_instruction(mut self, system_instruction: Option<Content>) -> Self {
        self.system_instruction = system_instruction;
        self
    }

    /// Set the generation config.
    pub fn with_generation_config(mut self, generation_config: GenerationConfig) -> Self {
        self.generation_config = Some(generation_config);
        self
    }
}

/// Generation settings for a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Upper bound on response length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response of a `generateContent` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate replies; the first one is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Present when the prompt itself was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// The model version that answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

/// A single candidate reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when generation was stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,

    /// Why generation stopped, e.g. `STOP` or `SAFETY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Content of a candidate reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandidateContent {
    /// The reply parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,

    /// Normally `model`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A reply part. Only text is consumed; other part kinds are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponsePart {
    /// Text of the part, if it is a text part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Set on thought summaries, which are not part of the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token counts reported by the API.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u32>,

    /// Tokens in the candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<u32>,

    /// Prompt plus candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate, if there is any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// Consume the response and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResponse`] when no text was generated, naming the block
    /// or finish reason when the API supplied one.
    pub fn into_reply(self) -> Result<String> {
        if let Some(text) = self.text() {
            return Ok(text);
        }
        let reason = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
            .map(|reason| format!("prompt blocked ({reason})"))
            .or_else(|| {
                self.candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.clone())
                    .map(|reason| format!("generation stopped ({reason})"))
            })
            .unwrap_or_else(|| "no candidates returned".to_string());
        Err(Error::empty_response(reason))
    }
}
