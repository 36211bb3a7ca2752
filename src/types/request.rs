//! Request value objects and generation parameters.
//!
//! Parameter structs follow one rule everywhere: a field left as `None` is
//! omitted from the wire payload entirely, and a field set to `Some(v)` is
//! always sent — including explicit zeros, which are meaningful for fields
//! like `temperature`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::grounding::GroundingSource;

/// A single-instance prediction request.
///
/// Built fresh for every call by the request builders in
/// [`crate::transform`], dispatched once, and discarded. Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// The prediction instance object.
    pub instance: Value,
    /// The prediction parameters object.
    pub parameters: Value,
}

/// Sampling controls shared by all text-producing models.
///
/// Used both as per-call overrides and as session-level defaults; see
/// [`MessageOptions`] for the chat merge rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Max length of the output text in tokens.
    pub max_output_tokens: Option<u32>,
    /// Controls the randomness of predictions. Range: [0, 1].
    pub temperature: Option<f64>,
    /// Number of highest-probability tokens kept for top-k filtering.
    pub top_k: Option<u32>,
    /// Cumulative probability bound for nucleus sampling. Range: [0, 1].
    pub top_p: Option<f64>,
    /// Customized stop sequences to stop the decoding process.
    pub stop_sequences: Option<Vec<String>>,
}

impl SamplingParams {
    /// All controls unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max output tokens.
    pub const fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set temperature.
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set top_k.
    pub const fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set top_p.
    pub const fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set stop sequences.
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.stop_sequences = Some(sequences);
        self
    }
}

/// Parameters for a single-prompt text generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationParams {
    /// Max length of the output text in tokens.
    pub max_output_tokens: Option<u32>,
    /// Controls the randomness of predictions. Range: [0, 1].
    pub temperature: Option<f64>,
    /// Number of highest-probability tokens kept for top-k filtering.
    pub top_k: Option<u32>,
    /// Cumulative probability bound for nucleus sampling. Range: [0, 1].
    pub top_p: Option<f64>,
    /// Customized stop sequences to stop the decoding process.
    pub stop_sequences: Option<Vec<String>>,
    /// Number of response candidates to return.
    pub candidate_count: Option<u32>,
    /// Grounding source for citation-producing generation.
    pub grounding_source: Option<GroundingSource>,
    /// Number of top candidate tokens to return log probabilities for at
    /// each generation step. Range: [0, 5].
    pub logprobs: Option<u32>,
    /// Positive values penalize tokens that already appeared in the output.
    /// Range: [-2.0, 2.0].
    pub presence_penalty: Option<f64>,
    /// Positive values penalize tokens proportionally to how often they
    /// appeared in the output. Range: [-2.0, 2.0].
    pub frequency_penalty: Option<f64>,
    /// Token-id to bias mapping added to the logits before sampling.
    /// Range: [-100.0, 100.0].
    pub logit_bias: Option<BTreeMap<i32, f64>>,
}

impl TextGenerationParams {
    /// All parameters unset; the service applies its own defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max output tokens.
    pub const fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set temperature.
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set top_k.
    pub const fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set top_p.
    pub const fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set stop sequences.
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.stop_sequences = Some(sequences);
        self
    }

    /// Set the number of candidates to generate.
    pub const fn with_candidate_count(mut self, count: u32) -> Self {
        self.candidate_count = Some(count);
        self
    }

    /// Attach a grounding source.
    pub fn with_grounding_source(mut self, source: impl Into<GroundingSource>) -> Self {
        self.grounding_source = Some(source.into());
        self
    }

    /// Set the number of per-step log probabilities to return.
    pub const fn with_logprobs(mut self, logprobs: u32) -> Self {
        self.logprobs = Some(logprobs);
        self
    }

    /// Set presence penalty.
    pub const fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Set frequency penalty.
    pub const fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Set logit bias.
    pub fn with_logit_bias(mut self, bias: BTreeMap<i32, f64>) -> Self {
        self.logit_bias = Some(bias);
        self
    }
}

/// Per-call options for [`crate::ChatSession::send_message`].
///
/// Every field set here wins over the session default; fields left unset
/// fall back to the default configured at `start_chat` time, and fields
/// unset in both places are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageOptions {
    /// Max length of the output text in tokens.
    pub max_output_tokens: Option<u32>,
    /// Controls the randomness of predictions. Range: [0, 1].
    pub temperature: Option<f64>,
    /// Number of highest-probability tokens kept for top-k filtering.
    pub top_k: Option<u32>,
    /// Cumulative probability bound for nucleus sampling. Range: [0, 1].
    pub top_p: Option<f64>,
    /// Customized stop sequences to stop the decoding process.
    pub stop_sequences: Option<Vec<String>>,
    /// Number of response candidates to return.
    pub candidate_count: Option<u32>,
    /// Grounding source for citation-producing generation.
    pub grounding_source: Option<GroundingSource>,
}

impl MessageOptions {
    /// All options unset; session defaults apply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max output tokens for this call only.
    pub const fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set temperature for this call only.
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set top_k for this call only.
    pub const fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set top_p for this call only.
    pub const fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set stop sequences for this call only.
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.stop_sequences = Some(sequences);
        self
    }

    /// Set the number of candidates to generate.
    pub const fn with_candidate_count(mut self, count: u32) -> Self {
        self.candidate_count = Some(count);
        self
    }

    /// Attach a grounding source for this call only.
    pub fn with_grounding_source(mut self, source: impl Into<GroundingSource>) -> Self {
        self.grounding_source = Some(source.into());
        self
    }

    /// Resolves the three-level precedence: explicit call option, then
    /// session default, then unset.
    pub(crate) fn merged_over(&self, defaults: &SamplingParams) -> Self {
        Self {
            max_output_tokens: self.max_output_tokens.or(defaults.max_output_tokens),
            temperature: self.temperature.or(defaults.temperature),
            top_k: self.top_k.or(defaults.top_k),
            top_p: self.top_p.or(defaults.top_p),
            stop_sequences: self
                .stop_sequences
                .clone()
                .or_else(|| defaults.stop_sequences.clone()),
            candidate_count: self.candidate_count,
            grounding_source: self.grounding_source.clone(),
        }
    }
}

/// Per-call options for [`crate::CodeChatSession::send_message`].
///
/// Code chat exposes the narrower parameter surface its models accept; there
/// is no nucleus/top-k control and no grounding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeChatOptions {
    /// Max length of the output text in tokens.
    pub max_output_tokens: Option<u32>,
    /// Controls the randomness of predictions. Range: [0, 1].
    pub temperature: Option<f64>,
    /// Customized stop sequences to stop the decoding process.
    pub stop_sequences: Option<Vec<String>>,
    /// Number of response candidates to return.
    pub candidate_count: Option<u32>,
}

impl CodeChatOptions {
    /// All options unset; session defaults apply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max output tokens for this call only.
    pub const fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set temperature for this call only.
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set stop sequences for this call only.
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.stop_sequences = Some(sequences);
        self
    }

    /// Set the number of candidates to generate.
    pub const fn with_candidate_count(mut self, count: u32) -> Self {
        self.candidate_count = Some(count);
        self
    }

    pub(crate) fn into_message_options(self) -> MessageOptions {
        MessageOptions {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            top_k: None,
            top_p: None,
            stop_sequences: self.stop_sequences,
            candidate_count: self.candidate_count,
            grounding_source: None,
        }
    }
}

/// Parameters for a code generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeGenerationParams {
    /// Max length of the output text in tokens.
    pub max_output_tokens: Option<u32>,
    /// Controls the randomness of predictions. Range: [0, 1].
    pub temperature: Option<f64>,
    /// Customized stop sequences to stop the decoding process.
    pub stop_sequences: Option<Vec<String>>,
    /// Number of response candidates to return.
    pub candidate_count: Option<u32>,
}

impl CodeGenerationParams {
    /// All parameters unset; the service applies its own defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max output tokens.
    pub const fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set temperature.
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set stop sequences.
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.stop_sequences = Some(sequences);
        self
    }

    /// Set the number of candidates to generate.
    pub const fn with_candidate_count(mut self, count: u32) -> Self {
        self.candidate_count = Some(count);
        self
    }
}
