//! Request builders.
//!
//! Each builder turns typed parameters into the instance/parameters pair the
//! prediction endpoint expects. The omission rule is uniform: `None` fields
//! produce no key at all, `Some` fields are always serialized — so an
//! explicit `temperature` of `0.0` reaches the wire while an unset one
//! leaves the service default in force.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::config::PlatformConfig;
use crate::types::{
    ChatMessage, CodeGenerationParams, InputOutputTextPair, MessageOptions, PredictionRequest,
    TextGenerationParams,
};

/// Wire-level prediction parameters.
///
/// Text and chat models spell the output-length cap `maxDecodeSteps`; code
/// models spell it `maxOutputTokens`. Both fields exist here and the
/// builders populate whichever applies.
#[derive(Debug, Clone, Default, Serialize)]
struct WireParameters {
    #[serde(rename = "maxDecodeSteps", skip_serializing_if = "Option::is_none")]
    max_decode_steps: Option<u32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(rename = "topK", skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(rename = "stopSequences", skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
    #[serde(rename = "candidateCount", skip_serializing_if = "Option::is_none")]
    candidate_count: Option<u32>,
    #[serde(rename = "groundingConfig", skip_serializing_if = "Option::is_none")]
    grounding_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logprobs: Option<u32>,
    #[serde(rename = "presencePenalty", skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
    #[serde(rename = "frequencyPenalty", skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
    #[serde(rename = "logitBias", skip_serializing_if = "Option::is_none")]
    logit_bias: Option<std::collections::BTreeMap<i32, f64>>,
}

impl WireParameters {
    fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Builds a prediction request for a single text prompt.
pub fn text_generation_request(
    prompt: &str,
    params: &TextGenerationParams,
    config: &PlatformConfig,
) -> PredictionRequest {
    let parameters = WireParameters {
        max_decode_steps: params.max_output_tokens,
        temperature: params.temperature,
        top_p: params.top_p,
        top_k: params.top_k,
        stop_sequences: params.stop_sequences.clone(),
        candidate_count: params.candidate_count,
        grounding_config: params
            .grounding_source
            .as_ref()
            .map(|source| source.to_config_value(config.project())),
        logprobs: params.logprobs,
        presence_penalty: params.presence_penalty,
        frequency_penalty: params.frequency_penalty,
        logit_bias: params.logit_bias.clone(),
        ..Default::default()
    };

    PredictionRequest {
        instance: json!({ "content": prompt }),
        parameters: parameters.into_value(),
    }
}

/// Builds a prediction request for one chat turn.
///
/// The full ordered history is folded into the instance's `messages` list
/// before the new user turn is appended; `context` and `examples` are
/// attached at top level only when non-empty. `options` must already be
/// merged against the session defaults.
pub fn chat_request(
    message: &str,
    history: &[ChatMessage],
    context: Option<&str>,
    examples: &[InputOutputTextPair],
    options: &MessageOptions,
    config: &PlatformConfig,
) -> PredictionRequest {
    let parameters = WireParameters {
        max_decode_steps: options.max_output_tokens,
        temperature: options.temperature,
        top_p: options.top_p,
        top_k: options.top_k,
        stop_sequences: options.stop_sequences.clone(),
        candidate_count: options.candidate_count,
        grounding_config: options
            .grounding_source
            .as_ref()
            .map(|source| source.to_config_value(config.project())),
        ..Default::default()
    };

    let mut messages: Vec<Value> = history
        .iter()
        .map(|turn| {
            json!({
                "author": turn.author.as_wire_str(),
                "content": turn.content,
            })
        })
        .collect();
    messages.push(json!({
        "author": crate::types::MessageAuthor::User.as_wire_str(),
        "content": message,
    }));

    let mut instance = Map::new();
    instance.insert("messages".to_string(), Value::Array(messages));
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        instance.insert("context".to_string(), Value::String(context.to_string()));
    }
    if !examples.is_empty() {
        let examples: Vec<Value> = examples
            .iter()
            .map(|pair| {
                json!({
                    "input": { "content": pair.input_text },
                    "output": { "content": pair.output_text },
                })
            })
            .collect();
        instance.insert("examples".to_string(), Value::Array(examples));
    }

    PredictionRequest {
        instance: Value::Object(instance),
        parameters: parameters.into_value(),
    }
}

/// Builds a prediction request for code generation/completion.
///
/// `suffix` is only attached when present and non-empty, matching the
/// completion models' instance schema.
pub fn code_generation_request(
    prefix: &str,
    suffix: Option<&str>,
    params: &CodeGenerationParams,
) -> PredictionRequest {
    let parameters = WireParameters {
        max_output_tokens: params.max_output_tokens,
        temperature: params.temperature,
        stop_sequences: params.stop_sequences.clone(),
        candidate_count: params.candidate_count,
        ..Default::default()
    };

    let mut instance = Map::new();
    instance.insert("prefix".to_string(), Value::String(prefix.to_string()));
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        instance.insert("suffix".to_string(), Value::String(suffix.to_string()));
    }

    PredictionRequest {
        instance: Value::Object(instance),
        parameters: parameters.into_value(),
    }
}
