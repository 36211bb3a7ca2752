//! Response parsers.
//!
//! Raw prediction payloads arrive as loosely-shaped JSON; the parsers here
//! turn them into typed candidates without ever indexing past what the
//! service actually sent. Streaming responses may omit safety categories and
//! scores entirely, so an absent array is an empty map, not an error.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::PlatformError;
use crate::service::PredictionResponse;
use crate::types::{GroundingMetadata, MultiCandidateResponse, TextGenerationResponse};

/// Zips the parallel `categories`/`scores` arrays of a safety-attributes
/// block into a score map. Either array may be missing or `null`.
fn safety_scores(attributes: &Value) -> HashMap<String, f64> {
    let categories = attributes
        .get("categories")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let scores = attributes
        .get("scores")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    categories
        .iter()
        .zip(scores.iter())
        .filter_map(|(category, score)| {
            Some((category.as_str()?.to_string(), score.as_f64()?))
        })
        .collect()
}

/// Extracts the integer error codes of a safety-attributes block, accepting
/// numeric or string scalars. Absent or empty lists become an empty vec.
fn safety_errors(attributes: &Value) -> Vec<i64> {
    attributes
        .get("errors")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    entry
                        .as_i64()
                        .or_else(|| entry.as_str().and_then(|s| s.parse().ok()))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn blocked(attributes: &Value) -> bool {
    attributes
        .get("blocked")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Parses one raw text-generation prediction into a candidate.
pub fn parse_text_prediction(
    prediction: &Value,
) -> Result<TextGenerationResponse, PlatformError> {
    let text = prediction
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| PlatformError::Parse("prediction is missing `content`".to_string()))?;
    let attributes = prediction
        .get("safetyAttributes")
        .cloned()
        .unwrap_or(Value::Null);

    Ok(TextGenerationResponse {
        text: text.to_string(),
        is_blocked: blocked(&attributes),
        errors: safety_errors(&attributes),
        safety_attributes: safety_scores(&attributes),
        grounding_metadata: Some(GroundingMetadata::from_value(
            prediction.get("groundingMetadata"),
        )),
    })
}

/// Parses a full text-generation response into a multi-candidate wrapper.
///
/// Text models return one prediction per candidate.
pub fn parse_multi_candidate(
    response: &PredictionResponse,
) -> Result<MultiCandidateResponse, PlatformError> {
    let candidates = response
        .predictions
        .iter()
        .map(parse_text_prediction)
        .collect::<Result<Vec<_>, _>>()?;

    MultiCandidateResponse::from_candidates(candidates)
        .ok_or_else(|| PlatformError::Parse("response contained no predictions".to_string()))
}

/// Parses one raw chat prediction into a multi-candidate wrapper.
///
/// Chat models return a single prediction carrying a `candidates` list, with
/// `safetyAttributes` and `groundingMetadata` lists aligned positionally to
/// it. A missing or short safety/grounding list never fails: the candidate
/// simply gets defaults.
pub fn parse_chat_prediction(
    prediction: &Value,
) -> Result<MultiCandidateResponse, PlatformError> {
    let raw_candidates = prediction
        .get("candidates")
        .and_then(Value::as_array)
        .filter(|candidates| !candidates.is_empty())
        .ok_or_else(|| PlatformError::Parse("prediction contained no candidates".to_string()))?;

    let safety = prediction.get("safetyAttributes");
    let grounding = prediction
        .get("groundingMetadata")
        .and_then(Value::as_array);

    let mut candidates = Vec::with_capacity(raw_candidates.len());
    for (index, raw) in raw_candidates.iter().enumerate() {
        let text = raw
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                PlatformError::Parse(format!("candidate {index} is missing `content`"))
            })?;

        // `safetyAttributes` is normally a list parallel to `candidates`;
        // tolerate emitters that send a single object for all of them.
        let attributes = match safety {
            Some(Value::Array(entries)) => entries.get(index).cloned().unwrap_or(Value::Null),
            Some(object @ Value::Object(_)) => object.clone(),
            _ => Value::Null,
        };

        let grounding_block = grounding.and_then(|blocks| blocks.get(index));

        candidates.push(TextGenerationResponse {
            text: text.to_string(),
            is_blocked: blocked(&attributes),
            errors: safety_errors(&attributes),
            safety_attributes: safety_scores(&attributes),
            grounding_metadata: Some(GroundingMetadata::from_value(grounding_block)),
        });
    }

    MultiCandidateResponse::from_candidates(candidates)
        .ok_or_else(|| PlatformError::Parse("prediction contained no candidates".to_string()))
}

/// Parses a full chat response: the first prediction carries the candidates.
pub fn parse_chat_response(
    response: &PredictionResponse,
) -> Result<MultiCandidateResponse, PlatformError> {
    let prediction = response
        .predictions
        .first()
        .ok_or_else(|| PlatformError::Parse("response contained no predictions".to_string()))?;
    parse_chat_prediction(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_prediction_parses_safety_and_grounding() {
        let prediction = json!({
            "content": "The sky is blue.",
            "safetyAttributes": {
                "blocked": false,
                "categories": ["Derogatory", "Violent"],
                "scores": [0.1, 0.2],
                "errors": [],
            },
            "groundingMetadata": {
                "citations": [{ "startIndex": 4, "endIndex": 7, "url": "https://example.com" }],
                "searchQueries": ["sky color"],
            },
        });

        let parsed = parse_text_prediction(&prediction).unwrap();
        assert_eq!(parsed.text, "The sky is blue.");
        assert!(!parsed.is_blocked);
        assert_eq!(parsed.safety_attributes["Derogatory"], 0.1);
        assert_eq!(parsed.safety_attributes["Violent"], 0.2);
        let metadata = parsed.grounding_metadata.unwrap();
        assert_eq!(metadata.citations.len(), 1);
        assert_eq!(metadata.search_queries, vec!["sky color".to_string()]);
    }

    #[test]
    fn absent_safety_arrays_yield_an_empty_map() {
        let prediction = json!({ "content": "partial", "safetyAttributes": {} });
        let parsed = parse_text_prediction(&prediction).unwrap();
        assert!(parsed.safety_attributes.is_empty());
        assert!(parsed.errors.is_empty());
        assert!(!parsed.is_blocked);
    }

    #[test]
    fn error_codes_are_coerced_from_strings() {
        let prediction = json!({
            "content": "",
            "safetyAttributes": { "blocked": true, "errors": ["251", 252] },
        });
        let parsed = parse_text_prediction(&prediction).unwrap();
        assert!(parsed.is_blocked);
        assert_eq!(parsed.errors, vec![251, 252]);
    }

    #[test]
    fn missing_content_is_a_parse_error() {
        let err = parse_text_prediction(&json!({})).unwrap_err();
        assert!(matches!(err, PlatformError::Parse(_)));
    }

    #[test]
    fn multi_candidate_uses_one_prediction_per_candidate() {
        let response = PredictionResponse::new(vec![
            json!({ "content": "first" }),
            json!({ "content": "second" }),
        ]);
        let parsed = parse_multi_candidate(&response).unwrap();
        assert_eq!(parsed.candidates.len(), 2);
        assert_eq!(parsed.text, "first");
    }

    #[test]
    fn empty_prediction_list_is_a_parse_error() {
        let err = parse_multi_candidate(&PredictionResponse::default()).unwrap_err();
        assert!(matches!(err, PlatformError::Parse(_)));
    }

    #[test]
    fn chat_prediction_aligns_parallel_lists() {
        let prediction = json!({
            "candidates": [
                { "author": "bot", "content": "alpha" },
                { "author": "bot", "content": "beta" },
            ],
            "safetyAttributes": [
                { "blocked": false, "categories": ["Health"], "scores": [0.3] },
                { "blocked": true, "errors": [251] },
            ],
            "groundingMetadata": [
                { "citations": [{ "startIndex": 0, "endIndex": 3 }] },
                null,
            ],
        });

        let parsed = parse_chat_prediction(&prediction).unwrap();
        assert_eq!(parsed.text, "alpha");
        assert_eq!(parsed.candidates.len(), 2);
        assert_eq!(parsed.candidates[0].safety_attributes["Health"], 0.3);
        assert!(parsed.candidates[1].is_blocked);
        assert_eq!(parsed.candidates[1].errors, vec![251]);
        assert_eq!(
            parsed.candidates[0]
                .grounding_metadata
                .as_ref()
                .unwrap()
                .citations
                .len(),
            1
        );
        // The second grounding block is null; the candidate still parses.
        assert!(parsed.candidates[1].grounding_metadata.as_ref().unwrap().is_empty());
    }

    #[test]
    fn chat_safety_lists_shorter_than_candidates_do_not_panic() {
        let prediction = json!({
            "candidates": [
                { "content": "a" },
                { "content": "b" },
            ],
            "safetyAttributes": [{ "blocked": false }],
        });
        let parsed = parse_chat_prediction(&prediction).unwrap();
        assert_eq!(parsed.candidates.len(), 2);
        assert!(!parsed.candidates[1].is_blocked);
    }

    #[test]
    fn chat_prediction_without_candidates_is_a_parse_error() {
        let err = parse_chat_prediction(&json!({ "candidates": [] })).unwrap_err();
        assert!(matches!(err, PlatformError::Parse(_)));
    }

    #[test]
    fn single_safety_object_applies_to_every_candidate() {
        let prediction = json!({
            "candidates": [{ "content": "4" }],
            "safetyAttributes": { "blocked": false },
        });
        let parsed = parse_chat_prediction(&prediction).unwrap();
        assert!(!parsed.is_blocked);
    }
}
