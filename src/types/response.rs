//! Typed generation responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::grounding::GroundingMetadata;

/// One generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationResponse {
    /// The generated text.
    pub text: String,
    /// Whether the candidate was blocked by safety filters.
    pub is_blocked: bool,
    /// Error codes explaining why the candidate was blocked, if any.
    pub errors: Vec<i64>,
    /// Scores for safety attributes, keyed by category name.
    pub safety_attributes: HashMap<String, f64>,
    /// Grounding metadata for the candidate; empty when the request carried
    /// no grounding source or the block was missing from the response.
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// A multi-candidate generation response.
///
/// Wraps a non-empty, ordered candidate list. The first candidate is the
/// primary one and its fields are duplicated on the wrapper, so single-
/// candidate callers can read `response.text` directly; by construction
/// `response.text == response.candidates[0].text` and likewise for the other
/// flattened fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCandidateResponse {
    /// The generated text of the primary candidate.
    pub text: String,
    /// Whether the primary candidate was blocked.
    pub is_blocked: bool,
    /// Error codes of the primary candidate.
    pub errors: Vec<i64>,
    /// Safety attribute scores of the primary candidate.
    pub safety_attributes: HashMap<String, f64>,
    /// Grounding metadata of the primary candidate.
    pub grounding_metadata: Option<GroundingMetadata>,
    /// All candidates, in response order. Never empty.
    pub candidates: Vec<TextGenerationResponse>,
}

impl MultiCandidateResponse {
    /// Builds a wrapper from a candidate list, flattening the first
    /// candidate's fields onto the wrapper.
    ///
    /// Returns `None` for an empty list; a response with no candidates is
    /// not representable.
    pub fn from_candidates(candidates: Vec<TextGenerationResponse>) -> Option<Self> {
        let primary = candidates.first()?;
        Some(Self {
            text: primary.text.clone(),
            is_blocked: primary.is_blocked,
            errors: primary.errors.clone(),
            safety_attributes: primary.safety_attributes.clone(),
            grounding_metadata: primary.grounding_metadata.clone(),
            candidates,
        })
    }

    /// Consumes the wrapper and returns the primary candidate.
    pub fn into_primary(mut self) -> TextGenerationResponse {
        if self.candidates.is_empty() {
            // Hand-built wrappers may lack the candidate list; the flattened
            // fields carry the same data.
            return TextGenerationResponse {
                text: self.text,
                is_blocked: self.is_blocked,
                errors: self.errors,
                safety_attributes: self.safety_attributes,
                grounding_metadata: self.grounding_metadata,
            };
        }
        self.candidates.swap_remove(0)
    }
}

/// Result of a token-counting request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTokensResponse {
    /// Total number of tokens counted across all instances.
    #[serde(rename = "totalTokens", alias = "total_tokens", default)]
    pub total_tokens: u64,
    /// Total number of billable characters counted across all instances.
    #[serde(
        rename = "totalBillableCharacters",
        alias = "total_billable_characters",
        default
    )]
    pub total_billable_characters: u64,
}
