//! Grounded generation: sources, citations, and metadata.
//!
//! A grounding source augments generation with external reference material so
//! that responses can carry citations. Exactly one source may be attached to
//! a request; the closed [`GroundingSource`] enum makes an unrecognized
//! source unrepresentable, and each variant knows how to serialize itself
//! into the request's `groundingConfig` object.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Grounding against public web search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearch {
    /// If `true`, skip finding claim attributions (no citations are
    /// generated).
    pub disable_attribution: bool,
}

impl WebSearch {
    /// Web search grounding with attribution enabled.
    pub const fn new() -> Self {
        Self {
            disable_attribution: false,
        }
    }

    /// Toggle claim attribution.
    pub const fn with_disable_attribution(mut self, disable: bool) -> Self {
        self.disable_attribution = disable;
        self
    }
}

/// Grounding against a hosted search datastore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexAiSearch {
    /// Datastore id within the search service.
    pub data_store_id: String,
    /// Multi-region where the datastore lives (`global`, `us`, `eu`, ...).
    pub location: String,
    /// Project owning the datastore. Falls back to the configuration's
    /// project when unset.
    pub project: Option<String>,
    /// If `true`, skip finding claim attributions.
    pub disable_attribution: bool,
}

impl VertexAiSearch {
    /// Datastore grounding in the caller's own project.
    pub fn new(data_store_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            data_store_id: data_store_id.into(),
            location: location.into(),
            project: None,
            disable_attribution: false,
        }
    }

    /// Point at a datastore in a different project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Toggle claim attribution.
    pub const fn with_disable_attribution(mut self, disable: bool) -> Self {
        self.disable_attribution = disable;
        self
    }

    fn datastore_path(&self, default_project: &str) -> String {
        let project = self.project.as_deref().unwrap_or(default_project);
        format!(
            "projects/{}/locations/{}/collections/default_collection/dataStores/{}",
            project, self.location, self.data_store_id
        )
    }
}

/// Grounding against caller-provided inline text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineContext {
    /// The content used as inline context.
    pub inline_context: String,
}

impl InlineContext {
    /// Inline-text grounding.
    pub fn new(inline_context: impl Into<String>) -> Self {
        Self {
            inline_context: inline_context.into(),
        }
    }
}

/// A grounding source attached to a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundingSource {
    /// Public web search.
    WebSearch(WebSearch),
    /// Hosted search datastore.
    VertexAiSearch(VertexAiSearch),
    /// Caller-provided inline text.
    InlineContext(InlineContext),
}

impl GroundingSource {
    /// Serializes this source into the request's `groundingConfig` object.
    ///
    /// `default_project` is used for datastore sources that did not name a
    /// project of their own.
    pub(crate) fn to_config_value(&self, default_project: &str) -> Value {
        match self {
            Self::WebSearch(web) => json!({
                "sources": [{ "type": "WEB" }],
                "disableAttribution": web.disable_attribution,
            }),
            Self::VertexAiSearch(search) => json!({
                "sources": [{
                    "type": "VERTEX_AI_SEARCH",
                    "vertexAiSearchDatastore": search.datastore_path(default_project),
                }],
                "disableAttribution": search.disable_attribution,
            }),
            Self::InlineContext(inline) => json!({
                "sources": [{
                    "type": "INLINE",
                    "inlineContext": inline.inline_context,
                }],
            }),
        }
    }
}

impl From<WebSearch> for GroundingSource {
    fn from(value: WebSearch) -> Self {
        Self::WebSearch(value)
    }
}

impl From<VertexAiSearch> for GroundingSource {
    fn from(value: VertexAiSearch) -> Self {
        Self::VertexAiSearch(value)
    }
}

impl From<InlineContext> for GroundingSource {
    fn from(value: InlineContext) -> Self {
        Self::InlineContext(value)
    }
}

/// One citation produced by grounding.
///
/// Index pairs that do not satisfy `0 <= start_index < end_index` are
/// discarded during parsing rather than surfaced as malformed data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingCitation {
    /// Index in the output where the citation starts (inclusive).
    pub start_index: Option<i64>,
    /// Index in the output where the citation ends (exclusive).
    pub end_index: Option<i64>,
    /// URL of the cited source.
    pub url: Option<String>,
    /// Title of the cited source.
    pub title: Option<String>,
    /// License of the cited source (e.g. `mit`).
    pub license: Option<String>,
    /// Publication date in `YYYY`, `YYYY-MM`, or `YYYY-MM-DD` form.
    pub publication_date: Option<String>,
}

/// Per-candidate grounding metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingMetadata {
    /// Citations into the candidate text, in order.
    pub citations: Vec<GroundingCitation>,
    /// Search queries issued while grounding, in order.
    pub search_queries: Vec<String>,
}

impl GroundingMetadata {
    /// Metadata with no citations and no queries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` when there are neither citations nor search queries.
    pub fn is_empty(&self) -> bool {
        self.citations.is_empty() && self.search_queries.is_empty()
    }

    /// Parses metadata from a raw per-candidate grounding block.
    ///
    /// A missing or null block yields empty metadata; this never fails.
    pub(crate) fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Self::empty();
        };

        let citations = value
            .get("citations")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(parse_citation).collect())
            .unwrap_or_default();

        let search_queries = value
            .get("searchQueries")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            citations,
            search_queries,
        }
    }
}

fn index_value(value: Option<&Value>) -> Option<i64> {
    let value = value?;
    if let Some(index) = value.as_i64() {
        return Some(index);
    }
    value.as_str().and_then(|s| s.parse().ok())
}

fn parse_citation(value: &Value) -> GroundingCitation {
    let mut start_index = index_value(value.get("startIndex"));
    let mut end_index = index_value(value.get("endIndex"));
    if let (Some(start), Some(end)) = (start_index, end_index) {
        if start < 0 || start >= end {
            start_index = None;
            end_index = None;
        }
    }

    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    GroundingCitation {
        start_index,
        end_index,
        url: text("url"),
        title: text("title"),
        license: text("license"),
        publication_date: text("publicationDate"),
    }
}
