//! The remote prediction endpoint seam.
//!
//! [`PredictionService`] is the only boundary between this crate and the
//! network. Model types hold it behind an `Arc` and never assume anything
//! about the implementation beyond the trait contract, which keeps the whole
//! coordinator core testable against in-memory fakes. The shipped HTTP
//! implementation lives in [`crate::http`].

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlatformError;
use crate::types::CountTokensResponse;

/// A lazy, single-pass stream of raw prediction payloads.
///
/// Each item is one partial prediction object as produced by the remote
/// streaming endpoint. The stream is exhaustible exactly once; dropping it
/// before the end cancels the underlying call.
pub type PredictionStream = Pin<Box<dyn Stream<Item = Result<Value, PlatformError>> + Send>>;

/// Raw response of a (non-streaming) predict call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// One prediction object per returned candidate/instance.
    #[serde(default)]
    pub predictions: Vec<Value>,
    /// Identifier of the deployed model that served the request, if any.
    #[serde(
        default,
        rename = "deployedModelId",
        skip_serializing_if = "Option::is_none"
    )]
    pub deployed_model_id: Option<String>,
}

impl PredictionResponse {
    /// Wrap a list of prediction payloads.
    pub fn new(predictions: Vec<Value>) -> Self {
        Self {
            predictions,
            deployed_model_id: None,
        }
    }
}

/// The opaque remote collaborator that executes predictions.
///
/// Implementations are shared read-only across any number of independent
/// sessions; all per-conversation state stays on the caller side. Transport
/// failures must be surfaced as errors, never retried internally, so that
/// the session layer can guarantee its no-partial-commit semantics.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Executes a prediction for the given instances.
    async fn predict(
        &self,
        endpoint: &str,
        instances: Vec<Value>,
        parameters: Value,
    ) -> Result<PredictionResponse, PlatformError>;

    /// Executes a server-streaming prediction for a single instance.
    async fn predict_streaming(
        &self,
        endpoint: &str,
        instance: Value,
        parameters: Value,
    ) -> Result<PredictionStream, PlatformError>;

    /// Counts tokens and billable characters for the given instances without
    /// running a prediction.
    async fn count_tokens(
        &self,
        endpoint: &str,
        instances: Vec<Value>,
    ) -> Result<CountTokensResponse, PlatformError>;
}
