//! Single-prompt text generation.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;

use super::{ModelCapabilities, ModelInner};
use crate::config::PlatformConfig;
use crate::error::PlatformError;
use crate::service::PredictionService;
use crate::streaming::TextGenerationStream;
use crate::transform;
use crate::tuning::{ReinforcementTuningOptions, TuningOptions, TuningRequest};
use crate::types::{CountTokensResponse, MultiCandidateResponse, TextGenerationParams};

/// A general text generation model.
///
/// ```rust,ignore
/// let model = TextGenerationModel::new(service, config, "text-bison@001");
/// let response = model.predict("What is life?", &TextGenerationParams::new()).await?;
/// println!("{}", response.text);
/// ```
#[derive(Debug, Clone)]
pub struct TextGenerationModel {
    inner: ModelInner,
}

impl TextGenerationModel {
    /// Output-length cap the hosted text models document as their default.
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 128;

    /// Creates a handle for the given model id.
    pub fn new(
        service: Arc<dyn PredictionService>,
        config: PlatformConfig,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            inner: ModelInner::new(
                service,
                config,
                model_id.into(),
                ModelCapabilities::text_generation(),
            ),
        }
    }

    /// The model id this handle was created with.
    pub fn model_id(&self) -> &str {
        &self.inner.model_id
    }

    /// The capability set fixed at construction time.
    pub fn capabilities(&self) -> ModelCapabilities {
        self.inner.capabilities
    }

    /// Gets the model response for a single prompt.
    pub async fn predict(
        &self,
        prompt: &str,
        params: &TextGenerationParams,
    ) -> Result<MultiCandidateResponse, PlatformError> {
        let request = transform::text_generation_request(prompt, params, &self.inner.config);
        tracing::debug!(model = %self.inner.model_id, "dispatching text generation request");
        let response = self
            .inner
            .service
            .predict(&self.inner.endpoint, vec![request.instance], request.parameters)
            .await?;
        transform::parse_multi_candidate(&response)
    }

    /// Gets a streaming model response for a single prompt.
    ///
    /// The result is a lazy, single-pass stream of partial responses.
    pub async fn predict_streaming(
        &self,
        prompt: &str,
        params: &TextGenerationParams,
    ) -> Result<TextGenerationStream, PlatformError> {
        let request = transform::text_generation_request(prompt, params, &self.inner.config);
        tracing::debug!(model = %self.inner.model_id, "dispatching streaming text generation request");
        let stream = self
            .inner
            .service
            .predict_streaming(&self.inner.endpoint, request.instance, request.parameters)
            .await?;
        Ok(Box::pin(stream.map(|chunk| {
            chunk.and_then(|value| transform::parse_text_prediction(&value))
        })))
    }

    /// Counts the tokens and billable characters for the given prompts.
    ///
    /// This does not run a prediction; it only counts the request.
    pub async fn count_tokens(
        &self,
        prompts: Vec<String>,
    ) -> Result<CountTokensResponse, PlatformError> {
        self.inner.require_token_counting()?;
        let instances = prompts
            .into_iter()
            .map(|prompt| json!({ "content": prompt }))
            .collect();
        self.inner
            .service
            .count_tokens(&self.inner.endpoint, instances)
            .await
    }

    /// Assembles and validates a supervised tuning request for this model.
    ///
    /// Validation happens entirely locally; handing the request to a tuning
    /// pipeline is the caller's concern.
    pub fn build_tuning_request(
        &self,
        training_data_uri: &str,
        options: &TuningOptions,
    ) -> Result<TuningRequest, PlatformError> {
        self.inner.build_tuning_request(training_data_uri, options)
    }

    /// Assembles and validates a reinforcement tuning request for this model.
    pub fn build_reinforcement_tuning_request(
        &self,
        options: &ReinforcementTuningOptions,
    ) -> Result<TuningRequest, PlatformError> {
        self.inner.build_reinforcement_tuning_request(options)
    }
}
