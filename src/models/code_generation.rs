//! Code generation and completion.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;

use super::{ModelCapabilities, ModelInner};
use crate::config::PlatformConfig;
use crate::error::PlatformError;
use crate::service::PredictionService;
use crate::streaming::TextGenerationStream;
use crate::transform;
use crate::tuning::{TuningOptions, TuningRequest};
use crate::types::{CodeGenerationParams, CountTokensResponse, MultiCandidateResponse};

/// A language model that generates or completes code.
///
/// `prefix` is the code before the cursor; completion models additionally
/// take the code after it as `suffix`.
#[derive(Debug, Clone)]
pub struct CodeGenerationModel {
    inner: ModelInner,
}

impl CodeGenerationModel {
    /// Output-length cap the hosted code models document as their default.
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 128;

    /// Creates a handle for the given code model id.
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
                ModelCapabilities::code_generation(),
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

    /// Gets the model response for a code prompt.
    pub async fn predict(
        &self,
        prefix: &str,
        suffix: Option<&str>,
        params: &CodeGenerationParams,
    ) -> Result<MultiCandidateResponse, PlatformError> {
        let request = transform::code_generation_request(prefix, suffix, params);
        tracing::debug!(model = %self.inner.model_id, "dispatching code generation request");
        let response = self
            .inner
            .service
            .predict(&self.inner.endpoint, vec![request.instance], request.parameters)
            .await?;
        transform::parse_multi_candidate(&response)
    }

    /// Streams the model response for a code prompt.
    pub async fn predict_streaming(
        &self,
        prefix: &str,
        suffix: Option<&str>,
        params: &CodeGenerationParams,
    ) -> Result<TextGenerationStream, PlatformError> {
        let request = transform::code_generation_request(prefix, suffix, params);
        tracing::debug!(model = %self.inner.model_id, "dispatching streaming code generation request");
        let stream = self
            .inner
            .service
            .predict_streaming(&self.inner.endpoint, request.instance, request.parameters)
            .await?;
        Ok(Box::pin(stream.map(|chunk| {
            chunk.and_then(|value| transform::parse_text_prediction(&value))
        })))
    }

    /// Counts the tokens and billable characters for a code prompt.
    ///
    /// This does not run a prediction; it only counts the request.
    pub async fn count_tokens(
        &self,
        prefix: &str,
        suffix: Option<&str>,
    ) -> Result<CountTokensResponse, PlatformError> {
        self.inner.require_token_counting()?;
        let instance = json!({ "prefix": prefix, "suffix": suffix.unwrap_or("") });
        self.inner
            .service
            .count_tokens(&self.inner.endpoint, vec![instance])
            .await
    }

    /// Assembles and validates a supervised tuning request for this model.
    pub fn build_tuning_request(
        &self,
        training_data_uri: &str,
        options: &TuningOptions,
    ) -> Result<TuningRequest, PlatformError> {
        self.inner.build_tuning_request(training_data_uri, options)
    }
}
