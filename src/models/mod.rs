//! Concrete model types.
//!
//! Each model kind is its own struct implementing exactly the operations it
//! supports, composed over a shared [`ModelInner`]; there are no capability
//! mixins or inheritance chains. Operations whose availability is data-
//! driven rather than structural (tuning, token counting) consult the
//! model's [`ModelCapabilities`], fixed at construction time, and fail with
//! a validation error before any network activity.

mod chat;
mod code_generation;
mod text_generation;

use std::sync::Arc;

pub use chat::{ChatModel, ChatSession, ChatSessionBuilder, CodeChatModel, CodeChatSession,
    CodeChatSessionBuilder};
pub use code_generation::CodeGenerationModel;
pub use text_generation::TextGenerationModel;

use crate::config::PlatformConfig;
use crate::error::PlatformError;
use crate::service::PredictionService;
use crate::tuning::{ReinforcementTuningOptions, TuningOptions, TuningRequest};

/// The set of optional capabilities a model was constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapabilities {
    /// Server-streaming prediction.
    pub streaming: bool,
    /// Token counting without prediction.
    pub token_counting: bool,
    /// Supervised tuning.
    pub tuning: bool,
    /// Reinforcement tuning.
    pub reinforcement_tuning: bool,
}

impl ModelCapabilities {
    /// Capabilities of text generation models.
    pub const fn text_generation() -> Self {
        Self {
            streaming: true,
            token_counting: true,
            tuning: true,
            reinforcement_tuning: true,
        }
    }

    /// Capabilities of chat models.
    pub const fn chat() -> Self {
        Self {
            streaming: true,
            token_counting: true,
            tuning: true,
            reinforcement_tuning: true,
        }
    }

    /// Capabilities of code chat models.
    pub const fn code_chat() -> Self {
        Self {
            streaming: true,
            token_counting: true,
            tuning: true,
            reinforcement_tuning: false,
        }
    }

    /// Capabilities of code generation models.
    pub const fn code_generation() -> Self {
        Self {
            streaming: true,
            token_counting: true,
            tuning: true,
            reinforcement_tuning: false,
        }
    }
}

/// State shared by every model kind: the service handle, the configuration,
/// and the resolved endpoint path.
#[derive(Clone)]
pub(crate) struct ModelInner {
    pub(crate) service: Arc<dyn PredictionService>,
    pub(crate) config: PlatformConfig,
    pub(crate) model_id: String,
    pub(crate) endpoint: String,
    pub(crate) capabilities: ModelCapabilities,
}

impl ModelInner {
    pub(crate) fn new(
        service: Arc<dyn PredictionService>,
        config: PlatformConfig,
        model_id: String,
        capabilities: ModelCapabilities,
    ) -> Self {
        let endpoint = config.model_path(&model_id);
        Self {
            service,
            config,
            model_id,
            endpoint,
            capabilities,
        }
    }

    pub(crate) fn require_token_counting(&self) -> Result<(), PlatformError> {
        if self.capabilities.token_counting {
            Ok(())
        } else {
            Err(PlatformError::Unsupported(format!(
                "model {} does not support token counting",
                self.model_id
            )))
        }
    }

    pub(crate) fn build_tuning_request(
        &self,
        training_data_uri: &str,
        options: &TuningOptions,
    ) -> Result<TuningRequest, PlatformError> {
        if !self.capabilities.tuning {
            return Err(PlatformError::Unsupported(format!(
                "model {} does not support tuning",
                self.model_id
            )));
        }
        crate::tuning::build_supervised_request(&self.model_id, training_data_uri, options)
    }

    pub(crate) fn build_reinforcement_tuning_request(
        &self,
        options: &ReinforcementTuningOptions,
    ) -> Result<TuningRequest, PlatformError> {
        if !self.capabilities.reinforcement_tuning {
            return Err(PlatformError::Unsupported(format!(
                "model {} does not support reinforcement tuning",
                self.model_id
            )));
        }
        crate::tuning::build_reinforcement_request(&self.model_id, options)
    }
}

impl std::fmt::Debug for ModelInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInner")
            .field("model_id", &self.model_id)
            .field("endpoint", &self.endpoint)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}
