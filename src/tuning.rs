//! Tuning request assembly and validation.
//!
//! Tuning itself runs in an externally-owned pipeline; this module only
//! assembles and validates the parameter payloads. Every check here is
//! local and synchronous — an invalid spec fails before anything could have
//! touched the network, and a [`TuningRequest`] that validates is ready to
//! hand to whatever launches the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PlatformError;

/// Accelerator hardware for a tuning job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceleratorType {
    /// Tensor processing units.
    #[serde(rename = "TPU")]
    Tpu,
    /// Graphics processing units.
    #[serde(rename = "GPU")]
    Gpu,
}

impl AcceleratorType {
    /// The accelerator string used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tpu => "TPU",
            Self::Gpu => "GPU",
        }
    }
}

impl fmt::Display for AcceleratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AcceleratorType {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TPU" => Ok(Self::Tpu),
            "GPU" => Ok(Self::Gpu),
            other => Err(PlatformError::InvalidParameter(format!(
                "unsupported accelerator type: {other}. Supported types: TPU, GPU"
            ))),
        }
    }
}

/// Specification for model evaluation to perform during tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TuningEvaluationSpec {
    /// GCS URI of the evaluation dataset. Setting this runs model
    /// evaluation as part of the tuning job.
    pub evaluation_data: Option<String>,
    /// Evaluation runs at every `evaluation_interval` tuning steps.
    pub evaluation_interval: Option<u32>,
    /// If `true`, tuning may stop early before completing all steps.
    /// Requires `evaluation_data`.
    pub enable_early_stopping: Option<bool>,
    /// If `true`, tuning returns the best checkpoint by evaluation instead
    /// of the latest one.
    pub enable_checkpoint_selection: Option<bool>,
    /// Tensorboard resource id where evaluation metrics are written.
    pub tensorboard: Option<String>,
}

impl TuningEvaluationSpec {
    /// An empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation dataset URI.
    pub fn with_evaluation_data(mut self, uri: impl Into<String>) -> Self {
        self.evaluation_data = Some(uri.into());
        self
    }

    /// Set the evaluation interval in tuning steps.
    pub const fn with_evaluation_interval(mut self, interval: u32) -> Self {
        self.evaluation_interval = Some(interval);
        self
    }

    /// Toggle early stopping.
    pub const fn with_early_stopping(mut self, enable: bool) -> Self {
        self.enable_early_stopping = Some(enable);
        self
    }

    /// Toggle checkpoint selection.
    pub const fn with_checkpoint_selection(mut self, enable: bool) -> Self {
        self.enable_checkpoint_selection = Some(enable);
        self
    }

    /// Set the Tensorboard resource id.
    pub fn with_tensorboard(mut self, resource_id: impl Into<String>) -> Self {
        self.tensorboard = Some(resource_id.into());
        self
    }
}

/// Options for a supervised tuning job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TuningOptions {
    /// Number of training batches to tune on.
    pub train_steps: Option<u32>,
    /// Multiplier applied to the base learning rate.
    pub learning_rate_multiplier: Option<f64>,
    /// Evaluation to run alongside tuning.
    pub evaluation_spec: Option<TuningEvaluationSpec>,
    /// Context prepended to every training sample by default.
    pub default_context: Option<String>,
    /// Accelerator hardware to run on.
    pub accelerator_type: Option<AcceleratorType>,
    /// Max context length to tune with (`8k` or `32k`).
    pub max_context_length: Option<String>,
    /// Custom display name for the tuned model.
    pub model_display_name: Option<String>,
}

impl TuningOptions {
    /// All options unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of train steps.
    pub const fn with_train_steps(mut self, steps: u32) -> Self {
        self.train_steps = Some(steps);
        self
    }

    /// Set the learning rate multiplier.
    pub const fn with_learning_rate_multiplier(mut self, multiplier: f64) -> Self {
        self.learning_rate_multiplier = Some(multiplier);
        self
    }

    /// Attach an evaluation spec.
    pub fn with_evaluation_spec(mut self, spec: TuningEvaluationSpec) -> Self {
        self.evaluation_spec = Some(spec);
        self
    }

    /// Set the default context.
    pub fn with_default_context(mut self, context: impl Into<String>) -> Self {
        self.default_context = Some(context.into());
        self
    }

    /// Set the accelerator type.
    pub const fn with_accelerator_type(mut self, accelerator: AcceleratorType) -> Self {
        self.accelerator_type = Some(accelerator);
        self
    }

    /// Set the max context length.
    pub fn with_max_context_length(mut self, length: impl Into<String>) -> Self {
        self.max_context_length = Some(length.into());
        self
    }

    /// Set the tuned model's display name.
    pub fn with_model_display_name(mut self, name: impl Into<String>) -> Self {
        self.model_display_name = Some(name.into());
        self
    }
}

/// Options for a reinforcement tuning job.
///
/// Reinforcement tuning evaluates differently from supervised tuning:
/// `evaluation_interval`, `enable_early_stopping`, and
/// `enable_checkpoint_selection` are not supported and must be left unset on
/// the evaluation spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementTuningOptions {
    /// GCS URI of the prompt dataset.
    pub prompt_dataset: String,
    /// GCS URI of the human preference dataset.
    pub preference_dataset: String,
    /// Number of steps when training the reward model.
    pub reward_model_train_steps: Option<u32>,
    /// Number of reinforcement learning steps.
    pub reinforcement_learning_train_steps: Option<u32>,
    /// Coefficient for the KL divergence penalty.
    pub kl_coeff: Option<f64>,
    /// Instruction describing the task, if the dataset does not carry one.
    pub instruction: Option<String>,
    /// Evaluation to run alongside tuning.
    pub evaluation_spec: Option<TuningEvaluationSpec>,
    /// Accelerator hardware to run on.
    pub accelerator_type: Option<AcceleratorType>,
    /// Custom display name for the tuned model.
    pub model_display_name: Option<String>,
}

impl ReinforcementTuningOptions {
    /// Options over the two required datasets.
    pub fn new(
        prompt_dataset: impl Into<String>,
        preference_dataset: impl Into<String>,
    ) -> Self {
        Self {
            prompt_dataset: prompt_dataset.into(),
            preference_dataset: preference_dataset.into(),
            ..Self::default()
        }
    }

    /// Set the reward model train steps.
    pub const fn with_reward_model_train_steps(mut self, steps: u32) -> Self {
        self.reward_model_train_steps = Some(steps);
        self
    }

    /// Set the reinforcement learning train steps.
    pub const fn with_reinforcement_learning_train_steps(mut self, steps: u32) -> Self {
        self.reinforcement_learning_train_steps = Some(steps);
        self
    }

    /// Set the KL penalty coefficient.
    pub const fn with_kl_coeff(mut self, coeff: f64) -> Self {
        self.kl_coeff = Some(coeff);
        self
    }

    /// Set the task instruction.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Attach an evaluation spec.
    pub fn with_evaluation_spec(mut self, spec: TuningEvaluationSpec) -> Self {
        self.evaluation_spec = Some(spec);
        self
    }

    /// Set the accelerator type.
    pub const fn with_accelerator_type(mut self, accelerator: AcceleratorType) -> Self {
        self.accelerator_type = Some(accelerator);
        self
    }

    /// Set the tuned model's display name.
    pub fn with_model_display_name(mut self, name: impl Into<String>) -> Self {
        self.model_display_name = Some(name.into());
        self
    }
}

/// A validated, ready-to-launch tuning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningRequest {
    /// Id of the base model being tuned.
    pub model_id: String,
    /// Assembled pipeline parameter values.
    pub tuning_parameters: Map<String, Value>,
    /// Custom display name for the tuned model, if any.
    pub model_display_name: Option<String>,
}

fn require_gcs_uri(uri: &str, field: &str) -> Result<(), PlatformError> {
    if uri.starts_with("gs://") {
        Ok(())
    } else {
        Err(PlatformError::InvalidParameter(format!(
            "{field} must be a GCS URI that starts with gs://"
        )))
    }
}

fn insert_eval_spec(
    parameters: &mut Map<String, Value>,
    spec: &TuningEvaluationSpec,
) -> Result<(), PlatformError> {
    if let Some(uri) = &spec.evaluation_data {
        require_gcs_uri(uri, "evaluation_data")?;
        parameters.insert("evaluation_data_uri".to_string(), Value::from(uri.clone()));
    }
    if let Some(interval) = spec.evaluation_interval {
        parameters.insert("evaluation_interval".to_string(), Value::from(interval));
    }
    if let Some(early_stopping) = spec.enable_early_stopping {
        parameters.insert(
            "enable_early_stopping".to_string(),
            Value::from(early_stopping),
        );
    }
    if let Some(checkpoint_selection) = spec.enable_checkpoint_selection {
        parameters.insert(
            "enable_checkpoint_selection".to_string(),
            Value::from(checkpoint_selection),
        );
    }
    if let Some(tensorboard) = &spec.tensorboard {
        parameters.insert(
            "tensorboard_resource_id".to_string(),
            Value::from(tensorboard.clone()),
        );
    }
    Ok(())
}

/// Assembles a supervised tuning request, validating every field locally.
pub fn build_supervised_request(
    model_id: &str,
    training_data_uri: &str,
    options: &TuningOptions,
) -> Result<TuningRequest, PlatformError> {
    require_gcs_uri(training_data_uri, "training_data")?;

    let mut parameters = Map::new();
    parameters.insert(
        "dataset_uri".to_string(),
        Value::from(training_data_uri.to_string()),
    );
    if let Some(steps) = options.train_steps {
        parameters.insert("train_steps".to_string(), Value::from(steps));
    }
    if let Some(multiplier) = options.learning_rate_multiplier {
        parameters.insert(
            "learning_rate_multiplier".to_string(),
            Value::from(multiplier),
        );
    }
    if let Some(spec) = &options.evaluation_spec {
        insert_eval_spec(&mut parameters, spec)?;
    }
    if let Some(context) = &options.default_context {
        parameters.insert("default_context".to_string(), Value::from(context.clone()));
    }
    if let Some(accelerator) = options.accelerator_type {
        parameters.insert(
            "accelerator_type".to_string(),
            Value::from(accelerator.as_str()),
        );
    }
    if let Some(length) = &options.max_context_length {
        parameters.insert(
            "max_context_length".to_string(),
            Value::from(length.clone()),
        );
    }

    Ok(TuningRequest {
        model_id: model_id.to_string(),
        tuning_parameters: parameters,
        model_display_name: options.model_display_name.clone(),
    })
}

/// Assembles a reinforcement tuning request, validating every field locally.
///
/// Evaluation spec fields that reinforcement tuning does not support are
/// rejected rather than silently ignored.
pub fn build_reinforcement_request(
    model_id: &str,
    options: &ReinforcementTuningOptions,
) -> Result<TuningRequest, PlatformError> {
    require_gcs_uri(&options.prompt_dataset, "prompt_dataset")?;
    require_gcs_uri(&options.preference_dataset, "preference_dataset")?;

    let mut parameters = Map::new();
    parameters.insert(
        "prompt_dataset".to_string(),
        Value::from(options.prompt_dataset.clone()),
    );
    parameters.insert(
        "preference_dataset".to_string(),
        Value::from(options.preference_dataset.clone()),
    );
    parameters.insert(
        "large_model_reference".to_string(),
        Value::from(model_id.rsplit('/').next().unwrap_or(model_id)),
    );

    if let Some(spec) = &options.evaluation_spec {
        for (value_set, field) in [
            (spec.evaluation_interval.is_some(), "evaluation_interval"),
            (
                spec.enable_early_stopping.is_some(),
                "enable_early_stopping",
            ),
            (
                spec.enable_checkpoint_selection.is_some(),
                "enable_checkpoint_selection",
            ),
        ] {
            if value_set {
                return Err(PlatformError::InvalidParameter(format!(
                    "{field} is not supported by reinforcement tuning; leave it unset"
                )));
            }
        }
        if let Some(uri) = &spec.evaluation_data {
            require_gcs_uri(uri, "evaluation_data")?;
            parameters.insert("eval_dataset".to_string(), Value::from(uri.clone()));
        }
        if let Some(tensorboard) = &spec.tensorboard {
            parameters.insert(
                "tensorboard_resource_id".to_string(),
                Value::from(tensorboard.clone()),
            );
        }
    }
    if let Some(steps) = options.reward_model_train_steps {
        parameters.insert("reward_model_train_steps".to_string(), Value::from(steps));
    }
    if let Some(steps) = options.reinforcement_learning_train_steps {
        parameters.insert(
            "reinforcement_learning_train_steps".to_string(),
            Value::from(steps),
        );
    }
    if let Some(coeff) = options.kl_coeff {
        parameters.insert("kl_coeff".to_string(), Value::from(coeff));
    }
    if let Some(instruction) = &options.instruction {
        parameters.insert("instruction".to_string(), Value::from(instruction.clone()));
    }
    if let Some(accelerator) = options.accelerator_type {
        parameters.insert(
            "accelerator_type".to_string(),
            Value::from(accelerator.as_str()),
        );
    }

    Ok(TuningRequest {
        model_id: model_id.to_string(),
        tuning_parameters: parameters,
        model_display_name: options.model_display_name.clone(),
    })
}
