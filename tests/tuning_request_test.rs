//! Tuning request assembly through the model surface: capability gating and
//! synchronous validation.

mod support;

use std::sync::Arc;

use palaver::tuning::{
    AcceleratorType, ReinforcementTuningOptions, TuningEvaluationSpec, TuningOptions,
};
use palaver::{CodeGenerationModel, PlatformError, TextGenerationModel};
use support::{MockPredictionService, test_config};

#[test]
fn tuning_requests_validate_without_any_service_traffic() {
    let service = Arc::new(MockPredictionService::new());
    let model = TextGenerationModel::new(service.clone(), test_config(), "text-model@001");

    let options = TuningOptions::new()
        .with_train_steps(200)
        .with_accelerator_type(AcceleratorType::Gpu)
        .with_evaluation_spec(
            TuningEvaluationSpec::new()
                .with_evaluation_data("gs://bucket/eval.jsonl")
                .with_evaluation_interval(20),
        );
    let request = model
        .build_tuning_request("gs://bucket/train.jsonl", &options)
        .unwrap();

    assert_eq!(request.model_id, "text-model@001");
    assert_eq!(request.tuning_parameters["accelerator_type"], "GPU");
    assert_eq!(
        request.tuning_parameters["evaluation_data_uri"],
        "gs://bucket/eval.jsonl"
    );

    // Assembly is local; the prediction service must never have been used.
    assert!(service.predict_calls.lock().unwrap().is_empty());
    assert!(service.count_calls.lock().unwrap().is_empty());
}

#[test]
fn invalid_evaluation_uri_fails_before_dispatch() {
    let service = Arc::new(MockPredictionService::new());
    let model = TextGenerationModel::new(service.clone(), test_config(), "text-model@001");

    let options = TuningOptions::new().with_evaluation_spec(
        TuningEvaluationSpec::new().with_evaluation_data("s3://bucket/eval.jsonl"),
    );
    let err = model
        .build_tuning_request("gs://bucket/train.jsonl", &options)
        .unwrap_err();

    assert!(err.is_validation());
    assert!(service.predict_calls.lock().unwrap().is_empty());
}

#[test]
fn reinforcement_tuning_is_gated_by_capability() {
    let service = Arc::new(MockPredictionService::new());

    // Code models do not carry the reinforcement tuning capability.
    let code_model = CodeGenerationModel::new(service.clone(), test_config(), "code-model@001");
    assert!(!code_model.capabilities().reinforcement_tuning);

    let text_model = TextGenerationModel::new(service, test_config(), "text-model@001");
    let options =
        ReinforcementTuningOptions::new("gs://bucket/prompts.jsonl", "gs://bucket/prefs.jsonl");
    let request = text_model
        .build_reinforcement_tuning_request(&options)
        .unwrap();
    assert_eq!(
        request.tuning_parameters["prompt_dataset"],
        "gs://bucket/prompts.jsonl"
    );
}

#[test]
fn reinforcement_tuning_rejects_supervised_only_eval_fields() {
    let service = Arc::new(MockPredictionService::new());
    let model = TextGenerationModel::new(service, test_config(), "text-model@001");

    let options = ReinforcementTuningOptions::new("gs://p.jsonl", "gs://q.jsonl")
        .with_evaluation_spec(TuningEvaluationSpec::new().with_early_stopping(true));
    let err = model.build_reinforcement_tuning_request(&options).unwrap_err();

    assert!(matches!(err, PlatformError::InvalidParameter(_)));
}
