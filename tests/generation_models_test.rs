//! Single-prompt model behavior: request shaping through the public API,
//! multi-candidate parsing, and streaming.

mod support;

use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::json;

use palaver::types::{CodeGenerationParams, TextGenerationParams, WebSearch};
use palaver::{CodeGenerationModel, PredictionResponse, TextGenerationModel};
use support::{MockPredictionService, test_config};

fn text_model(service: Arc<MockPredictionService>) -> TextGenerationModel {
    TextGenerationModel::new(service, test_config(), "text-model@001")
}

#[tokio::test]
async fn predict_sends_only_explicit_parameters() {
    let service = Arc::new(MockPredictionService::new());
    service.push_predict(Ok(PredictionResponse::new(vec![
        json!({ "content": "42" }),
    ])));

    let model = text_model(service.clone());
    model
        .predict("meaning of life?", &TextGenerationParams::new().with_temperature(0.0))
        .await
        .unwrap();

    let calls = service.predict_calls.lock().unwrap();
    let (endpoint, instances, parameters) = &calls[0];
    assert_eq!(
        endpoint,
        "projects/test-project/locations/us-central1/publishers/google/models/text-model@001"
    );
    assert_eq!(instances[0], json!({ "content": "meaning of life?" }));
    assert_eq!(parameters, &json!({ "temperature": 0.0 }));
}

#[tokio::test]
async fn grounded_predict_carries_the_grounding_config() {
    let service = Arc::new(MockPredictionService::new());
    service.push_predict(Ok(PredictionResponse::new(vec![json!({
        "content": "grounded answer",
        "groundingMetadata": {
            "citations": [{ "startIndex": 0, "endIndex": 8, "url": "https://example.com" }],
            "searchQueries": ["answer"],
        },
    })])));

    let model = text_model(service.clone());
    let params = TextGenerationParams::new()
        .with_grounding_source(WebSearch::new().with_disable_attribution(true));
    let response = model.predict("q", &params).await.unwrap();

    let calls = service.predict_calls.lock().unwrap();
    assert_eq!(
        calls[0].2["groundingConfig"],
        json!({
            "sources": [{ "type": "WEB" }],
            "disableAttribution": true,
        })
    );

    let metadata = response.grounding_metadata.unwrap();
    assert_eq!(metadata.citations.len(), 1);
    assert_eq!(metadata.citations[0].url.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn multi_candidate_responses_flatten_the_primary() {
    let service = Arc::new(MockPredictionService::new());
    service.push_predict(Ok(PredictionResponse::new(vec![
        json!({ "content": "first", "safetyAttributes": { "blocked": false } }),
        json!({ "content": "second", "safetyAttributes": { "blocked": true, "errors": [251] } }),
    ])));

    let model = text_model(service.clone());
    let response = model
        .predict("q", &TextGenerationParams::new().with_candidate_count(2))
        .await
        .unwrap();

    assert_eq!(response.candidates.len(), 2);
    assert_eq!(response.text, response.candidates[0].text);
    assert_eq!(response.is_blocked, response.candidates[0].is_blocked);
    assert_eq!(response.errors, response.candidates[0].errors);
    assert!(response.candidates[1].is_blocked);
}

#[tokio::test]
async fn streaming_predict_yields_partials_in_order() {
    let service = Arc::new(MockPredictionService::new());
    service.push_stream_chunks(vec![
        Ok(json!({ "content": "The answer" })),
        Ok(json!({ "content": " is 42." })),
    ]);

    let model = text_model(service.clone());
    let mut stream = model
        .predict_streaming("q", &TextGenerationParams::new())
        .await
        .unwrap();

    let mut texts = Vec::new();
    while let Some(partial) = stream.next().await {
        texts.push(partial.unwrap().text);
    }
    assert_eq!(texts, vec!["The answer".to_string(), " is 42.".to_string()]);
}

#[tokio::test]
async fn count_tokens_builds_one_instance_per_prompt() {
    let service = Arc::new(MockPredictionService::new());
    service.push_count(Ok(palaver::CountTokensResponse {
        total_tokens: 9,
        total_billable_characters: 30,
    }));

    let model = text_model(service.clone());
    let counted = model
        .count_tokens(vec!["What should I do today?".to_string(), "How's it going?".to_string()])
        .await
        .unwrap();
    assert_eq!(counted.total_tokens, 9);

    let calls = service.count_calls.lock().unwrap();
    assert_eq!(
        calls[0].1,
        vec![
            json!({ "content": "What should I do today?" }),
            json!({ "content": "How's it going?" }),
        ]
    );
}

#[tokio::test]
async fn code_generation_uses_the_completion_instance_shape() {
    let service = Arc::new(MockPredictionService::new());
    service.push_predict(Ok(PredictionResponse::new(vec![
        json!({ "content": "    return a.min(b)" }),
    ])));

    let model = CodeGenerationModel::new(service.clone(), test_config(), "code-model@001");
    model
        .predict(
            "def min_of(a, b):",
            None,
            &CodeGenerationParams::new().with_max_output_tokens(64),
        )
        .await
        .unwrap();

    let calls = service.predict_calls.lock().unwrap();
    assert_eq!(calls[0].1[0], json!({ "prefix": "def min_of(a, b):" }));
    assert_eq!(calls[0].2, json!({ "maxOutputTokens": 64 }));
}

#[test]
fn blocking_model_delegates_to_the_async_path() {
    let service = Arc::new(MockPredictionService::new());
    service.push_predict(Ok(PredictionResponse::new(vec![
        json!({ "content": "sync answer" }),
    ])));

    let model = palaver::blocking::TextGenerationModel::new(text_model(service)).unwrap();
    let response = model
        .predict("q", &TextGenerationParams::new())
        .unwrap();
    assert_eq!(response.text, "sync answer");
}
