//! HTTP-level behavior of the shipped prediction service implementation.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use futures_util::StreamExt;
use palaver::http::HttpPredictionService;
use palaver::{PlatformConfig, PlatformError, PredictionService};

const ENDPOINT: &str = "projects/p/locations/l/publishers/google/models/text-model@001";

fn config(base_url: &str) -> PlatformConfig {
    PlatformConfig::new("p", "l", base_url).with_credentials("test-token")
}

#[tokio::test]
async fn predict_posts_instances_and_parses_predictions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{ENDPOINT}:predict")))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "instances": [{ "content": "hi" }],
            "parameters": { "temperature": 0.2 },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{ "content": "hello" }],
            "deployedModelId": "dm-1",
        })))
        .mount(&server)
        .await;

    let service = HttpPredictionService::new(config(&server.uri())).unwrap();
    let response = service
        .predict(
            ENDPOINT,
            vec![json!({ "content": "hi" })],
            json!({ "temperature": 0.2 }),
        )
        .await
        .unwrap();

    assert_eq!(response.predictions.len(), 1);
    assert_eq!(response.predictions[0]["content"], json!("hello"));
    assert_eq!(response.deployed_model_id.as_deref(), Some("dm-1"));
}

#[tokio::test]
async fn non_success_statuses_map_to_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{ENDPOINT}:predict")))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
        .mount(&server)
        .await;

    let service = HttpPredictionService::new(config(&server.uri())).unwrap();
    let err = service
        .predict(ENDPOINT, vec![json!({ "content": "hi" })], json!({}))
        .await
        .unwrap_err();

    match err {
        PlatformError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "quota exhausted");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn streaming_decodes_server_sent_events() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"candidates\": [{\"content\": \"part one\"}]}\n\n",
        "data: {\"candidates\": [{\"content\": \" part two\"}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path(format!("/v1/{ENDPOINT}:serverStreamingPredict")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/event-stream"),
        )
        .mount(&server)
        .await;

    let service = HttpPredictionService::new(config(&server.uri())).unwrap();
    let mut stream = service
        .predict_streaming(ENDPOINT, json!({ "content": "hi" }), json!({}))
        .await
        .unwrap();

    let mut chunks = Vec::new();
    while let Some(chunk) = stream.next().await {
        chunks.push(chunk.unwrap());
    }
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0]["candidates"][0]["content"], json!("part one"));
    assert_eq!(chunks[1]["candidates"][0]["content"], json!(" part two"));
}

#[tokio::test]
async fn count_tokens_parses_the_camel_case_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/{ENDPOINT}:countTokens")))
        .and(body_partial_json(json!({
            "instances": [{ "content": "How's it going?" }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalTokens": 5,
            "totalBillableCharacters": 15,
        })))
        .mount(&server)
        .await;

    let service = HttpPredictionService::new(config(&server.uri())).unwrap();
    let counted = service
        .count_tokens(ENDPOINT, vec![json!({ "content": "How's it going?" })])
        .await
        .unwrap();

    assert_eq!(counted.total_tokens, 5);
    assert_eq!(counted.total_billable_characters, 15);
}
