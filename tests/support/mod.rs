#![allow(dead_code)]

//! Shared test doubles.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use serde_json::{Value, json};

use palaver::types::CountTokensResponse;
use palaver::{PlatformConfig, PlatformError, PredictionResponse, PredictionService,
    PredictionStream};

/// Scriptable in-memory [`PredictionService`].
///
/// Results are consumed in FIFO order; every call is recorded so tests can
/// assert on the exact payloads that crossed the seam.
#[derive(Default)]
pub struct MockPredictionService {
    predict_results: Mutex<VecDeque<Result<PredictionResponse, PlatformError>>>,
    stream_results: Mutex<VecDeque<Result<Vec<Result<Value, PlatformError>>, PlatformError>>>,
    count_results: Mutex<VecDeque<Result<CountTokensResponse, PlatformError>>>,
    pub predict_calls: Mutex<Vec<(String, Vec<Value>, Value)>>,
    pub stream_calls: Mutex<Vec<(String, Value, Value)>>,
    pub count_calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockPredictionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_predict(&self, result: Result<PredictionResponse, PlatformError>) {
        self.predict_results.lock().unwrap().push_back(result);
    }

    /// Script a successful chat prediction with one candidate.
    pub fn push_chat_reply(&self, text: &str) {
        self.push_predict(Ok(PredictionResponse::new(vec![json!({
            "candidates": [{ "author": "bot", "content": text }],
            "safetyAttributes": [{ "blocked": false }],
        })])));
    }

    pub fn push_stream_chunks(&self, chunks: Vec<Result<Value, PlatformError>>) {
        self.stream_results.lock().unwrap().push_back(Ok(chunks));
    }

    pub fn push_stream_dispatch_error(&self, error: PlatformError) {
        self.stream_results.lock().unwrap().push_back(Err(error));
    }

    pub fn push_count(&self, result: Result<CountTokensResponse, PlatformError>) {
        self.count_results.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl PredictionService for MockPredictionService {
    async fn predict(
        &self,
        endpoint: &str,
        instances: Vec<Value>,
        parameters: Value,
    ) -> Result<PredictionResponse, PlatformError> {
        self.predict_calls.lock().unwrap().push((
            endpoint.to_string(),
            instances.clone(),
            parameters.clone(),
        ));
        self.predict_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(PlatformError::Internal(
                    "no scripted predict response".to_string(),
                ))
            })
    }

    async fn predict_streaming(
        &self,
        endpoint: &str,
        instance: Value,
        parameters: Value,
    ) -> Result<PredictionStream, PlatformError> {
        self.stream_calls.lock().unwrap().push((
            endpoint.to_string(),
            instance.clone(),
            parameters.clone(),
        ));
        let chunks = self
            .stream_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(PlatformError::Internal(
                    "no scripted stream response".to_string(),
                ))
            })?;
        Ok(Box::pin(stream::iter(chunks)))
    }

    async fn count_tokens(
        &self,
        endpoint: &str,
        instances: Vec<Value>,
    ) -> Result<CountTokensResponse, PlatformError> {
        self.count_calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), instances.clone()));
        self.count_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(PlatformError::Internal(
                    "no scripted count_tokens response".to_string(),
                ))
            })
    }
}

pub fn test_config() -> PlatformConfig {
    PlatformConfig::new("test-project", "us-central1", "https://example.com")
}
