//! HTTP implementation of the prediction endpoint.
//!
//! This is the one place the crate talks to the network. Requests go to the
//! platform's REST verbs (`:predict`, `:serverStreamingPredict`,
//! `:countTokens`); streaming responses arrive as server-sent events and are
//! decoded chunk by chunk. Failures map onto [`PlatformError`] unmodified;
//! retry and backoff policy belongs to the caller.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Value, json};

use crate::config::PlatformConfig;
use crate::error::PlatformError;
use crate::service::{PredictionResponse, PredictionService, PredictionStream};
use crate::types::CountTokensResponse;

/// Reqwest-backed [`PredictionService`].
///
/// One instance may serve any number of concurrent sessions; it holds no
/// per-conversation state.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    http: reqwest::Client,
    config: PlatformConfig,
}

impl HttpPredictionService {
    /// Builds a service over a fresh HTTP client.
    pub fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Builds a service over a caller-supplied HTTP client, so connection
    /// pools and middleware can be shared with the rest of an application.
    pub fn with_client(http: reqwest::Client, config: PlatformConfig) -> Self {
        Self { http, config }
    }

    fn url(&self, endpoint: &str, verb: &str) -> String {
        format!("{}/v1/{}:{}", self.config.api_endpoint(), endpoint, verb)
    }

    fn headers(&self) -> Result<HeaderMap, PlatformError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.config.bearer_token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                PlatformError::InvalidParameter(
                    "credential token contains non-header characters".to_string(),
                )
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, PlatformError> {
        let response = self
            .http
            .post(url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "prediction endpoint returned an error");
            return Err(PlatformError::api_error(status.as_u16(), message));
        }
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        endpoint: &str,
        instances: Vec<Value>,
        parameters: Value,
    ) -> Result<PredictionResponse, PlatformError> {
        tracing::debug!(endpoint = %endpoint, instances = instances.len(), "POST :predict");
        let body = json!({ "instances": instances, "parameters": parameters });
        let raw = self.post_json(&self.url(endpoint, "predict"), &body).await?;
        serde_json::from_value(raw)
            .map_err(|e| PlatformError::Parse(format!("invalid predict response: {e}")))
    }

    async fn predict_streaming(
        &self,
        endpoint: &str,
        instance: Value,
        parameters: Value,
    ) -> Result<PredictionStream, PlatformError> {
        tracing::debug!(endpoint = %endpoint, "POST :serverStreamingPredict");
        let url = format!(
            "{}?alt=sse",
            self.url(endpoint, "serverStreamingPredict")
        );
        let body = json!({ "instances": [instance], "parameters": parameters });

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "streaming endpoint returned an error");
            return Err(PlatformError::api_error(status.as_u16(), message));
        }

        let stream = response.bytes_stream().eventsource().filter_map(|event| {
            futures::future::ready(match event {
                Ok(event) => {
                    let data = event.data.trim().to_string();
                    if data.is_empty() || data == "[DONE]" {
                        None
                    } else {
                        Some(serde_json::from_str::<Value>(&data).map_err(|e| {
                            PlatformError::Stream(format!("undecodable stream chunk: {e}"))
                        }))
                    }
                }
                Err(e) => Some(Err(PlatformError::Stream(e.to_string()))),
            })
        });

        Ok(Box::pin(stream))
    }

    async fn count_tokens(
        &self,
        endpoint: &str,
        instances: Vec<Value>,
    ) -> Result<CountTokensResponse, PlatformError> {
        tracing::debug!(endpoint = %endpoint, instances = instances.len(), "POST :countTokens");
        let body = json!({ "instances": instances });
        let raw = self
            .post_json(&self.url(endpoint, "countTokens"), &body)
            .await?;
        serde_json::from_value(raw)
            .map_err(|e| PlatformError::Parse(format!("invalid countTokens response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_compose_endpoint_and_verb() {
        let config = PlatformConfig::new("p", "l", "https://example.com");
        let service = HttpPredictionService::with_client(reqwest::Client::new(), config);
        assert_eq!(
            service.url("projects/p/locations/l/publishers/google/models/m", "predict"),
            "https://example.com/v1/projects/p/locations/l/publishers/google/models/m:predict"
        );
    }
}
