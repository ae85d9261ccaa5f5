use super::retry::{with_retry, AttemptError, RetryConfig};
use super::{EmbeddingProvider, PredictionKind, ScoringProvider};
use crate::config::ProviderConfig;
use crate::error::{Result, ServiceError};
use crate::models::{EmbeddingRequest, EmbeddingResponse, ItemId, ScoreResponse};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client for model endpoints that speak `application/json`
pub struct HttpModelClient {
    client: HttpClient,
    config: ProviderConfig,
    retry: RetryConfig,
}

impl HttpModelClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::Transport(format!("failed to build HTTP client: {}", e)))?;

        let retry = RetryConfig {
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff(),
            max_backoff: Duration::from_secs(10),
            ..Default::default()
        };

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    fn endpoint<'a>(url: &'a Option<String>, name: &str) -> Result<&'a str> {
        url.as_deref().ok_or_else(|| {
            ServiceError::InvalidConfiguration(format!("no endpoint configured for {} model", name))
        })
    }

    fn scoring_endpoint(&self, kind: PredictionKind) -> Result<&str> {
        match kind {
            PredictionKind::Rating => Self::endpoint(&self.config.rating_endpoint_url, kind.as_str()),
            PredictionKind::Recommendation => {
                Self::endpoint(&self.config.recommendation_endpoint_url, kind.as_str())
            }
        }
    }

    /// POST a JSON body, retrying transient failures, and decode the response
    async fn invoke<T: DeserializeOwned>(&self, url: &str, body: String) -> Result<T> {
        debug!("Invoking model endpoint {} ({} bytes)", url, body.len());

        let text = with_retry(&self.retry, || self.post_once(url, body.clone())).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn post_once(&self, url: &str, body: String) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    AttemptError::Transient(format!("request failed: {}", e))
                } else {
                    AttemptError::Fatal(ServiceError::Transport(format!("request failed: {}", e)))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = format!("endpoint returned {}: {}", status, error_text);
            return Err(if is_transient(status) {
                AttemptError::Transient(message)
            } else {
                AttemptError::Fatal(ServiceError::Transport(message))
            });
        }

        response
            .text()
            .await
            .map_err(|e| AttemptError::Transient(format!("failed to read body: {}", e)))
    }
}

fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
impl EmbeddingProvider for HttpModelClient {
    async fn embed(&self, item_ids: &[ItemId]) -> Result<Vec<Vec<f32>>> {
        let url = Self::endpoint(&self.config.embedding_endpoint_url, "embedding")?;
        let body = serde_json::to_string(&EmbeddingRequest::for_items(item_ids))?;

        let response: EmbeddingResponse = self.invoke(url, body).await?;
        Ok(response
            .predictions
            .into_iter()
            .map(|p| p.embeddings)
            .collect())
    }
}

#[async_trait]
impl ScoringProvider for HttpModelClient {
    async fn score(&self, kind: PredictionKind, payload: &str) -> Result<ScoreResponse> {
        let url = self.scoring_endpoint(kind)?;
        self.invoke(url, payload.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        assert!(is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_transient(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_transient(StatusCode::BAD_REQUEST));
        assert!(!is_transient(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_configuration_error() {
        let client = HttpModelClient::new(ProviderConfig::default()).unwrap();

        let err = client.embed(&[1, 2]).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfiguration(_)));

        let err = client
            .score(PredictionKind::Rating, "{}")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_gives_up() {
        let config = ProviderConfig {
            // port 9 (discard) is not expected to accept HTTP connections
            embedding_endpoint_url: Some("http://127.0.0.1:9/invocations".to_string()),
            max_retries: 1,
            initial_backoff_ms: 1,
            timeout_ms: 500,
            ..Default::default()
        };
        let client = HttpModelClient::new(config).unwrap();

        let err = client.embed(&[1]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }
}
