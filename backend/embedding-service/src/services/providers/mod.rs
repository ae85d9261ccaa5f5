// ============================================
// Model Providers
// ============================================
//
// Narrow interfaces over the remote embedding and scoring models.
// Core components depend only on these traits; the HTTP transport
// (timeouts, retries, decoding) lives in `http_client`.

pub mod http_client;
pub mod retry;

pub use http_client::HttpModelClient;
pub use retry::{with_retry, AttemptError, RetryConfig};

use crate::error::Result;
use crate::models::{ItemId, ScoreResponse};
use async_trait::async_trait;

/// Which scoring model a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    /// Regression model predicting the rating
    Rating,
    /// Binary model predicting whether to recommend
    Recommendation,
}

impl PredictionKind {
    /// Exactly `"rating"` selects the rating model; anything else the recommendation model.
    pub fn parse(s: &str) -> Self {
        match s {
            "rating" => PredictionKind::Rating,
            _ => PredictionKind::Recommendation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionKind::Rating => "rating",
            PredictionKind::Recommendation => "recommendation",
        }
    }
}

/// Maps a batch of item ids to embedding vectors, one per id, in request order
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, item_ids: &[ItemId]) -> Result<Vec<Vec<f32>>>;
}

/// Scores a pre-serialized `{instances: [...]}` payload
#[async_trait]
pub trait ScoringProvider: Send + Sync {
    async fn score(&self, kind: PredictionKind, payload: &str) -> Result<ScoreResponse>;
}
