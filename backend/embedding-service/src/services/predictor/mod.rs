// ============================================
// Predictor
// ============================================
//
// Routes a scoring payload to the rating or the recommendation model
// and interprets the first prediction of the response.

use crate::error::{Result, ServiceError};
use crate::services::providers::{PredictionKind, ScoringProvider};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Raw score vector of the rating model
    Rating(Vec<f32>),
    Recommendation { recommend: bool, positive_score: f32 },
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Rating(scores) => {
                write!(f, "The user will likely rate this item to {:?}", scores)
            }
            Prediction::Recommendation { recommend: true, .. } => {
                write!(f, "We recommend the user this item.")
            }
            Prediction::Recommendation { recommend: false, .. } => {
                write!(f, "We DO NOT recommend the user this item.")
            }
        }
    }
}

pub struct Predictor {
    provider: Arc<dyn ScoringProvider>,
    /// Independent of the evaluation label threshold
    recommend_threshold: f32,
}

impl Predictor {
    pub fn new(provider: Arc<dyn ScoringProvider>, recommend_threshold: f32) -> Self {
        Self {
            provider,
            recommend_threshold,
        }
    }

    pub async fn predict(&self, kind: PredictionKind, payload: &str) -> Result<Prediction> {
        debug!("Predicting with {} model", kind.as_str());

        let response = self.provider.score(kind, payload).await?;
        let first = response.predictions.first().ok_or_else(|| {
            ServiceError::ProviderContractViolation("scoring response has no predictions".to_string())
        })?;

        let prediction = match kind {
            PredictionKind::Rating => Prediction::Rating(first.scores.clone()),
            PredictionKind::Recommendation => {
                let positive_score = first.positive_score()?;
                Prediction::Recommendation {
                    recommend: positive_score > self.recommend_threshold,
                    positive_score,
                }
            }
        };

        info!("{}", prediction);
        Ok(prediction)
    }
}
