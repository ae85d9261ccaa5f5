pub mod dataset;
pub mod embedding;
pub mod evaluation;
pub mod predictor;
pub mod providers;

pub use embedding::EmbeddingCache;
pub use predictor::{Prediction, Predictor};
pub use providers::{EmbeddingProvider, HttpModelClient, PredictionKind, ScoringProvider};
