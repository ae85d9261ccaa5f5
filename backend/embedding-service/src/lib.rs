pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
pub use models::Record;
pub use services::{
    EmbeddingCache, EmbeddingProvider, HttpModelClient, Prediction, PredictionKind, Predictor,
    ScoringProvider,
};
