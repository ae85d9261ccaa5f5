use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Format error: field '{field}' has invalid value '{value}'")]
    Format { field: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Length mismatch: {predictions} predictions vs {labels} labels")]
    LengthMismatch { predictions: usize, labels: usize },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Provider contract violation: {0}")]
    ProviderContractViolation(String),

    #[error("Missing embedding: {0}")]
    MissingEmbedding(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub(crate) fn format(field: &'static str, value: impl Into<String>) -> Self {
        ServiceError::Format {
            field,
            value: value.into(),
        }
    }
}
