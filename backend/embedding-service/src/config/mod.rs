use crate::services::dataset::SplitRatios;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Provider config error: {0}")]
    Provider(#[from] envy::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub dataset: DatasetConfig,
    pub providers: ProviderConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_name: String,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Ratings file, relative to `data_dir` unless absolute
    pub data_file: String,
    /// `id|name|...` item metadata file
    pub item_file: String,
    pub delimiter: u8,
    pub split_ratios: SplitRatios,
    /// Ratings above this are the positive class during evaluation
    pub label_threshold: f32,
    /// Positive-class score above which the recommendation model recommends
    pub recommend_threshold: f32,
}

/// Model endpoint settings, read from `MODEL_*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub embedding_endpoint_url: Option<String>,
    pub rating_endpoint_url: Option<String>,
    pub recommendation_endpoint_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            embedding_endpoint_url: None,
            rating_endpoint_url: None,
            recommendation_endpoint_url: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

impl DatasetConfig {
    pub fn data_path(&self, service: &ServiceConfig) -> PathBuf {
        service.data_dir.join(&self.data_file)
    }

    pub fn item_path(&self, service: &ServiceConfig) -> PathBuf {
        service.data_dir.join(&self.item_file)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            service: ServiceConfig {
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "embedding-service".to_string()),
                data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string())),
                output_dir: PathBuf::from(
                    env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
                ),
            },
            dataset: DatasetConfig {
                data_file: env::var("DATA_FILE").unwrap_or_else(|_| "ua.base".to_string()),
                item_file: env::var("ITEM_FILE").unwrap_or_else(|_| "u.item".to_string()),
                delimiter: parse_delimiter(
                    &env::var("DATA_DELIMITER").unwrap_or_else(|_| "\\t".to_string()),
                )?,
                split_ratios: parse_var("SPLIT_RATIOS", "train=0.8,test=0.2")?,
                label_threshold: parse_var("LABEL_THRESHOLD", "3.0")?,
                recommend_threshold: parse_var("RECOMMEND_THRESHOLD", "0.5")?,
            },
            providers: envy::prefixed("MODEL_").from_env::<ProviderConfig>()?,
        })
    }
}

fn parse_var<T>(var: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = env::var(var).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

/// Single-byte delimiter; `\t` and `tab` are accepted for tab
fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        var: "DATA_DELIMITER",
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    match raw {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        _ => Err(invalid("expected a single ASCII character")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_provider_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(config.embedding_endpoint_url.is_none());
    }

    #[test]
    fn test_data_paths() {
        let service = ServiceConfig {
            service_name: "embedding-service".to_string(),
            data_dir: PathBuf::from("/data/ml-100k"),
            output_dir: PathBuf::from("/tmp/out"),
        };
        let dataset = DatasetConfig {
            data_file: "ua.base".to_string(),
            item_file: "u.item".to_string(),
            delimiter: b'\t',
            split_ratios: SplitRatios::default(),
            label_threshold: 3.0,
            recommend_threshold: 0.5,
        };
        assert_eq!(dataset.data_path(&service), PathBuf::from("/data/ml-100k/ua.base"));
        assert_eq!(dataset.item_path(&service), PathBuf::from("/data/ml-100k/u.item"));
    }
}
