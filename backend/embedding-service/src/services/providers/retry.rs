/// Exponential backoff for model endpoint calls
use crate::error::ServiceError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

/// Outcome of a single attempt
#[derive(Debug)]
pub enum AttemptError {
    /// Timeouts, connection failures, 5xx/429 responses
    Transient(String),
    /// Anything a retry cannot fix
    Fatal(ServiceError),
}

/// Run `f` until it succeeds, fails fatally, or retries run out
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, mut f: F) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut attempt = 0;
    let mut backoff = config.initial_backoff;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Transient(reason)) => {
                attempt += 1;

                if attempt > config.max_retries {
                    warn!("Max retries ({}) reached: {}", config.max_retries, reason);
                    return Err(ServiceError::Transport(format!(
                        "gave up after {} attempts: {}",
                        attempt, reason
                    )));
                }

                warn!(
                    "Retry attempt {}/{} in {:?}: {}",
                    attempt, config.max_retries, backoff, reason
                );
                tokio::time::sleep(backoff).await;

                backoff = Duration::from_millis(
                    ((backoff.as_millis() as f64 * config.backoff_multiplier)
                        .min(config.max_backoff.as_millis() as f64)) as u64,
                );
            }
        }
    }
}
