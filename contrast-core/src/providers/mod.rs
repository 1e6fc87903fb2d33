//! Concrete capability implementations.
//!
//! Provides the OpenAI-compatible [`TextGenerator`] backing both the
//! generation and infilling ports, plus the retry wrapper callers use for
//! resilience. The search core itself never retries: a retried call must not
//! silently double-count in the iteration log, so backoff lives out here at
//! the capability boundary.

pub mod openai_compat;

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::generation::TextGenerator;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use openai_compat::OpenAiCompatibleProvider;

const INITIAL_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF_MS: u64 = 8_000;

/// Execute an async operation with exponential backoff retry on transient
/// errors.
///
/// Retries on `LlmError::RateLimited` (respects `retry_after_secs`),
/// `LlmError::Connection`, and `LlmError::Timeout`. Permanent errors (auth,
/// parse, empty response) return immediately.
pub async fn with_retry<F, Fut, T>(max_retries: u32, operation: F) -> Result<T, LlmError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut last_err = None;
    for attempt in 0..=max_retries {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !is_retryable(&e) || attempt == max_retries {
                    return Err(e);
                }
                let backoff_ms = compute_backoff(attempt, &e);
                tracing::warn!(
                    attempt = attempt + 1,
                    max = max_retries,
                    backoff_ms = backoff_ms,
                    error = %e,
                    "Retrying after transient error"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| LlmError::Connection {
        message: "All retry attempts exhausted".to_string(),
    }))
}

/// Check if an error is retryable (transient).
fn is_retryable(err: &LlmError) -> bool {
    matches!(
        err,
        LlmError::RateLimited { .. } | LlmError::Connection { .. } | LlmError::Timeout { .. }
    )
}

/// Compute backoff delay, respecting rate limit retry-after hints.
fn compute_backoff(attempt: u32, err: &LlmError) -> u64 {
    let exponential = (INITIAL_BACKOFF_MS << attempt).min(MAX_BACKOFF_MS);
    if let LlmError::RateLimited { retry_after_secs } = err {
        (retry_after_secs * 1000).max(exponential)
    } else {
        exponential
    }
}

/// A [`TextGenerator`] that wraps another generator with [`with_retry`].
///
/// This is where callers opt into resilience; the search algorithm only ever
/// sees the final outcome of a call.
pub struct RetryingGenerator {
    inner: Arc<dyn TextGenerator>,
    max_retries: u32,
}

impl RetryingGenerator {
    pub fn new(inner: Arc<dyn TextGenerator>, max_retries: u32) -> Self {
        Self { inner, max_retries }
    }
}

#[async_trait]
impl TextGenerator for RetryingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        with_retry(self.max_retries, || self.inner.generate(prompt)).await
    }
}

/// Instantiate the configured generator, wrapped for retry when
/// `config.max_retries > 0`.
pub fn create_generator(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>, LlmError> {
    let provider = Arc::new(OpenAiCompatibleProvider::new(config)?);
    if config.max_retries == 0 {
        return Ok(provider);
    }
    Ok(Arc::new(RetryingGenerator::new(
        provider,
        config.max_retries,
    )))
}
