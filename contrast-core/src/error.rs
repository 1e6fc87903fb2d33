//! Error types for the contrast core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering LLM capability, search, and configuration domains.

/// Top-level error type for the contrast core library.
#[derive(Debug, thiserror::Error)]
pub enum ContrastError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the text generation / infilling capability boundary.
///
/// Generation and infilling share this error kind since both route through
/// the same underlying model endpoint.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },

    #[error("Provider returned an empty response for a non-empty prompt")]
    EmptyResponse,
}

/// Errors from the contrastive search itself.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("split_k must be a positive integer, got {got}")]
    InvalidSplitK { got: usize },

    #[error("delta must lie in [0, 1], got {got}")]
    InvalidDelta { got: f64 },

    #[error("mask index {index} out of range for {len} chunks")]
    MaskIndexOutOfRange { index: usize, len: usize },
}

/// Errors from configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {message}")]
    LoadFailed { message: String },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ContrastError>;
