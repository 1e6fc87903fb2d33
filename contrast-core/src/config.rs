//! Configuration system for contrast.
//!
//! Uses `figment` for layered configuration: defaults -> user config ->
//! workspace config -> environment -> explicit overrides. Configuration is
//! loaded from `~/.config/contrast/config.toml` and/or
//! `.contrast/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub search: SearchConfig,
}

/// Configuration for the model endpoint behind the generation and infilling
/// capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "openai" or any OpenAI-compatible endpoint.
    pub provider: String,
    /// Model identifier (e.g., "gpt-4o"). Opaque pass-through; the search
    /// core does not interpret it.
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional base URL override for the API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens to generate per response.
    pub max_tokens: usize,
    /// Sampling temperature. Opaque pass-through to the capability.
    pub temperature: f32,
    /// Per-call timeout enforced at the capability boundary.
    pub request_timeout_secs: u64,
    /// Maximum retries for transient capability failures. Retry lives in the
    /// provider wrapper, never inside the search loop.
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: None,
            max_tokens: 1024,
            temperature: 0.7,
            request_timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Parameters of the greedy contrastive search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Words per chunk. Must be positive.
    pub split_k: usize,
    /// Acceptance threshold for the contrast score, in [0, 1].
    pub delta: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            split_k: 1,
            delta: 0.2,
        }
    }
}

impl SearchConfig {
    /// Validate search parameters. Rejected values never reach a capability
    /// call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.split_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.split_k".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.delta) {
            return Err(ConfigError::InvalidValue {
                field: "search.delta".to_string(),
                reason: format!("must lie in [0, 1], got {}", self.delta),
            });
        }
        Ok(())
    }
}

/// Load configuration with layered precedence (highest wins):
///
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `CONTRAST_`)
/// 3. Workspace-local config (`.contrast/config.toml`)
/// 4. User config (`~/.config/contrast/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&AppConfig>,
) -> Result<AppConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("dev", "contrast", "contrast") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".contrast").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // CONTRAST_LLM__MODEL, CONTRAST_SEARCH__DELTA, etc.
    figment = figment.merge(Env::prefixed("CONTRAST_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment
        .extract()
        .map_err(|e| ConfigError::LoadFailed {
            message: e.to_string(),
        })
}
