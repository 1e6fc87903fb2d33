//! # Contrast Core
//!
//! Core library for contrastive explanation of LLM responses. Starting from
//! an original prompt/response pair, the search looks for a minimally-edited
//! perturbation of the prompt that causes a maximally different response:
//! the prompt is split into word chunks, one chunk at a time is masked,
//! infilled by the model, and the response to the perturbed prompt is scored
//! against the baseline. The best perturbation per round is committed
//! greedily until the contrast threshold is met or every chunk is exhausted.

pub mod chunk;
pub mod config;
pub mod error;
pub mod explanation;
pub mod generation;
pub mod infill;
pub mod providers;
pub mod score;
pub mod search;

// Re-export commonly used types at the crate root.
pub use chunk::{MASK_TOKEN, join_chunks, mask_chunk, split_prompt};
pub use config::{AppConfig, LlmConfig, SearchConfig, load_config};
pub use error::{ConfigError, ContrastError, LlmError, Result, SearchError};
pub use explanation::{Attempt, ContrastiveExplanation, IterationLog, SearchOutcome};
pub use generation::{MockGenerator, TextGenerator};
pub use infill::{InstructionInfiller, MockInfiller, PromptInfiller};
pub use providers::{OpenAiCompatibleProvider, RetryingGenerator, create_generator};
pub use score::contrast_score;
pub use search::{ContrastSearch, SearchParams, SearchState, run_search};
