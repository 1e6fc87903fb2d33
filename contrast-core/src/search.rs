//! Greedy masked-search controller.
//!
//! The search is a greedy, non-backtracking, beam-width-1 search over "which
//! single chunk to perturb next". Each round masks every not-yet-retired
//! chunk of the current prompt, infills the mask, generates a response, and
//! scores it against the round's reference response. The best perturbation
//! of the round is committed irrevocably: either it clears the threshold and
//! the search ends, or it becomes the new baseline and its index is retired.
//! Total work is bounded by O(n^2) capability invocations for an n-chunk
//! prompt, and the search terminates in at most n rounds.

use crate::chunk::{join_chunks, mask_chunk, split_prompt};
use crate::error::{LlmError, Result, SearchError};
use crate::explanation::{Attempt, ContrastiveExplanation, IterationLog, SearchOutcome};
use crate::generation::TextGenerator;
use crate::infill::PromptInfiller;
use crate::score::contrast_score;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Parameters of one search invocation.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Words per chunk. Must be positive.
    pub split_k: usize,
    /// Acceptance threshold for the contrast score, in [0, 1].
    pub delta: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            split_k: 1,
            delta: 0.2,
        }
    }
}

impl SearchParams {
    /// Reject invalid parameters before any capability call is made.
    fn validate(&self) -> std::result::Result<(), SearchError> {
        if self.split_k == 0 {
            return Err(SearchError::InvalidSplitK { got: self.split_k });
        }
        if !(0.0..=1.0).contains(&self.delta) {
            return Err(SearchError::InvalidDelta { got: self.delta });
        }
        Ok(())
    }
}

impl From<&crate::config::SearchConfig> for SearchParams {
    fn from(config: &crate::config::SearchConfig) -> Self {
        Self {
            split_k: config.split_k,
            delta: config.delta,
        }
    }
}

/// Mutable state threaded through the rounds of one search.
///
/// Owned exclusively by the controller; [`ContrastSearch::run_round`]
/// consumes a state and returns the next one, so a single round can be
/// unit-tested in isolation.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// The prompt the current round perturbs. Re-based to the round's best
    /// perturbation whenever the threshold is not met.
    pub prompt: String,
    /// The reference response scores are computed against.
    pub response: String,
    /// Chunk indices not yet retired. Iterated in ascending numeric order;
    /// shrinks by exactly one per non-terminating round, never regrows.
    pub remaining: BTreeSet<usize>,
    /// Current round counter; round 0 is the unperturbed baseline.
    pub round: u32,
    /// Audit trail of every evaluation so far.
    pub log: IterationLog,
}

/// The round's best attempt: the perturbation committed to when the round
/// closes.
#[derive(Debug, Clone)]
pub struct RoundWinner {
    pub index: usize,
    pub prompt: String,
    pub response: String,
    pub score: f64,
}

/// Outcome of one round of the search.
#[derive(Debug)]
pub enum RoundOutcome {
    /// The round's best attempt met the threshold; the search is over.
    ThresholdMet {
        winner: RoundWinner,
        log: IterationLog,
    },
    /// Threshold not met; the state has been re-based onto the round's best
    /// attempt and its index retired.
    Advanced(SearchState),
    /// No further candidates exist; the search ends without an explanation.
    Exhausted(IterationLog),
}

/// The greedy contrastive search, parameterized over its two capability
/// ports.
pub struct ContrastSearch {
    generator: Arc<dyn TextGenerator>,
    infiller: Arc<dyn PromptInfiller>,
}

impl ContrastSearch {
    pub fn new(generator: Arc<dyn TextGenerator>, infiller: Arc<dyn PromptInfiller>) -> Self {
        Self {
            generator,
            infiller,
        }
    }

    /// Run the full search for `x0`.
    ///
    /// Returns [`SearchOutcome::Found`] as soon as a round's best attempt
    /// scores at least `delta`, or [`SearchOutcome::Exhausted`] once every
    /// chunk has been tried as the sole perturbation target. Capability
    /// failures propagate immediately; the search never retries a call
    /// (wrap the ports with [`crate::providers::RetryingGenerator`] for
    /// resilience).
    pub async fn run(&self, x0: &str, params: &SearchParams) -> Result<SearchOutcome> {
        params.validate()?;

        let original_prompt = x0.to_string();
        let original_response = require_nonempty(self.generator.generate(x0).await?)?;
        info!(prompt = %original_prompt, "Original response obtained");

        let mut log = IterationLog::new();
        log.push(Attempt {
            round: 0,
            mask_index: None,
            prompt: original_prompt.clone(),
            response: original_response.clone(),
            score: None,
        });

        let chunk_count = split_prompt(x0, params.split_k)?.len();
        if chunk_count == 0 {
            info!("Prompt has no chunks; nothing to perturb");
            return Ok(SearchOutcome::Exhausted { iterations: log });
        }

        let mut state = SearchState {
            prompt: original_prompt.clone(),
            response: original_response.clone(),
            remaining: (0..chunk_count).collect(),
            round: 1,
            log,
        };

        loop {
            match self.run_round(state, params).await? {
                RoundOutcome::ThresholdMet { winner, log } => {
                    info!(score = winner.score, "Contrastive explanation found");
                    return Ok(SearchOutcome::Found(ContrastiveExplanation {
                        original_prompt,
                        original_response,
                        contrastive_prompt: winner.prompt,
                        contrastive_response: winner.response,
                        contrast_score: winner.score,
                        iterations: log,
                    }));
                }
                RoundOutcome::Advanced(next) => state = next,
                RoundOutcome::Exhausted(iterations) => {
                    info!("Search exhausted without meeting the threshold");
                    return Ok(SearchOutcome::Exhausted { iterations });
                }
            }
        }
    }

    /// Evaluate one round against `state` and close it.
    ///
    /// Every remaining in-range index is evaluated in ascending order; the
    /// best score is tracked under strict `>`, so exact ties keep the first
    /// index encountered. Indices that fall outside the current chunk
    /// sequence (a perturbation shrank the prompt) are skipped for the
    /// round without being retired.
    pub async fn run_round(
        &self,
        mut state: SearchState,
        params: &SearchParams,
    ) -> Result<RoundOutcome> {
        let chunks = split_prompt(&state.prompt, params.split_k)?;
        let mut best: Option<RoundWinner> = None;

        let candidates: Vec<usize> = state.remaining.iter().copied().collect();
        for j in candidates {
            if j >= chunks.len() {
                debug!(
                    round = state.round,
                    mask_index = j,
                    chunks = chunks.len(),
                    "Index outside current chunk sequence; skipping this round"
                );
                continue;
            }
            let masked_text = join_chunks(&mask_chunk(&chunks, j)?);
            let perturbed_prompt = require_nonempty(self.infiller.infill(&masked_text).await?)?;
            let perturbed_response =
                require_nonempty(self.generator.generate(&perturbed_prompt).await?)?;
            let score = contrast_score(&state.response, &perturbed_response);

            debug!(
                round = state.round,
                mask_index = j,
                score = score,
                prompt = %perturbed_prompt,
                "Evaluated masked candidate"
            );

            state.log.push(Attempt {
                round: state.round,
                mask_index: Some(j),
                prompt: perturbed_prompt.clone(),
                response: perturbed_response.clone(),
                score: Some(score),
            });

            // Strict > keeps the first-encountered index on exact ties.
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(RoundWinner {
                    index: j,
                    prompt: perturbed_prompt,
                    response: perturbed_response,
                    score,
                });
            }
        }

        let Some(best) = best else {
            // Every remaining index was out of range for the current prompt;
            // no perturbation is reachable anymore.
            return Ok(RoundOutcome::Exhausted(state.log));
        };

        if best.score >= params.delta {
            return Ok(RoundOutcome::ThresholdMet {
                winner: best,
                log: state.log,
            });
        }

        info!(
            round = state.round,
            best_index = best.index,
            best_score = best.score,
            "No sufficient contrast this round; re-basing on best perturbation"
        );

        state.prompt = best.prompt;
        state.response = best.response;
        state.remaining.remove(&best.index);
        state.round += 1;

        if state.remaining.is_empty() {
            Ok(RoundOutcome::Exhausted(state.log))
        } else {
            Ok(RoundOutcome::Advanced(state))
        }
    }
}

/// Treat whitespace-only capability output as a generation failure so it
/// cannot corrupt the contrast score.
fn require_nonempty(text: String) -> std::result::Result<String, LlmError> {
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

/// Convenience entry point: run one search with the given capabilities.
pub async fn run_search(
    x0: &str,
    params: &SearchParams,
    generator: Arc<dyn TextGenerator>,
    infiller: Arc<dyn PromptInfiller>,
) -> Result<SearchOutcome> {
    ContrastSearch::new(generator, infiller).run(x0, params).await
}
