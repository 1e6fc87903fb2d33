//! Result and iteration-log model for the contrastive search.
//!
//! Every capability evaluation the search makes is recorded as an immutable
//! [`Attempt`] in an append-only [`IterationLog`]. The log doubles as the
//! audit trail handed to report/visualization consumers, so both terminal
//! outcomes carry it in full.

use serde::{Deserialize, Serialize};

/// One evaluation record: a single masked/infilled prompt and the response
/// it produced.
///
/// The zeroth record of every search captures the unperturbed prompt and its
/// response; it has no mask index and no score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// Round this attempt belongs to; round 0 is the unperturbed baseline.
    pub round: u32,
    /// Chunk index that was masked, absent for the baseline record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_index: Option<usize>,
    /// The perturbed (infilled) prompt, or the original prompt for round 0.
    pub prompt: String,
    /// The model response to `prompt`.
    pub response: String,
    /// Contrast score against the round's reference response, absent for the
    /// baseline record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Ordered, append-only sequence of [`Attempt`] records.
///
/// Insertion order is evaluation order: round counters increase
/// monotonically, and within a round attempts appear in ascending mask-index
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IterationLog(Vec<Attempt>);

impl IterationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one attempt. Appending is the only mutation the log supports.
    pub fn push(&mut self, attempt: Attempt) {
        self.0.push(attempt);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attempt> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Attempt] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a IterationLog {
    type Item = &'a Attempt;
    type IntoIter = std::slice::Iter<'a, Attempt>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A successful contrastive explanation: the minimal single-chunk
/// perturbation whose response cleared the acceptance threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastiveExplanation {
    /// The prompt the search started from.
    pub original_prompt: String,
    /// The baseline response to `original_prompt`, generated at search start.
    pub original_response: String,
    /// The winning perturbed prompt.
    pub contrastive_prompt: String,
    /// The response to the winning perturbed prompt.
    pub contrastive_response: String,
    /// Contrast score of the winning attempt; `>= delta` by construction.
    pub contrast_score: f64,
    /// Full audit trail of every evaluation made.
    pub iterations: IterationLog,
}

/// Terminal outcome of one contrastive search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A perturbation met the contrast threshold.
    Found(ContrastiveExplanation),
    /// Every chunk was tried as the sole perturbation target and none
    /// reached the threshold. Not an error; the log is still the full
    /// audit trail.
    Exhausted { iterations: IterationLog },
}

impl SearchOutcome {
    /// The iteration log, regardless of outcome.
    pub fn iterations(&self) -> &IterationLog {
        match self {
            SearchOutcome::Found(explanation) => &explanation.iterations,
            SearchOutcome::Exhausted { iterations } => iterations,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}
