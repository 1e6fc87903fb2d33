//! Prompt infilling capability port.
//!
//! Infilling replaces the mask marker in a perturbed prompt with fluent
//! model-generated text. The contract assumes the input contains exactly one
//! [`crate::chunk::MASK_TOKEN`]; the search controller guarantees this.
//! Behavior on zero or duplicated markers is undefined by contract.

use crate::chunk::MASK_TOKEN;
use crate::error::LlmError;
use crate::generation::TextGenerator;
use async_trait::async_trait;
use std::sync::Arc;

/// Capability that completes a prompt containing one mask marker.
#[async_trait]
pub trait PromptInfiller: Send + Sync {
    /// Return the masked prompt with the marker replaced by generated text
    /// that preserves the surrounding context.
    async fn infill(&self, masked_prompt: &str) -> Result<String, LlmError>;
}

/// Infiller built on top of any [`TextGenerator`] by wrapping the masked text
/// in a fill-the-mask instruction.
///
/// This mirrors how chat-completion models without a native infilling mode
/// are prompted to complete masked text.
pub struct InstructionInfiller {
    generator: Arc<dyn TextGenerator>,
}

impl InstructionInfiller {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn instruction(masked_prompt: &str) -> String {
        format!(
            "Please fill in the {MASK_TOKEN} token in the following text so that it \
             becomes natural and fluent. Reply with the completed text only:\n\n{masked_prompt}"
        )
    }
}

#[async_trait]
impl PromptInfiller for InstructionInfiller {
    async fn infill(&self, masked_prompt: &str) -> Result<String, LlmError> {
        self.generator
            .generate(&Self::instruction(masked_prompt))
            .await
    }
}

/// Mock infiller for deterministic tests: replaces the marker with a fixed
/// filler string. Counts calls like [`crate::generation::MockGenerator`].
pub struct MockInfiller {
    filler: String,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockInfiller {
    pub fn new(filler: impl Into<String>) -> Self {
        Self {
            filler: filler.into(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of `infill` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptInfiller for MockInfiller {
    async fn infill(&self, masked_prompt: &str) -> Result<String, LlmError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(masked_prompt.replace(MASK_TOKEN, &self.filler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockGenerator;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_mock_infiller_replaces_marker() {
        let infiller = MockInfiller::new("X");
        let filled = infiller.infill("a <mask> c").await.unwrap();
        assert_eq!(filled, "a X c");
        assert_eq!(infiller.call_count(), 1);
    }

    #[tokio::test]
    async fn test_instruction_infiller_routes_through_generator() {
        let generator = Arc::new(MockGenerator::from_fn(|prompt| {
            // The masked text must appear verbatim inside the instruction.
            assert!(prompt.contains("a <mask> c"));
            Ok("a filled c".to_string())
        }));
        let infiller = InstructionInfiller::new(generator.clone());
        let filled = infiller.infill("a <mask> c").await.unwrap();
        assert_eq!(filled, "a filled c");
        assert_eq!(generator.call_count(), 1);
    }
}
