//! Text generation capability port.
//!
//! The search core never talks to a model endpoint directly; it consumes the
//! [`TextGenerator`] trait and leaves transport, authentication, and retry to
//! the implementation. Concrete providers live in [`crate::providers`];
//! deterministic mocks for tests live here.

use crate::error::LlmError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Capability that turns a prompt into a model response.
///
/// Non-determinism across calls is expected and tolerated by the search; the
/// algorithm never requires two calls on the same prompt to agree.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a response for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Mock generator for deterministic tests.
///
/// Responses are produced by a closure over the prompt, with an optional FIFO
/// queue of canned responses consulted first. Every call is counted.
pub struct MockGenerator {
    queued: Mutex<VecDeque<Result<String, LlmError>>>,
    respond: Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// Create a mock that derives every response from the prompt.
    pub fn from_fn<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            queued: Mutex::new(VecDeque::new()),
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that echoes the prompt back as the response.
    pub fn echo() -> Self {
        Self::from_fn(|prompt| Ok(prompt.to_string()))
    }

    /// Queue a response to be returned by the next `generate` call, ahead of
    /// the closure.
    pub fn queue_response(&self, response: Result<String, LlmError>) {
        self.queued.lock().unwrap().push_back(response);
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(queued) = self.queued.lock().unwrap().pop_front() {
            return queued;
        }
        (self.respond)(prompt)
    }
}
