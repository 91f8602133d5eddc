/*!
 * Mock translation clients for testing.
 *
 * The mocks simulate the behaviors the invoker must handle:
 * - `MockClient::working()` - always succeeds, bracketing the input
 * - `MockClient::failing()` - always fails with a transient error
 * - `MockClient::fail_first(n)` - fails the first n calls, then succeeds
 * - `MockClient::quota()` - fails with the quota-exhausted wording
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::TranslationClient;

/// Behavior mode for the mock client
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a marked-up translation
    Working,
    /// Always fails with a transient error
    Failing,
    /// Fails the first N calls, then succeeds
    FailFirst(usize),
    /// Fails with a message carrying the quota signature
    Quota,
}

/// Mock translation client with a shared call counter.
#[derive(Debug)]
pub struct MockClient {
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
    /// Fixed translations keyed by source text; falls back to bracketing
    responses: HashMap<String, String>,
    /// Wording used for the quota behavior
    quota_message: String,
}

impl MockClient {
    /// Create a mock with the given behavior.
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            responses: HashMap::new(),
            quota_message: "AVAILABLE FREE TRANSLATIONS exhausted for today".to_string(),
        }
    }

    /// Always-succeeding mock.
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Always-failing mock (transient errors).
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Mock that fails the first `n` calls and then succeeds.
    pub fn fail_first(n: usize) -> Self {
        Self::new(MockBehavior::FailFirst(n))
    }

    /// Mock that reports quota exhaustion.
    pub fn quota() -> Self {
        Self::new(MockBehavior::Quota)
    }

    /// Provide a fixed translation for a specific source text.
    pub fn with_response(mut self, source: &str, translation: &str) -> Self {
        self.responses.insert(source.to_string(), translation.to_string());
        self
    }

    /// Override the quota error wording.
    pub fn with_quota_message(mut self, message: &str) -> Self {
        self.quota_message = message.to_string();
        self
    }

    /// Number of calls made against this mock so far.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Handle to the shared call counter, observable after the client has
    /// been moved into the pipeline.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    fn respond(&self, text: &str, target_language: &str) -> String {
        self.responses
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target_language, text))
    }
}

#[async_trait]
impl TranslationClient for MockClient {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.respond(text, target_language)),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::FailFirst(n) => {
                if count < n {
                    Err(ProviderError::ConnectionError(format!(
                        "Simulated transient failure (call #{})",
                        count + 1
                    )))
                } else {
                    Ok(self.respond(text, target_language))
                }
            }

            MockBehavior::Quota => Err(ProviderError::ApiError {
                status_code: 429,
                message: self.quota_message.clone(),
            }),
        }
    }
}
