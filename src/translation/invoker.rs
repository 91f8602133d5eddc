/*!
 * Resilient wrapper around the external translation call.
 *
 * Each invocation gets a bounded number of attempts with a fixed delay
 * between them. A failure carrying the configured quota signature is fatal
 * and short-circuits the whole job; any other failure is retried, and once
 * the attempt budget is spent the original text is returned as a degraded
 * result so the batch keeps moving.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::errors::JobError;
use crate::providers::TranslationClient;

/// Outcome of a single fragment invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The service produced a translation
    Translated(String),
    /// All attempts failed; the original text is returned unchanged and must
    /// not be cached
    Degraded(String),
}

/// Retry-governed invoker for the translation service.
pub struct ResilientInvoker {
    client: Arc<dyn TranslationClient>,
    max_attempts: u32,
    retry_delay: Duration,
    quota_signature: String,
}

impl ResilientInvoker {
    /// Create an invoker over the given client.
    pub fn new(
        client: Arc<dyn TranslationClient>,
        max_attempts: u32,
        retry_delay: Duration,
        quota_signature: &str,
    ) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
            retry_delay,
            quota_signature: quota_signature.to_string(),
        }
    }

    /// Translate one fragment, retrying transient failures.
    ///
    /// Returns `Translated` text, or `Degraded` with the original text once
    /// all attempts are spent. The only error this surfaces is `FatalQuota`,
    /// which must stop the whole job.
    pub async fn invoke(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Invocation, JobError> {
        let mut attempt = 0;

        while attempt < self.max_attempts {
            match self
                .client
                .translate(text, source_language, target_language)
                .await
            {
                Ok(translated) => return Ok(Invocation::Translated(translated)),
                Err(e) if e.is_quota_exhausted(&self.quota_signature) => {
                    return Err(JobError::FatalQuota(e.to_string()));
                }
                Err(e) => {
                    attempt += 1;
                    if attempt < self.max_attempts {
                        debug!(
                            "Translation attempt {}/{} failed: {}. Retrying in {:?}",
                            attempt, self.max_attempts, e, self.retry_delay
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    } else {
                        warn!(
                            "Giving up on '{}' after {} attempts: {}. Keeping original text.",
                            truncate(text, 40),
                            self.max_attempts,
                            e
                        );
                    }
                }
            }
        }

        Ok(Invocation::Degraded(text.to_string()))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
