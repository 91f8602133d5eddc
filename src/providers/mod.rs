/*!
 * Client implementations for the external translation service.
 *
 * The service boundary is a single call of (text, source, target) → translated
 * text. It is expressed as a trait so the orchestrator and invoker can be
 * exercised against mocks in tests.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Abstract client for the external translation service.
///
/// Implementations may fail with transient errors (network, temporary service
/// trouble) or with a fatal quota condition the invoker recognizes by its
/// configured signature.
#[async_trait]
pub trait TranslationClient: Send + Sync + Debug {
    /// Translate a single piece of text between the given language codes.
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;
}

pub mod google;
pub mod mock;
