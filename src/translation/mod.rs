/*!
 * Translation pipeline for tabular documents.
 *
 * This module contains the memoization and resilience core of the
 * application, split into several submodules:
 *
 * - `cache`: persistent translation cache keyed by trimmed source text
 * - `markup`: tag stripping / re-wrapping and delimiter masking
 * - `invoker`: bounded-retry wrapper around the external service call
 * - `batch`: whole-document orchestration with dedup and checkpointing
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOrchestrator, RunReport, Termination, TranslationStats};
pub use self::cache::TranslationCache;
pub use self::invoker::{Invocation, ResilientInvoker};

// Submodules
pub mod batch;
pub mod cache;
pub mod invoker;
pub mod markup;
