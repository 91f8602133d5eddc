/*!
 * # tabtrans - batch translation for tabular documents
 *
 * A Rust library for translating the textual content of delimited text files
 * and spreadsheet workbooks between natural languages.
 *
 * ## Features
 *
 * - Classifies cell fragments: numeric values, URLs, and marker-prefixed
 *   strings pass through untranslated
 * - Persistent JSON translation cache keyed by trimmed source text
 * - Bounded retries with fixed backoff against an unreliable service, with a
 *   fatal quota-exhaustion escape hatch
 * - Best-effort markup preservation around the translation call
 * - Bounded concurrent fragment resolution
 * - Checkpointing of cache and partial output on interruption
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `classify`: Fragment classification (pass-through detection)
 * - `document`: Tabular document model
 * - `formats`: Container adapters for delimited text and workbooks
 * - `translation`: The translation pipeline:
 *   - `translation::cache`: Persistent translation cache
 *   - `translation::markup`: Tag stripping and delimiter masking
 *   - `translation::invoker`: Retry-governed service invocation
 *   - `translation::batch`: Whole-document orchestration
 * - `providers`: Translation service clients (HTTP and mock)
 * - `file_utils`: Output-path naming
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod classify;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use classify::{Classification, classify};
pub use document::{Cell, CellPos, Document};
pub use errors::{CacheError, JobError, ProviderError};
pub use translation::{BatchOrchestrator, ResilientInvoker, TranslationCache};
