/*!
 * Batch orchestration of a document translation job.
 *
 * The orchestrator extracts every non-empty text cell, deduplicates fragments
 * by trimmed value, resolves each unique fragment exactly once (pass-through
 * classification, then cache, then the resilient invoker), and fans the
 * resolved values back out to every cell position. Resolution runs on a
 * bounded concurrent worker pool; write-back is a deterministic function of
 * fragment identity, so resolution order never affects the output.
 *
 * Interruption is observed mid-pool: whatever has been resolved when the
 * cancel signal arrives is flushed to the cache and written back into the
 * document, which the caller then persists under a partial output name.
 */

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{info, warn};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::classify::{Classification, classify};
use crate::document::{CellPos, Document};
use crate::errors::JobError;
use crate::translation::cache::TranslationCache;
use crate::translation::invoker::{Invocation, ResilientInvoker};
use crate::translation::markup;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Unique fragments found in the document
    pub unique_fragments: usize,
    /// Fragments skipped as numeric/URL/marker pass-through
    pub passthrough: usize,
    /// Fragments served from the persistent cache
    pub cache_hits: usize,
    /// Fragments resolved through the translation service this run
    pub translated: usize,
    /// Fragments left untranslated after exhausting the retry budget
    pub degraded: usize,
}

impl TranslationStats {
    /// Fragments resolved by any means, degraded fallbacks included.
    pub fn resolved(&self) -> usize {
        self.passthrough + self.cache_hits + self.translated + self.degraded
    }
}

/// How the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// All fragments resolved and written back
    Completed,
    /// Interrupted mid-run; the document holds a partial translation
    Interrupted,
    /// The service signaled quota exhaustion; no further calls were made
    QuotaExhausted(String),
}

/// Result of a run: the (possibly partially) translated document, counters,
/// and the way the run ended. The cache has already been flushed in every
/// case by the time this is returned.
#[derive(Debug)]
pub struct RunReport {
    /// Translated document; on interruption, resolved cells are translated
    /// and the rest carry their original text
    pub document: Document,
    /// Run counters
    pub stats: TranslationStats,
    /// Terminal condition
    pub termination: Termination,
}

/// Drives a whole-document translation with caching, concurrency, and
/// checkpoint-on-interrupt semantics.
pub struct BatchOrchestrator {
    invoker: Arc<ResilientInvoker>,
    cache: TranslationCache,
    cache_path: PathBuf,
    source_language: String,
    target_language: String,
    passthrough_prefixes: Vec<String>,
    delimiter: char,
    max_concurrent: usize,
}

impl BatchOrchestrator {
    /// Create an orchestrator. The cache handle is shared with the caller;
    /// the orchestrator owns flushing it to `cache_path`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        invoker: Arc<ResilientInvoker>,
        cache: TranslationCache,
        cache_path: PathBuf,
        source_language: &str,
        target_language: &str,
        passthrough_prefixes: Vec<String>,
        delimiter: char,
        max_concurrent: usize,
    ) -> Self {
        Self {
            invoker,
            cache,
            cache_path,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            passthrough_prefixes,
            delimiter,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Translate every text cell of the document.
    ///
    /// `cancel` is a watch channel the caller flips to `true` on an interrupt
    /// signal; `progress` is called with (resolved, total unique) as fragments
    /// resolve. The cache is flushed before returning in all terminal states.
    pub async fn translate_document(
        &self,
        mut document: Document,
        cancel: watch::Receiver<bool>,
        progress: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<RunReport, JobError> {
        let positions: Vec<(CellPos, String)> = document
            .text_cells()
            .into_iter()
            .map(|(pos, text)| (pos, text.to_string()))
            .collect();

        // Dedup by trimmed value, first-seen order.
        let mut unique: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for (_, text) in &positions {
            let key = text.trim().to_string();
            if seen.insert(key.clone()) {
                unique.push(key);
            }
        }

        let mut stats = TranslationStats {
            unique_fragments: unique.len(),
            ..Default::default()
        };

        // Resolved fragment values, keyed by trimmed source text. Shared with
        // the worker pool; only fully resolved pairs are ever inserted.
        let resolutions: Arc<Mutex<HashMap<String, String>>> =
            Arc::new(Mutex::new(HashMap::new()));

        // Pass-through and cache hits resolve without blocking.
        let mut pending: Vec<String> = Vec::new();
        for key in unique {
            let classification = classify(&key, &self.passthrough_prefixes);
            if classification.is_passthrough() {
                resolutions.lock().insert(key.clone(), key);
                stats.passthrough += 1;
            } else if let Some(hit) = self.cache.get(&key) {
                resolutions.lock().insert(key, hit);
                stats.cache_hits += 1;
            } else {
                pending.push(key);
            }
        }

        let total = stats.unique_fragments;
        progress(stats.resolved(), total);

        let outcome = self
            .resolve_pending(pending, &resolutions, &mut stats, cancel, progress)
            .await;

        // Checkpoint the cache in every terminal state, error included,
        // before anything else can go wrong.
        self.cache.flush(&self.cache_path)?;
        let termination = outcome?;

        // Fan resolved values out to every position sharing the fragment.
        // Unresolved cells keep their original text.
        {
            let resolved = resolutions.lock();
            for (pos, text) in &positions {
                if let Some(translated) = resolved.get(text.trim()) {
                    document.set_text(*pos, translated.clone());
                }
            }
        }

        match &termination {
            Termination::Completed => {
                info!(
                    "Translation complete: {} unique fragments ({} pass-through, {} cache hits, {} translated, {} kept untranslated)",
                    stats.unique_fragments,
                    stats.passthrough,
                    stats.cache_hits,
                    stats.translated,
                    stats.degraded
                );
            }
            Termination::Interrupted => {
                warn!(
                    "Interrupted: {}/{} fragments resolved; cache and partial output checkpointed",
                    stats.resolved(),
                    stats.unique_fragments
                );
            }
            Termination::QuotaExhausted(message) => {
                warn!("Translation quota exhausted: {}", message);
            }
        }

        Ok(RunReport {
            document,
            stats,
            termination,
        })
    }

    /// Run the bounded worker pool over fragments needing a service call,
    /// racing it against the cancel signal.
    async fn resolve_pending(
        &self,
        pending: Vec<String>,
        resolutions: &Arc<Mutex<HashMap<String, String>>>,
        stats: &mut TranslationStats,
        cancel: watch::Receiver<bool>,
        progress: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<Termination, JobError> {
        if pending.is_empty() {
            return Ok(Termination::Completed);
        }

        let total = stats.unique_fragments;
        let mut results = stream::iter(pending)
            .map(|key| {
                let invoker = Arc::clone(&self.invoker);
                let source = self.source_language.clone();
                let target = self.target_language.clone();
                let delimiter = self.delimiter;
                async move {
                    let outcome =
                        Self::translate_fragment(&invoker, &key, &source, &target, delimiter).await;
                    (key, outcome)
                }
            })
            .buffer_unordered(self.max_concurrent);

        let cancelled = cancelled_signal(cancel);
        tokio::pin!(cancelled);

        loop {
            tokio::select! {
                biased;
                _ = &mut cancelled => {
                    // In-flight translations are abandoned; everything already
                    // resolved has been inserted and will be checkpointed.
                    return Ok(Termination::Interrupted);
                }
                next = results.next() => match next {
                    Some((key, Ok(outcome))) => {
                        let text = match outcome {
                            Invocation::Translated(text) => {
                                // Only fully resolved translations enter the
                                // cache; degraded fallbacks stay uncached so a
                                // later run can retry them.
                                self.cache.put(&key, &text);
                                stats.translated += 1;
                                text
                            }
                            Invocation::Degraded(text) => {
                                stats.degraded += 1;
                                text
                            }
                        };
                        resolutions.lock().insert(key, text);
                        progress(stats.resolved(), total);
                    }
                    Some((_, Err(JobError::FatalQuota(message)))) => {
                        return Ok(Termination::QuotaExhausted(message));
                    }
                    Some((_, Err(e))) => {
                        // The invoker degrades instead of erroring for
                        // transient failures, so this is unreachable in
                        // practice. Propagate rather than guessing at a
                        // termination; the caller still checkpoints the cache.
                        warn!("Unexpected fragment error: {}", e);
                        return Err(e);
                    }
                    None => return Ok(Termination::Completed),
                }
            }
        }
    }

    /// Resolve one fragment through the markup-preserving path.
    async fn translate_fragment(
        invoker: &ResilientInvoker,
        fragment: &str,
        source_language: &str,
        target_language: &str,
        delimiter: char,
    ) -> Result<Invocation, JobError> {
        let masked = markup::mask_delimiter(fragment, delimiter);

        let outcome = if matches!(classify(&masked, &[]), Classification::Markup) {
            let plain = markup::strip_tags(&masked);
            match invoker
                .invoke(&plain, source_language, target_language)
                .await?
            {
                Invocation::Translated(text) => {
                    Invocation::Translated(markup::rewrap(&masked, &text))
                }
                // Degraded markup fragments keep their full original form,
                // tags included.
                Invocation::Degraded(_) => Invocation::Degraded(masked.clone()),
            }
        } else {
            invoker
                .invoke(&masked, source_language, target_language)
                .await?
        };

        Ok(match outcome {
            Invocation::Translated(text) => {
                Invocation::Translated(markup::unmask_delimiter(&text, delimiter))
            }
            Invocation::Degraded(text) => {
                Invocation::Degraded(markup::unmask_delimiter(&text, delimiter))
            }
        })
    }
}

/// Future that resolves once the watch channel reports cancellation. If the
/// sender goes away without ever signaling, the future never resolves.
async fn cancelled_signal(mut cancel: watch::Receiver<bool>) {
    loop {
        if *cancel.borrow() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
