/*!
 * Application controller.
 *
 * Wires the format adapter, persistent cache, translation client, invoker,
 * and batch orchestrator together for one input file, handles the interrupt
 * signal, drives the progress bar, and reports the final summary.
 */

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use tokio::sync::watch;

use crate::app_config::Config;
use crate::errors::JobError;
use crate::file_utils;
use crate::formats;
use crate::providers::TranslationClient;
use crate::providers::google::GoogleTranslateClient;
use crate::translation::{BatchOrchestrator, ResilientInvoker, Termination, TranslationCache};

/// Main application controller for a single translation job.
pub struct Controller {
    config: Config,
    client_override: Option<Arc<dyn TranslationClient>>,
}

impl Controller {
    /// Create a controller with the provided configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            client_override: None,
        })
    }

    /// Create a controller with an explicit translation client. Used by tests
    /// to run the full pipeline against a mock service.
    pub fn with_client(config: Config, client: Arc<dyn TranslationClient>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            client_override: Some(client),
        })
    }

    /// Translate one input file end to end.
    ///
    /// On success the translated document is written next to the input with a
    /// language suffix. On interruption a partial output is written instead
    /// and `JobError::Interrupted` is returned; on quota exhaustion the cache
    /// is already flushed and `JobError::FatalQuota` is returned. The caller
    /// maps these to distinct exit codes.
    pub async fn run(&self, input: &Path) -> Result<()> {
        if !input.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        let cache_path = Path::new(&self.config.cache_path).to_path_buf();
        let cache = TranslationCache::load(&cache_path)
            .context("Failed to load the translation cache")?;
        let previously_cached = cache.len();

        let adapter = formats::adapter_for(input, self.config.delimiter)?;
        let document = adapter
            .read(input)
            .with_context(|| format!("Failed to read input document {:?}", input))?;

        info!(
            "Translating {:?}: {} cells, {} -> {} ({} cached translations loaded)",
            input,
            document.cell_count(),
            self.config.source_language,
            self.config.target_language,
            previously_cached
        );

        let client = self.build_client()?;
        let invoker = Arc::new(ResilientInvoker::new(
            client,
            self.config.translation.max_attempts,
            Duration::from_secs(self.config.translation.retry_delay_secs),
            &self.config.translation.quota_signature,
        ));

        let orchestrator = BatchOrchestrator::new(
            invoker,
            cache.clone(),
            cache_path,
            &self.config.source_language,
            &self.config.target_language,
            self.config.passthrough_prefixes.clone(),
            self.config.delimiter,
            self.config.translation.concurrent_requests,
        );

        // The orchestrator observes interruption through this channel; the
        // signal task flips it on Ctrl-C.
        let (cancel_tx, cancel_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, checkpointing progress...");
                let _ = cancel_tx.send(true);
            }
        });

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} fragments ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let report = orchestrator
            .translate_document(document, cancel_rx, move |resolved, total| {
                pb.set_length(total as u64);
                pb.set_position(resolved as u64);
            })
            .await?;

        progress_bar.finish_and_clear();

        let stats = &report.stats;
        match report.termination {
            Termination::Completed => {
                let output = file_utils::translated_output_path(input, &self.config.target_language);
                adapter
                    .write(&report.document, &output)
                    .with_context(|| format!("Failed to write output document {:?}", output))?;
                info!("Translation finished. Output saved as: {:?}", output);
                info!(
                    "{} unique fragments: {} pass-through, {} cache hits, {} newly translated",
                    stats.unique_fragments, stats.passthrough, stats.cache_hits, stats.translated
                );
                info!("Total unique translations cached: {}", cache.len());
                Ok(())
            }
            Termination::Interrupted => {
                let output = file_utils::partial_output_path(input, &self.config.target_language);
                adapter
                    .write(&report.document, &output)
                    .with_context(|| format!("Failed to write partial document {:?}", output))?;
                warn!(
                    "Progress saved to {:?} ({}/{} fragments resolved)",
                    output,
                    stats.resolved(),
                    stats.unique_fragments
                );
                warn!("Total unique translations cached: {}", cache.len());
                Err(JobError::Interrupted.into())
            }
            Termination::QuotaExhausted(message) => {
                warn!(
                    "Stopping: the translation service reported quota exhaustion after {} fragments",
                    stats.resolved()
                );
                Err(JobError::FatalQuota(message).into())
            }
        }
    }

    fn build_client(&self) -> Result<Arc<dyn TranslationClient>> {
        if let Some(client) = &self.client_override {
            return Ok(Arc::clone(client));
        }
        let endpoint = self.config.translation.endpoint.trim();
        let client = if endpoint.is_empty() {
            GoogleTranslateClient::new()
        } else {
            GoogleTranslateClient::with_endpoint(endpoint)
        }
        .context("Failed to build the translation client")?;
        Ok(Arc::new(client))
    }
}
