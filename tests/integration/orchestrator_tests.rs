/*!
 * End-to-end orchestrator tests against mock translation clients.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use tabtrans::errors::ProviderError;
use tabtrans::providers::TranslationClient;
use tabtrans::providers::mock::MockClient;
use tabtrans::translation::Termination;

use crate::common::{self, document, grid_text, no_cancel, no_progress, rig, rig_with_cache};

fn cache_file(rig: &common::TestRig) -> HashMap<String, String> {
    let raw = std::fs::read_to_string(&rig.cache_path).expect("cache file written");
    serde_json::from_str(&raw).expect("cache file is a string map")
}

#[tokio::test]
async fn test_translateDocument_withSpecExample_shouldTranslateAndCacheExactly() {
    let client = MockClient::working()
        .with_response("Hola", "Olá")
        .with_response("Adios", "Adeus");
    let counter = client.call_counter();
    let rig = rig(Arc::new(client), 5, 4);

    let doc = document(&[&["1,234", "Hola", "http://x.com"], &["Hola", "Adios"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, no_cancel(), no_progress())
        .await
        .unwrap();

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(
        grid_text(&report.document),
        vec![
            vec!["1,234".to_string(), "Olá".to_string(), "http://x.com".to_string()],
            vec!["Olá".to_string(), "Adeus".to_string()],
        ]
    );

    // One service call per unique translatable fragment
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    // Cache contains exactly the two translations; pass-through never cached
    let persisted = cache_file(&rig);
    let expected: HashMap<String, String> = [
        ("Hola".to_string(), "Olá".to_string()),
        ("Adios".to_string(), "Adeus".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(persisted, expected);

    assert_eq!(report.stats.unique_fragments, 4);
    assert_eq!(report.stats.passthrough, 2);
    assert_eq!(report.stats.translated, 2);
    assert_eq!(report.stats.cache_hits, 0);
}

#[tokio::test]
async fn test_translateDocument_withRepeatedFragment_shouldInvokeServiceOnce() {
    let client = MockClient::working().with_response("Hola", "Olá");
    let counter = client.call_counter();
    let rig = rig(Arc::new(client), 5, 4);

    let doc = document(&[&["Hola", "Hola"], &["Hola"], &["  Hola  "]]);
    let report = rig
        .orchestrator
        .translate_document(doc, no_cancel(), no_progress())
        .await
        .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    // Every position sharing the fragment gets the identical translation
    assert_eq!(
        grid_text(&report.document),
        vec![
            vec!["Olá".to_string(), "Olá".to_string()],
            vec!["Olá".to_string()],
            vec!["Olá".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_translateDocument_withWarmCache_shouldNotCallService() {
    let client = MockClient::working();
    let counter = client.call_counter();

    let cache = tabtrans::translation::TranslationCache::new();
    cache.put("Hola", "Olá");
    let rig = rig_with_cache(Arc::new(client), 5, 4, cache);

    let doc = document(&[&["Hola"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, no_cancel(), no_progress())
        .await
        .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(report.stats.cache_hits, 1);
    assert_eq!(grid_text(&report.document), vec![vec!["Olá".to_string()]]);
}

#[tokio::test]
async fn test_translateDocument_withPassthroughFragments_shouldLeaveThemUnchanged() {
    let client = MockClient::working();
    let counter = client.call_counter();
    let rig = rig(Arc::new(client), 5, 4);

    let doc = document(&[&["1.234,56", "-42", "http://example.com/página", "Image01.png"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, no_cancel(), no_progress())
        .await
        .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(
        grid_text(&report.document),
        vec![vec![
            "1.234,56".to_string(),
            "-42".to_string(),
            "http://example.com/página".to_string(),
            "Image01.png".to_string(),
        ]]
    );
    assert!(cache_file(&rig).is_empty());
}

#[tokio::test]
async fn test_translateDocument_withAccentedFragments_shouldTranslateNormally() {
    // Multi-byte characters near the front of a fragment must classify as
    // plain text, not trip the URL prefix check
    let client = MockClient::working()
        .with_response("está bien", "está bem")
        .with_response("año", "ano");
    let rig = rig(Arc::new(client), 5, 4);

    let doc = document(&[&["está bien", "año", "ñ"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, no_cancel(), no_progress())
        .await
        .unwrap();

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(
        grid_text(&report.document),
        vec![vec![
            "está bem".to_string(),
            "ano".to_string(),
            "[pt] ñ".to_string(),
        ]]
    );
    assert_eq!(report.stats.translated, 3);
    assert_eq!(report.stats.passthrough, 0);
}

#[tokio::test]
async fn test_translateDocument_withMarkupFragment_shouldStripAndRewrap() {
    // The service only ever sees plain text; the envelope comes back around
    // the translated result.
    let client = MockClient::working().with_response("Hola mundo", "Olá mundo");
    let rig = rig(Arc::new(client), 5, 1);

    let doc = document(&[&["<b>Hola <i>mundo</i></b>"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, no_cancel(), no_progress())
        .await
        .unwrap();

    assert_eq!(
        grid_text(&report.document),
        vec![vec!["<b>Olá mundo</b>".to_string()]]
    );
}

#[tokio::test]
async fn test_translateDocument_withExhaustedRetries_shouldKeepOriginalAndNotCache() {
    let client = MockClient::failing();
    let counter = client.call_counter();
    let rig = rig(Arc::new(client), 3, 1);

    let doc = document(&[&["Hola"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, no_cancel(), no_progress())
        .await
        .unwrap();

    // Degradation completes the batch rather than aborting it
    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert_eq!(grid_text(&report.document), vec![vec!["Hola".to_string()]]);
    assert_eq!(report.stats.degraded, 1);

    // A degraded fallback never becomes a cache entry
    assert!(cache_file(&rig).is_empty());
}

#[tokio::test]
async fn test_translateDocument_withQuotaError_shouldStopJobAndFlushCache() {
    let client = MockClient::quota();
    let counter = client.call_counter();
    let rig = rig(Arc::new(client), 5, 1);

    let doc = document(&[&["Hola", "Adios"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, no_cancel(), no_progress())
        .await
        .unwrap();

    assert!(matches!(report.termination, Termination::QuotaExhausted(_)));
    // No retries, no further fragments after the fatal signal
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    // The cache was still flushed on the way out
    assert!(rig.cache_path.exists());
}

/// Client that translates its first call and flips the cancel channel, then
/// stalls forever; models an interrupt arriving mid-batch.
#[derive(Debug)]
struct CancelAfterFirst {
    cancel_tx: watch::Sender<bool>,
    calls: AtomicUsize,
}

#[async_trait]
impl TranslationClient for CancelAfterFirst {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        _target_language: &str,
    ) -> Result<String, ProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            let _ = self.cancel_tx.send(true);
            Ok(format!("[pt] {}", text))
        } else {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(format!("[pt] {}", text))
        }
    }
}

#[tokio::test]
async fn test_translateDocument_interruptedMidBatch_shouldCheckpointResolvedWork() {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let client = CancelAfterFirst {
        cancel_tx,
        calls: AtomicUsize::new(0),
    };
    // Single worker so resolution order is the first-seen fragment order
    let rig = rig(Arc::new(client), 5, 1);

    let doc = document(&[&["Hola", "Adios"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, cancel_rx, no_progress())
        .await
        .unwrap();

    assert_eq!(report.termination, Termination::Interrupted);

    // The fragment resolved before the signal is translated; the rest keeps
    // its original text
    assert_eq!(
        grid_text(&report.document),
        vec![vec!["[pt] Hola".to_string(), "Adios".to_string()]]
    );

    // The checkpointed cache holds exactly the completed translation
    let persisted = cache_file(&rig);
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted.get("Hola"), Some(&"[pt] Hola".to_string()));
}

#[tokio::test]
async fn test_translateDocument_cancelledBeforeStart_shouldResolveNothing() {
    let client = MockClient::working();
    let counter = client.call_counter();
    let rig = rig(Arc::new(client), 5, 4);

    let (cancel_tx, cancel_rx) = watch::channel(true);
    drop(cancel_tx);

    let doc = document(&[&["Hola"]]);
    let report = rig
        .orchestrator
        .translate_document(doc, cancel_rx, no_progress())
        .await
        .unwrap();

    assert_eq!(report.termination, Termination::Interrupted);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(grid_text(&report.document), vec![vec!["Hola".to_string()]]);
}

#[tokio::test]
async fn test_translateDocument_withEmptyDocument_shouldCompleteWithZeroStats() {
    let client = MockClient::working();
    let rig = rig(Arc::new(client), 5, 4);

    let report = rig
        .orchestrator
        .translate_document(document(&[]), no_cancel(), no_progress())
        .await
        .unwrap();

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.stats.unique_fragments, 0);
    assert_eq!(report.stats.resolved(), 0);
}
