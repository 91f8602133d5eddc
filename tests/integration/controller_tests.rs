/*!
 * File-to-file runs through the application controller with a mock service.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tabtrans::app_config::Config;
use tabtrans::app_controller::Controller;
use tabtrans::errors::JobError;
use tabtrans::providers::mock::MockClient;

fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.cache_path = dir
        .join("cache.json")
        .to_string_lossy()
        .to_string();
    config.translation.retry_delay_secs = 0;
    config
}

fn write_input(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_run_withCsvInput_shouldWriteTranslatedSibling() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "entrada.csv",
        "\u{feff}Hola;1,234\nAdios;http://x.com\n".as_bytes(),
    );

    let client = MockClient::working()
        .with_response("Hola", "Olá")
        .with_response("Adios", "Adeus");
    let controller = Controller::with_client(test_config(dir.path()), Arc::new(client)).unwrap();

    controller.run(&input).await.unwrap();

    let output = dir.path().join("entrada_pt.csv");
    assert!(output.exists());
    // Input is untouched
    let original = std::fs::read_to_string(&input).unwrap();
    assert!(original.contains("Hola"));

    let translated = std::fs::read_to_string(&output).unwrap();
    assert!(translated.contains("Olá"));
    assert!(translated.contains("Adeus"));
    assert!(translated.contains("1,234"));
    assert!(translated.contains("http://x.com"));
    assert!(!translated.contains("Hola"));

    // The cache file was persisted alongside
    let cache_raw = std::fs::read_to_string(dir.path().join("cache.json")).unwrap();
    assert!(cache_raw.contains("Olá"));
}

#[tokio::test]
async fn test_run_withQuotaError_shouldReturnFatalQuota() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "entrada.csv", b"Hola\n");

    let controller =
        Controller::with_client(test_config(dir.path()), Arc::new(MockClient::quota())).unwrap();
    let err = controller.run(&input).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<JobError>(),
        Some(JobError::FatalQuota(_))
    ));
    // The cache was flushed before terminating
    assert!(dir.path().join("cache.json").exists());
    // No translated output is produced for a quota-terminated run
    assert!(!dir.path().join("entrada_pt.csv").exists());
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFailClearly() {
    let dir = tempfile::tempdir().unwrap();
    let controller =
        Controller::with_client(test_config(dir.path()), Arc::new(MockClient::working())).unwrap();

    let result = controller.run(&dir.path().join("ausente.csv")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_withUnsupportedExtension_shouldFailClearly() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "entrada.pdf", b"whatever");

    let controller =
        Controller::with_client(test_config(dir.path()), Arc::new(MockClient::working())).unwrap();
    assert!(controller.run(&input).await.is_err());
}

#[tokio::test]
async fn test_run_withCorruptCacheFile_shouldFailAtStartup() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "entrada.csv", b"Hola\n");
    std::fs::write(dir.path().join("cache.json"), "{ corrupt").unwrap();

    let client = MockClient::working();
    let counter = client.call_counter();
    let controller = Controller::with_client(test_config(dir.path()), Arc::new(client)).unwrap();

    assert!(controller.run(&input).await.is_err());
    // Failed before any translation work began
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_run_secondTime_shouldServeFromPersistedCache() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "entrada.csv", b"Hola\n");

    let first = MockClient::working().with_response("Hola", "Olá");
    let controller = Controller::with_client(test_config(dir.path()), Arc::new(first)).unwrap();
    controller.run(&input).await.unwrap();

    // A second run with a fresh client finds everything in the cache file
    let second = MockClient::working();
    let counter = second.call_counter();
    let controller = Controller::with_client(test_config(dir.path()), Arc::new(second)).unwrap();
    controller.run(&input).await.unwrap();

    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    let translated = std::fs::read_to_string(dir.path().join("entrada_pt.csv")).unwrap();
    assert!(translated.contains("Olá"));
}
