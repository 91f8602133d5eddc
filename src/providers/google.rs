/*!
 * Client for the public Google translate endpoint.
 *
 * Uses the unauthenticated `translate_a/single` endpoint with the `gtx`
 * client id. The response is a nested JSON array whose first element lists
 * translated segments; segments are concatenated to form the result.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::TranslationClient;

const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the free Google translate endpoint.
#[derive(Debug)]
pub struct GoogleTranslateClient {
    endpoint: String,
    client: Client,
}

impl GoogleTranslateClient {
    /// Create a client against the default public endpoint.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (used for testing and for
    /// self-hosted proxies of the same API shape).
    pub fn with_endpoint(endpoint: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    fn parse_segments(body: &str) -> Result<String, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let segments = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("missing segment list".to_string()))?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(text) = segment.get(0).and_then(Value::as_str) {
                translated.push_str(text);
            }
        }

        if translated.is_empty() {
            return Err(ProviderError::ParseError(
                "response contained no translated segments".to_string(),
            ));
        }
        Ok(translated)
    }
}

#[async_trait]
impl TranslationClient for GoogleTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        Self::parse_segments(&body)
    }
}
