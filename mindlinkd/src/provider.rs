//! Decode-provider interface for the analysis sequence.
//!
//! The production provider POSTs an analyze action to an HTTP endpoint. In
//! the demo deployment nothing listens there, so every attempt fails and
//! the caller substitutes a fallback word; transport errors, non-success
//! statuses, and malformed bodies are treated identically.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default decode endpoint. Nothing serves this in the demo setup.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9180/api/brain-waves";

/// Per-request timeout for the decode attempt.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Source of decoded words for an analysis attempt.
pub trait DecodeProvider: Send + 'static {
    fn decode(&self) -> impl Future<Output = Result<String, DecodeError>> + Send;
}

#[derive(Debug, Clone, Serialize)]
struct AnalyzeRequest {
    action: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
struct WordResponse {
    #[serde(default)]
    word: Option<String>,
}

/// HTTP decode provider: POST `{"action":"analyze"}`, expect `{"word":..}`.
#[derive(Debug, Clone)]
pub struct HttpWordProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpWordProvider {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

impl DecodeProvider for HttpWordProvider {
    fn decode(&self) -> impl Future<Output = Result<String, DecodeError>> + Send {
        async move {
            let response = self
                .client
                .post(&self.endpoint)
                .json(&AnalyzeRequest { action: "analyze" })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(DecodeError::Status(status.as_u16()));
            }

            let body = response.text().await?;
            parse_word_response(&body)
        }
    }
}

/// Extract the decoded word from a success body.
///
/// A body without a usable `word` field counts as malformed; the fallback
/// path covers it like any other provider failure.
pub fn parse_word_response(body: &str) -> Result<String, DecodeError> {
    let parsed: WordResponse =
        serde_json::from_str(body).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    match parsed.word {
        Some(word) if !word.is_empty() => Ok(word),
        _ => Err(DecodeError::Malformed("missing word field".to_string())),
    }
}
