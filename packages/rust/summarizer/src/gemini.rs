//! Google Gemini `generateContent` summarizer.
//!
//! The API key is read from the environment variable named in
//! [`SummarizerConfig::api_key_env`] on every call, so a server can start
//! without a key and only enrichment attempts fail.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use biosearch_shared::{BiosearchError, Result, Summary, SummarizerConfig, resolve_api_key};

use crate::Summarizer;
use crate::payload::parse_summary;
use crate::prompt::build_prompt;

/// Max characters of an error body echoed into error messages.
const ERROR_BODY_PREVIEW: usize = 500;

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first part of the first candidate.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Summarizer backed by the Gemini generative language API.
pub struct GeminiClient {
    client: Client,
    config: SummarizerConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Create a client from config; the key is resolved lazily from the environment.
    pub fn new(config: SummarizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                BiosearchError::Summarizer(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            api_key: None,
        })
    }

    /// Use an explicit API key instead of the environment.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn api_key(&self) -> Result<String> {
        match &self.api_key {
            Some(key) => Ok(key.clone()),
            None => resolve_api_key(&self.config),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one prompt and return the model's raw text output.
    async fn generate(&self, api_key: &str, prompt: String) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BiosearchError::Summarizer(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BiosearchError::Summarizer(format!("body read failed: {e}")))?;

        if !status.is_success() {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(BiosearchError::Summarizer(format!("HTTP {status}: {preview}")));
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|_| BiosearchError::invalid_response(&body))?;
        parsed
            .first_text()
            .ok_or_else(|| BiosearchError::invalid_response(&body))
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    #[instrument(skip_all, fields(model = %self.config.model, chars = text.len()))]
    async fn summarize(&self, text: &str) -> Result<Summary> {
        // Fail before any network traffic when unconfigured.
        let api_key = self.api_key()?;

        let prompt = build_prompt(text, self.config.max_input_chars);
        debug!(prompt_chars = prompt.len(), "sending summarization request");

        let output = self.generate(&api_key, prompt).await?;
        let summary = parse_summary(&output)?;

        info!(
            tags = summary.tags.as_ref().map_or(0, Vec::len),
            authors = summary.authors.as_ref().map_or(0, Vec::len),
            "summary received"
        );
        Ok(summary)
    }
}
