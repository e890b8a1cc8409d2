//! HTTP adapter for the generative-language text service.
//!
//! POSTs `{"contents":[{"parts":[{"text": prompt}]}]}` to
//! `{base}/models/{model}:generateContent` and reads the text parts of the
//! first candidate. An `error` object in the envelope is handed back
//! verbatim as the text.

use crate::domain::error::StockgridError;
use crate::ports::ai_port::AiPort;
use crate::ports::config_port::ConfigPort;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const AI_KEY_ENV: &str = "STOCKGRID_AI_KEY";
pub const NO_ANALYSIS_TEXT: &str = "No analysis returned.";

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Deserialize, Default)]
struct Envelope {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

pub fn request_body(prompt: &str) -> Value {
    let body = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
    };
    serde_json::to_value(body).unwrap_or(Value::Null)
}

/// Pull the text out of a response envelope.
pub fn extract_text(body: &str) -> Result<String, StockgridError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| StockgridError::Analysis {
        reason: format!("invalid response: {e}"),
    })?;
    if let Some(error) = envelope.error {
        return Ok(error.to_string());
    }
    let text: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        Ok(NO_ANALYSIS_TEXT.to_string())
    } else {
        Ok(text)
    }
}

pub struct HttpAiAdapter {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpAiAdapter {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, StockgridError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StockgridError::ConfigInvalid {
                section: "ai".into(),
                key: "base_url".into(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            model: model.trim().to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    /// `None` when `[ai] enabled` is false.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Option<Self>, StockgridError> {
        if !config.get_bool("ai", "enabled", false) {
            return Ok(None);
        }
        let required = |key: &str| {
            config
                .get_string("ai", key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| StockgridError::ConfigMissing {
                    section: "ai".into(),
                    key: key.into(),
                })
        };
        let base_url = required("base_url")?;
        let model = required("model")?;
        let api_key = match std::env::var(AI_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => required("api_key")?,
        };
        let timeout = config.get_int("ai", "timeout_secs", 60).max(1) as u64;
        Self::new(&base_url, &model, &api_key, Duration::from_secs(timeout)).map(Some)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl AiPort for HttpAiAdapter {
    fn summarize(&self, prompt: &str) -> Result<String, StockgridError> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "requesting analysis");
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(prompt))
            .send()
            .map_err(|e| StockgridError::Analysis {
                reason: e.to_string(),
            })?;
        // Error envelopes come back with non-2xx statuses; read the body regardless.
        let body = response.text().map_err(|e| StockgridError::Analysis {
            reason: e.to_string(),
        })?;
        extract_text(&body)
    }
}
