//! Generation client: the single Gemini `generateContent` call.
//!
//! The request pins `responseMimeType` to `application/json` and declares a
//! `responseSchema` for the slide array, so a well-behaved backend returns
//! clean JSON rather than prose-wrapped JSON. The response is still treated
//! as untrusted text — parsing and shape checks live in
//! [`crate::pipeline::validate`], not here.
//!
//! There is deliberately no retry and no streaming: the pipeline is one shot,
//! and any transport, auth, or envelope problem is fatal for the run.
//!
//! The base URL is injected via [`DeckConfig`] so tests can stand up a local
//! stub server instead of reaching the real endpoint.

use crate::config::DeckConfig;
use crate::error::DeckGenError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Client for the generative-language REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from the run configuration.
    ///
    /// The credential comes from `config.api_key`, falling back to the
    /// `GEMINI_API_KEY` environment variable.
    pub fn new(config: &DeckConfig) -> Result<Self, DeckGenError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(DeckGenError::MissingApiKey)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| DeckGenError::ApiFailure {
                detail: format!("could not build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    /// Send the composed prompt and return the model's raw response text.
    pub async fn generate_slides(&self, prompt: &str) -> Result<String, DeckGenError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("POST {url} ({} prompt chars)", prompt.len());

        let body = json!({
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": slide_array_schema(),
            }
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeckGenError::ApiFailure {
                detail: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| DeckGenError::ApiFailure {
            detail: format!("could not read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(DeckGenError::ApiFailure {
                detail: format!("HTTP {status}: {}", truncate_for_log(&text)),
            });
        }

        let envelope: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| DeckGenError::ApiFailure {
                detail: format!("unreadable response envelope: {e}"),
            })?;

        envelope
            .first_candidate_text()
            .ok_or_else(|| DeckGenError::ApiFailure {
                detail: "response contained no candidate text".to_string(),
            })
    }
}

/// JSON schema for the slide array, mirrored into `generationConfig`.
fn slide_array_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {
                    "type": "STRING",
                    "description": "Main title of the slide"
                },
                "body": {
                    "type": "STRING",
                    "description": "Slide content, including bullet lists"
                },
                "image_refs": {
                    "type": "ARRAY",
                    "description": "Catalog ids of extracted PDF figures; only when a relevant figure exists",
                    "items": { "type": "STRING" }
                }
            },
            "required": ["title", "body"]
        }
    })
}

fn truncate_for_log(text: &str) -> String {
    const MAX: usize = 400;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{head}…")
    }
}

// ── Response envelope ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts, trimmed.
    fn first_candidate_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let joined: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
