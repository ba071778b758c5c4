//! The AI text-completion collaborator behind `/ai`.
//!
//! The provider contract is infallible: configuration and transport
//! problems come back as human-readable fallback strings, never as errors,
//! so a provider failure surfaces as response text in the chat.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fallback when no API key is configured.
pub const FALLBACK_UNCONFIGURED: &str = "Error: API Key not configured for /ai command.";
/// Fallback when the provider call fails.
pub const FALLBACK_UNAVAILABLE: &str = "AI is currently unavailable. Try again later.";
/// Fallback when the provider returns an empty completion.
pub const FALLBACK_EMPTY: &str = "No response from AI.";

const SYSTEM_INSTRUCTION: &str = "You are a helpful chat assistant inside a legacy-style \
    chat application called parley. Keep responses short, concise, and text-only (no markdown).";

/// Opaque request/response text completion.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Complete a prompt. Must never fail; see the module docs.
    async fn complete(&self, prompt: &str) -> String;
}

/// Provider used when no API key is available.
pub struct UnconfiguredAi;

#[async_trait]
impl AiProvider for UnconfiguredAi {
    async fn complete(&self, _prompt: &str) -> String {
        FALLBACK_UNCONFIGURED.to_string()
    }
}

/// Live HTTP provider against a Gemini-style generateContent endpoint.
pub struct HttpAiProvider {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl HttpAiProvider {
    /// Create a provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }

    /// Create from the `PARLEY_AI_API_KEY` environment variable, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var("PARLEY_AI_API_KEY").ok().map(Self::new)
    }

    /// Set a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn request(&self, prompt: &str) -> Result<GenerateResponse, reqwest::Error> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
        };

        self.http_client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await
    }
}

#[async_trait]
impl AiProvider for HttpAiProvider {
    async fn complete(&self, prompt: &str) -> String {
        match self.request(prompt).await {
            Ok(response) => {
                let text = response.first_text();
                if text.is_empty() {
                    debug!("provider returned an empty completion");
                    FALLBACK_EMPTY.to_string()
                } else {
                    text
                }
            }
            Err(e) => {
                warn!(error = %e, "AI provider call failed");
                FALLBACK_UNAVAILABLE.to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateResponse {
    fn first_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default()
    }
}
