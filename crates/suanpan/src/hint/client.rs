//! Gemini `generateContent` client for coaching tips.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::{formula_prompt, HintError, HintProvider, HintRequest};
use crate::core::narration::Locale;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Public Generative Language API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable read by [`GeminiClient::from_env`] by default
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateRequest {
    fn prompt(text: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(text) }],
            }],
        }
    }
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Gemini API
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Client for `model` at the public endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = match reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "http client setup failed, requests have no timeout");
                reqwest::Client::new()
            }
        };
        Self::with_client(DEFAULT_BASE_URL, model, api_key, client)
    }

    /// Client with a custom endpoint and reqwest client
    pub fn with_client(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Client whose key comes from the environment variable `key_env`
    pub fn from_env(key_env: &str, model: impl Into<String>) -> Result<Self, HintError> {
        match std::env::var(key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim(), model)),
            _ => Err(HintError::MissingApiKey(key_env.to_string())),
        }
    }

    /// Points the client at another endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Sends one prompt and returns the generated text
    pub async fn generate(&self, prompt: String) -> Result<String, HintError> {
        let request = GenerateRequest::prompt(prompt);
        tracing::debug!(model = %self.model, "gemini request");

        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HintError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateResponse = resp.json().await.map_err(reqwest::Error::without_url)?;
        response.text().ok_or(HintError::Empty)
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HintProvider for GeminiClient {
    async fn tip(&self, request: &HintRequest, locale: Locale) -> Result<String, HintError> {
        self.generate(request.prompt(locale)).await
    }

    async fn explain_formula(&self, label: &str, locale: Locale) -> Result<String, HintError> {
        self.generate(formula_prompt(label, locale)).await
    }
}
