//! AI coaching tips after a wrong answer.
//!
//! A [`HintProvider`] turns a failed attempt into a short piece of
//! encouragement, or explains a complement formula. [`HintService`] wraps
//! any provider with a timeout and always yields text: when the provider
//! errors, stalls or answers with nothing, the canned line for the locale
//! is used instead.
//!
//! The HTTP client lives behind the `gemini` feature.

#[cfg(feature = "gemini")]
pub mod client;

#[cfg(feature = "gemini")]
pub use client::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::narration::Locale;
use crate::core::question::Question;

/// Errors from a hint provider
#[derive(Debug, thiserror::Error)]
pub enum HintError {
    /// HTTP request failed
    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Provider answered without any text
    #[error("Empty response from hint provider")]
    Empty,

    /// Provider did not answer in time
    #[error("Hint request timed out after {0:?}")]
    Timeout(Duration),

    /// No API key in the environment
    #[error("Missing API key: set {0}")]
    MissingApiKey(String),
}

/// A failed attempt, as the tip prompt describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRequest {
    /// The question as shown, e.g. `12 - 7`
    pub question: String,
    /// Value the learner left on the abacus
    pub entered: u64,
    /// Correct answer
    pub target: u64,
}

impl HintRequest {
    /// Request for `entered` against `question`
    #[must_use]
    pub fn new(question: &Question, entered: u64) -> Self {
        Self {
            question: question.to_string(),
            entered,
            target: question.target(),
        }
    }

    /// Prompt asking for a short, friendly tip
    #[must_use]
    pub fn prompt(&self, locale: Locale) -> String {
        let Self {
            question,
            entered,
            target,
        } = self;
        match locale {
            Locale::ZhTw => format!(
                "我在練習珠心算。題目是 \"{question}\"。\n\
                 我撥出的答案是 {entered}，但正確答案應該是 {target}。\n\
                 請給我一個簡短的鼓勵，並解釋一個珠心算的小技巧或口訣，幫助我下次做得更好。\n\
                 請用親切的口氣，像是一個珠心算老師在教小朋友。不要超過 100 字。"
            ),
            Locale::En => format!(
                "I'm practising the abacus. The question is \"{question}\".\n\
                 My beads show {entered}, but the answer should be {target}.\n\
                 Give me a short word of encouragement and explain one abacus trick or \
                 formula that will help me next time.\n\
                 Sound like a kind abacus teacher talking to a child. Keep it under 60 words."
            ),
        }
    }
}

/// Prompt asking for a beginner-friendly explanation of a formula
#[must_use]
pub fn formula_prompt(label: &str, locale: Locale) -> String {
    match locale {
        Locale::ZhTw => format!(
            "請向一個珠心算初學者解釋口訣「{label}」的意思和撥法。\n\
             口語化且有趣，像是在說故事。"
        ),
        Locale::En => format!(
            "Explain the abacus formula \"{label}\" to a beginner: what it means and \
             which beads to move.\nKeep it conversational and fun, like telling a story."
        ),
    }
}

/// Source of coaching text
#[async_trait]
pub trait HintProvider: Send + Sync {
    /// Encouragement and a tip for a wrong answer
    async fn tip(&self, request: &HintRequest, locale: Locale) -> Result<String, HintError>;

    /// Explanation of a formula label such as `減 10 加 3`
    async fn explain_formula(&self, label: &str, locale: Locale) -> Result<String, HintError>;
}

/// Provider that always answers with the canned lines
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticHints;

#[async_trait]
impl HintProvider for StaticHints {
    async fn tip(&self, _request: &HintRequest, locale: Locale) -> Result<String, HintError> {
        Ok(locale.fallback_tip().to_string())
    }

    async fn explain_formula(&self, _label: &str, locale: Locale) -> Result<String, HintError> {
        Ok(locale.fallback_formula().to_string())
    }
}

/// Hint service configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintConfig {
    /// Longest wait for the provider
    pub timeout: Duration,
    /// Language of prompts and fallbacks
    pub locale: Locale,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            locale: Locale::default(),
        }
    }
}

impl HintConfig {
    /// Sets the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the locale
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// Provider plus timeout and fallback
#[derive(Debug, Clone)]
pub struct HintService<P> {
    provider: P,
    config: HintConfig,
}

impl<P: HintProvider> HintService<P> {
    /// Wraps `provider`
    pub fn new(provider: P, config: HintConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration
    pub fn config(&self) -> &HintConfig {
        &self.config
    }

    /// Tip from the provider, bounded by the timeout
    pub async fn tip(&self, request: &HintRequest) -> Result<String, HintError> {
        let locale = self.config.locale;
        self.bounded(self.provider.tip(request, locale)).await
    }

    /// Formula explanation from the provider, bounded by the timeout
    pub async fn explain_formula(&self, label: &str) -> Result<String, HintError> {
        let locale = self.config.locale;
        self.bounded(self.provider.explain_formula(label, locale))
            .await
    }

    /// Tip, or the canned encouragement when the provider fails
    pub async fn tip_or_fallback(&self, request: &HintRequest) -> String {
        match self.tip(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, question = %request.question, "tip unavailable, using fallback");
                self.config.locale.fallback_tip().to_string()
            }
        }
    }

    /// Formula explanation, or the canned line when the provider fails
    pub async fn explain_or_fallback(&self, label: &str) -> String {
        match self.explain_formula(label).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, formula = label, "explanation unavailable, using fallback");
                self.config.locale.fallback_formula().to_string()
            }
        }
    }

    async fn bounded<F>(&self, request: F) -> Result<String, HintError>
    where
        F: std::future::Future<Output = Result<String, HintError>>,
    {
        let text = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| HintError::Timeout(self.config.timeout))??;
        let text = text.trim();
        if text.is_empty() {
            return Err(HintError::Empty);
        }
        Ok(text.to_string())
    }
}
