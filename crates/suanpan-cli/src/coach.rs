//! Blocking front for the async hint service
//!
//! Commands stay synchronous; a current-thread runtime is built only when a
//! tip is actually wanted.

use suanpan::core::Locale;
#[cfg(feature = "gemini")]
use suanpan::hint::GeminiClient;
use suanpan::hint::{HintConfig, HintRequest, HintService, StaticHints};
use tokio::runtime::Runtime;

use crate::config::HintSettings;
use crate::error::CliResult;

#[derive(Debug)]
enum Provider {
    #[cfg(feature = "gemini")]
    Gemini(HintService<GeminiClient>),
    Offline(HintService<StaticHints>),
}

/// Tips and formula explanations, never failing
#[derive(Debug)]
pub struct Coach {
    runtime: Runtime,
    provider: Provider,
}

impl Coach {
    /// Coach for `settings`; without an API key it gives the canned lines
    pub fn new(settings: &HintSettings, locale: Locale) -> CliResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let config = HintConfig::default()
            .with_timeout(settings.timeout())
            .with_locale(locale);
        Ok(Self {
            runtime,
            provider: Self::provider(settings, config),
        })
    }

    /// Coach that never leaves the machine
    pub fn offline(locale: Locale) -> CliResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let config = HintConfig::default().with_locale(locale);
        Ok(Self {
            runtime,
            provider: Provider::Offline(HintService::new(StaticHints, config)),
        })
    }

    #[cfg(feature = "gemini")]
    fn provider(settings: &HintSettings, config: HintConfig) -> Provider {
        match GeminiClient::from_env(&settings.api_key_env, settings.model.as_str()) {
            Ok(client) => Provider::Gemini(HintService::new(
                client.with_base_url(settings.base_url.as_str()),
                config,
            )),
            Err(err) => {
                tracing::warn!(error = %err, "AI tips unavailable, using canned tips");
                Provider::Offline(HintService::new(StaticHints, config))
            }
        }
    }

    #[cfg(not(feature = "gemini"))]
    fn provider(_settings: &HintSettings, config: HintConfig) -> Provider {
        tracing::warn!("built without the gemini feature, using canned tips");
        Provider::Offline(HintService::new(StaticHints, config))
    }

    /// True when tips come from the AI service
    #[must_use]
    pub fn is_online(&self) -> bool {
        !matches!(self.provider, Provider::Offline(_))
    }

    /// Tip for a wrong answer
    pub fn tip(&self, request: &HintRequest) -> String {
        match &self.provider {
            #[cfg(feature = "gemini")]
            Provider::Gemini(service) => self.runtime.block_on(service.tip_or_fallback(request)),
            Provider::Offline(service) => self.runtime.block_on(service.tip_or_fallback(request)),
        }
    }

    /// Explanation of a formula label
    pub fn explain(&self, label: &str) -> String {
        match &self.provider {
            #[cfg(feature = "gemini")]
            Provider::Gemini(service) => self.runtime.block_on(service.explain_or_fallback(label)),
            Provider::Offline(service) => self.runtime.block_on(service.explain_or_fallback(label)),
        }
    }
}
