//! CLI configuration
//!
//! Defaults, then an optional YAML file, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use suanpan::core::{Abacus, Difficulty, Locale};

use crate::error::{CliError, CliResult};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Verbosity for a `-v` count, quiet taking precedence
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// AI tip settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintSettings {
    /// Ask for a tip after every wrong answer
    pub enabled: bool,
    /// Gemini model name
    pub model: String,
    /// API endpoint
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Longest wait for a tip, in milliseconds
    pub timeout_ms: u64,
}

impl Default for HintSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl HintSettings {
    /// Tip timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Narration language
    pub locale: Locale,
    /// Number of rods
    pub width: usize,
    /// Default difficulty band for new questions
    pub difficulty: Difficulty,
    /// AI tip settings
    pub hint: HintSettings,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
            locale: Locale::default(),
            width: Abacus::DEFAULT_WIDTH,
            difficulty: Difficulty::default(),
            hint: HintSettings::default(),
        }
    }
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file; missing keys keep their defaults
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(text: &str) -> CliResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> CliResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Rejects settings no abacus can use
    pub fn validate(self) -> CliResult<Self> {
        if !(1..=Abacus::MAX_WIDTH).contains(&self.width) {
            return Err(CliError::config(format!(
                "width {} outside 1..={}",
                self.width,
                Abacus::MAX_WIDTH
            )));
        }
        if self.hint.timeout_ms == 0 {
            return Err(CliError::config("hint.timeout_ms must be positive"));
        }
        Ok(self)
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set narration locale
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set abacus width
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Set default difficulty
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Turn AI tips on or off
    #[must_use]
    pub const fn with_hints(mut self, enabled: bool) -> Self {
        self.hint.enabled = enabled;
        self
    }

    /// Whether styled output should be produced
    #[must_use]
    pub fn use_color(&self) -> bool {
        self.color.should_color()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_default_verbosity() {
            assert_eq!(Verbosity::default(), Verbosity::Normal);
        }

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 4), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
        }

        #[test]
        fn test_is_verbose() {
            assert!(!Verbosity::Quiet.is_verbose());
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Verbose.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
            assert!(Verbosity::Quiet.is_quiet());
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::new();
            assert_eq!(config.width, 9);
            assert_eq!(config.locale, Locale::ZhTw);
            assert_eq!(config.difficulty, Difficulty::Units);
            assert!(!config.hint.enabled);
            assert_eq!(config.hint.api_key_env, "GEMINI_API_KEY");
            assert_eq!(config.hint.timeout(), Duration::from_secs(10));
        }

        #[test]
        fn test_builders() {
            let config = CliConfig::new()
                .with_verbosity(Verbosity::Debug)
                .with_color(ColorChoice::Never)
                .with_locale(Locale::En)
                .with_width(13)
                .with_difficulty(Difficulty::Mixed)
                .with_hints(true);
            assert_eq!(config.verbosity, Verbosity::Debug);
            assert!(!config.use_color());
            assert_eq!(config.locale, Locale::En);
            assert_eq!(config.width, 13);
            assert_eq!(config.difficulty, Difficulty::Mixed);
            assert!(config.hint.enabled);
        }

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let config = CliConfig::from_yaml("locale: en\nwidth: 5\nhint:\n  enabled: true\n").unwrap();
            assert_eq!(config.locale, Locale::En);
            assert_eq!(config.width, 5);
            assert!(config.hint.enabled);
            assert_eq!(config.hint.model, "gemini-3-flash-preview");
            assert_eq!(config.difficulty, Difficulty::Units);
        }

        #[test]
        fn test_empty_yaml() {
            assert_eq!(CliConfig::from_yaml("  \n").unwrap(), CliConfig::default());
        }

        #[test]
        fn test_yaml_round_trip() {
            let config = CliConfig::new().with_difficulty(Difficulty::Hundreds);
            let yaml = config.to_yaml().unwrap();
            assert!(yaml.contains("difficulty: hundreds"));
            assert_eq!(CliConfig::from_yaml(&yaml).unwrap(), config);
        }

        #[test]
        fn test_invalid_width_rejected() {
            let err = CliConfig::from_yaml("width: 0").unwrap_err();
            assert!(err.to_string().contains("width 0"));
        }

        #[test]
        fn test_unknown_locale_rejected() {
            assert!(matches!(
                CliConfig::from_yaml("locale: fr"),
                Err(CliError::Yaml(_))
            ));
        }

        #[test]
        fn test_load_missing_file() {
            let err = CliConfig::load(Path::new("/nonexistent/suanpan.yaml")).unwrap_err();
            assert!(matches!(err, CliError::Config { .. }));
        }

        #[test]
        fn test_load_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suanpan.yaml");
            std::fs::write(&path, "difficulty: mixed\ncolor: never\n").unwrap();
            let config = CliConfig::load(&path).unwrap();
            assert_eq!(config.difficulty, Difficulty::Mixed);
            assert_eq!(config.color, ColorChoice::Never);
        }
    }
}
