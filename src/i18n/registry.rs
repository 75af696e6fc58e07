//! Language registry: single source of truth for the supported languages.
//!
//! Unlike a global singleton, the registry is an owned value constructed at
//! application start and shared explicitly (usually behind an `Arc`). The
//! supported set is fixed for the life of the session.

use crate::i18n::Language;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "es")
    pub code: String,

    /// English name of the language (e.g., "English", "Spanish")
    pub name: String,

    /// Native name of the language (e.g., "English", "Español")
    pub native_name: String,

    /// Whether this is the fallback language (exactly one should be true)
    pub is_default: bool,

    /// Whether this language is enabled for use
    pub enabled: bool,
}

impl LanguageConfig {
    fn new(code: &str, name: &str, native_name: &str, is_default: bool) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            native_name: native_name.to_string(),
            is_default,
            enabled: true,
        }
    }
}

/// The fixed set of languages the deployment supports.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

impl LanguageRegistry {
    /// Build a registry from an explicit language set.
    ///
    /// # Panics
    /// Panics unless exactly one enabled language is marked as default. The
    /// language set is startup configuration; getting it wrong is a
    /// programming error, not a runtime condition.
    pub fn new(languages: Vec<LanguageConfig>) -> Self {
        let defaults = languages
            .iter()
            .filter(|lang| lang.is_default && lang.enabled)
            .count();
        match defaults {
            0 => panic!("No default language configured in registry"),
            1 => Self { languages },
            _ => panic!("Multiple default languages configured in registry"),
        }
    }

    /// The language set the portfolio site ships with: Spanish (default) and
    /// English.
    pub fn site_default() -> Self {
        Self::new(vec![
            LanguageConfig::new("es", "Spanish", "Español", true),
            LanguageConfig::new("en", "English", "English", false),
        ])
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All enabled languages, in registry order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Check if a language code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }

    /// Validate a code into a [`Language`]. `None` if the code is unknown or
    /// disabled.
    pub fn parse(&self, code: &str) -> Option<Language> {
        if self.is_enabled(code) {
            Some(Language::from_registry(code))
        } else {
            None
        }
    }

    /// The fallback language every load failure degrades to.
    pub fn default_language(&self) -> Language {
        let config = self
            .languages
            .iter()
            .find(|lang| lang.is_default && lang.enabled)
            .expect("registry construction guarantees a default");
        Language::from_registry(&config.code)
    }
}
