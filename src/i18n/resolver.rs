//! Initial language resolution.
//!
//! Pure over its inputs: persisted preference, then a language-prefixed URL
//! path segment, then the browser locale matched by prefix, then the registry
//! default. First match wins. A persisted value that is no longer supported
//! is silently ignored and the remaining checks run.

use tracing::debug;

use crate::i18n::{Language, LanguageRegistry};
use crate::storage::PreferenceStore;

/// Snapshot of the browser environment the resolver inspects.
#[derive(Debug, Clone, Default)]
pub struct BrowserEnv {
    /// `location.pathname`, e.g. "/" or "/en/portafolio".
    pub path: String,

    /// `navigator.language`, e.g. "en-US".
    pub locale: Option<String>,
}

impl BrowserEnv {
    pub fn new(path: &str, locale: Option<&str>) -> Self {
        Self {
            path: path.to_string(),
            locale: locale.map(str::to_string),
        }
    }
}

/// Resolve the language to start the session in.
pub fn resolve(
    registry: &LanguageRegistry,
    prefs: &dyn PreferenceStore,
    env: &BrowserEnv,
) -> Language {
    // 1. Persisted preference
    if let Some(saved) = prefs.load() {
        match registry.parse(&saved) {
            Some(language) => return language,
            None => debug!("Ignoring unsupported persisted preference '{}'", saved),
        }
    }

    // 2. Language-prefixed path segment ("/en/...")
    if let Some(segment) = env.path.trim_start_matches('/').split('/').next() {
        if let Some(language) = registry.parse(segment) {
            return language;
        }
    }

    // 3. Browser locale, prefix-matched against supported codes
    if let Some(locale) = &env.locale {
        for config in registry.list_enabled() {
            if locale.starts_with(&config.code) {
                if let Some(language) = registry.parse(&config.code) {
                    return language;
                }
            }
        }
    }

    // 4. Fixed default
    registry.default_language()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPreferenceStore;

    fn registry() -> LanguageRegistry {
        LanguageRegistry::site_default()
    }

    #[test]
    fn persisted_preference_wins() {
        let prefs = MemoryPreferenceStore::with_value("en");
        let env = BrowserEnv::new("/", Some("es-MX"));
        assert_eq!(resolve(&registry(), &prefs, &env).code(), "en");
    }

    #[test]
    fn unsupported_persisted_value_falls_through() {
        let prefs = MemoryPreferenceStore::with_value("klingon");
        let env = BrowserEnv::new("/", Some("en-US"));
        assert_eq!(resolve(&registry(), &prefs, &env).code(), "en");
    }

    #[test]
    fn path_prefix_beats_browser_locale() {
        let prefs = MemoryPreferenceStore::new();
        let env = BrowserEnv::new("/en/portafolio", Some("es-ES"));
        assert_eq!(resolve(&registry(), &prefs, &env).code(), "en");
    }

    #[test]
    fn browser_locale_is_prefix_matched() {
        // No preference, locale "en-US", path "/" → "en"
        let prefs = MemoryPreferenceStore::new();
        let env = BrowserEnv::new("/", Some("en-US"));
        assert_eq!(resolve(&registry(), &prefs, &env).code(), "en");
    }

    #[test]
    fn unmatched_environment_uses_default() {
        let prefs = MemoryPreferenceStore::new();
        let env = BrowserEnv::new("/", Some("fr-FR"));
        assert_eq!(resolve(&registry(), &prefs, &env).code(), "es");
    }

    #[test]
    fn empty_environment_uses_default() {
        let prefs = MemoryPreferenceStore::new();
        let env = BrowserEnv::default();
        assert_eq!(resolve(&registry(), &prefs, &env).code(), "es");
    }

    #[test]
    fn unrelated_path_segment_is_ignored() {
        let prefs = MemoryPreferenceStore::new();
        let env = BrowserEnv::new("/english-lessons/", None);
        assert_eq!(resolve(&registry(), &prefs, &env).code(), "es");
    }
}
