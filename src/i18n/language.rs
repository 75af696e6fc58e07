//! Language type: a code validated against the registry.
//!
//! Values are only produced by [`LanguageRegistry::parse`] and
//! [`LanguageRegistry::default_language`], so holding a `Language` means the
//! code was supported and enabled at construction time.

use std::fmt;

/// A validated language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    code: String,
}

impl Language {
    /// Internal constructor; only the registry calls this after validation.
    pub(crate) fn from_registry(code: &str) -> Self {
        Self {
            code: code.to_string(),
        }
    }

    /// The ISO 639-1 language code (e.g., "en", "es").
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use crate::i18n::LanguageRegistry;

    #[test]
    fn parse_produces_matching_code() {
        let registry = LanguageRegistry::site_default();
        let language = registry.parse("en").expect("en is supported");
        assert_eq!(language.code(), "en");
        assert_eq!(language.to_string(), "en");
    }

    #[test]
    fn equality_is_by_code() {
        let registry = LanguageRegistry::site_default();
        let a = registry.parse("en").unwrap();
        let b = registry.parse("en").unwrap();
        let c = registry.parse("es").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn clone_preserves_code() {
        let registry = LanguageRegistry::site_default();
        let language = registry.default_language();
        assert_eq!(language.clone(), language);
    }
}
