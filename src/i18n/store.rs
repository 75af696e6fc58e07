//! Translation store: fetches per-language tables and caches them.
//!
//! Tables are fetched by convention path (`lang/{code}.json`), parsed, and
//! cached for the whole session; cache entries are never invalidated. The
//! recovery policy lives in [`TranslationStore::load_with_fallback`]: a
//! failing non-default load retries the default exactly once, and if the
//! default also fails the session proceeds with the empty table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::LoadError;
use crate::fetch::ResourceFetcher;
use crate::i18n::{Language, LanguageRegistry, TranslationTable};

/// Convention path of the translation document for a language.
pub fn translation_path(language: &Language) -> String {
    format!("lang/{}.json", language.code())
}

/// Lazily populated `Language → TranslationTable` cache.
pub struct TranslationStore {
    fetcher: Arc<dyn ResourceFetcher>,
    cache: Mutex<HashMap<Language, Arc<TranslationTable>>>,
}

impl TranslationStore {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Cached table for `language`, if one was loaded earlier this session.
    pub fn cached(&self, language: &Language) -> Option<Arc<TranslationTable>> {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(language).cloned())
    }

    /// Load the table for `language`, fetching on first use.
    pub async fn load(&self, language: &Language) -> Result<Arc<TranslationTable>, LoadError> {
        if let Some(table) = self.cached(language) {
            debug!("Translation cache hit for '{}'", language);
            return Ok(table);
        }

        let path = translation_path(language);
        let payload = self.fetcher.fetch_text(&path).await?;
        let table = Arc::new(TranslationTable::parse(&payload, &path)?);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(language.clone(), Arc::clone(&table));
        }
        debug!("Loaded translations for '{}'", language);
        Ok(table)
    }

    /// Load with the recovery policy applied. Never fails: returns the
    /// language whose table is actually in effect alongside the table, which
    /// may be the empty table when even the default is unreachable.
    pub async fn load_with_fallback(
        &self,
        language: &Language,
        registry: &LanguageRegistry,
    ) -> (Language, Arc<TranslationTable>) {
        match self.load(language).await {
            Ok(table) => (language.clone(), table),
            Err(e) => {
                let default = registry.default_language();
                if *language == default {
                    warn!(
                        "Default language '{}' failed to load, proceeding untranslated: {}",
                        default, e
                    );
                    return (default, Arc::new(TranslationTable::empty()));
                }
                warn!(
                    "Loading '{}' failed ({}), falling back to default '{}'",
                    language, e, default
                );
                match self.load(&default).await {
                    Ok(table) => (default, table),
                    Err(e2) => {
                        warn!(
                            "Default language '{}' also failed, proceeding untranslated: {}",
                            default, e2
                        );
                        (default, Arc::new(TranslationTable::empty()))
                    }
                }
            }
        }
    }
}
