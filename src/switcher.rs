//! Language switch controller.
//!
//! Orchestrates resolver output, the translation store, the page translator
//! and the selector UI. Holds the single source of truth for the active
//! language (`LanguageState`) and an owned subscription interface for
//! language-change notifications, so listeners are discoverable and
//! lifecycle-bound instead of hanging off a global event target.
//!
//! Overlapping switch requests follow a last-initiated-wins discipline: each
//! request takes a generation number and a completion whose generation is no
//! longer current applies nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::SiteError;
use crate::i18n::{Language, LanguageRegistry, TranslationStore, TranslationTable};
use crate::page::Page;
use crate::storage::PreferenceStore;
use crate::translate;

/// Broadcast payload for a completed language change.
#[derive(Debug, Clone)]
pub struct LanguageChange {
    pub old: Language,
    pub new: Language,
}

/// The active language and its table. Single source of truth, shared with
/// the router for translating freshly injected content.
#[derive(Debug, Clone)]
pub struct LanguageState {
    pub current: Language,
    pub table: Arc<TranslationTable>,
}

/// Controller phases. `Idle` between requests; a switch that fails passes
/// through `ErrorRecovering` while it rolls back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    Idle,
    Switching,
    ErrorRecovering,
}

/// How a switch request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Table loaded, page re-translated, event broadcast.
    Switched,
    /// Request for the active (or an unsupported) language; nothing happened.
    NoOp,
    /// A newer request was initiated while this one was in flight.
    Superseded,
}

pub struct LanguageSwitcher {
    registry: Arc<LanguageRegistry>,
    store: Arc<TranslationStore>,
    prefs: Arc<dyn PreferenceStore>,
    state: Arc<Mutex<LanguageState>>,
    page: Arc<Mutex<Page>>,
    events: broadcast::Sender<LanguageChange>,
    generation: AtomicU64,
    phase: Mutex<SwitchPhase>,
}

impl LanguageSwitcher {
    pub fn new(
        registry: Arc<LanguageRegistry>,
        store: Arc<TranslationStore>,
        prefs: Arc<dyn PreferenceStore>,
        page: Arc<Mutex<Page>>,
    ) -> Self {
        let initial = LanguageState {
            current: registry.default_language(),
            table: Arc::new(TranslationTable::empty()),
        };
        let (events, _) = broadcast::channel(16);
        Self {
            registry,
            store,
            prefs,
            state: Arc::new(Mutex::new(initial)),
            page,
            events,
            generation: AtomicU64::new(0),
            phase: Mutex::new(SwitchPhase::Idle),
        }
    }

    /// Subscribe to language-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<LanguageChange> {
        self.events.subscribe()
    }

    /// The active language.
    pub fn current(&self) -> Language {
        self.state_snapshot().current
    }

    /// The active translation table.
    pub fn table(&self) -> Arc<TranslationTable> {
        self.state_snapshot().table
    }

    /// Snapshot of the shared state (for the router).
    pub fn state_snapshot(&self) -> LanguageState {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Current controller phase (observability; always `Idle` between calls).
    pub fn phase(&self) -> SwitchPhase {
        self.phase
            .lock()
            .map(|guard| *guard)
            .unwrap_or(SwitchPhase::Idle)
    }

    /// Seed the session: load the resolved language (with fallback), persist
    /// it, and translate the initial page. Returns the language actually in
    /// effect, which may differ from `requested` when its table is
    /// unreachable.
    pub async fn initialize(&self, requested: &Language) -> Language {
        let (effective, table) = self
            .store
            .load_with_fallback(requested, &self.registry)
            .await;

        if let Ok(mut state) = self.state.lock() {
            state.current = effective.clone();
            state.table = Arc::clone(&table);
        }
        if let Err(e) = self.prefs.save(effective.code()) {
            warn!("Could not persist language preference: {}", e);
        }
        self.sync_page(&effective, &table);
        info!("Session language initialized to '{}'", effective);
        effective
    }

    /// Switch to the language identified by `code`.
    ///
    /// A request for the active language is a guaranteed no-op: no fetch, no
    /// event, untouched page. On load failure the controller rolls back
    /// (state and persisted preference keep their pre-switch values, the
    /// selector is resynchronized) and the error is returned.
    pub async fn switch(&self, code: &str) -> Result<SwitchOutcome, SiteError> {
        let Some(new_language) = self.registry.parse(code) else {
            warn!("Ignoring switch request for unsupported language '{}'", code);
            return Ok(SwitchOutcome::NoOp);
        };

        let old_language = self.current();
        if new_language == old_language {
            debug!("Already in '{}', nothing to do", code);
            return Ok(SwitchOutcome::NoOp);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_phase(SwitchPhase::Switching);
        info!("Switching language: {} -> {}", old_language, new_language);

        match self.store.load(&new_language).await {
            Ok(table) => {
                if self.is_superseded(generation) {
                    debug!("Switch to '{}' superseded, dropping result", new_language);
                    return Ok(SwitchOutcome::Superseded);
                }

                if let Ok(mut state) = self.state.lock() {
                    state.current = new_language.clone();
                    state.table = Arc::clone(&table);
                }
                if let Err(e) = self.prefs.save(new_language.code()) {
                    warn!("Could not persist language preference: {}", e);
                }
                self.sync_page(&new_language, &table);

                let _ = self.events.send(LanguageChange {
                    old: old_language,
                    new: new_language,
                });
                self.set_phase(SwitchPhase::Idle);
                Ok(SwitchOutcome::Switched)
            }
            Err(e) => {
                if self.is_superseded(generation) {
                    debug!("Failed switch to '{}' superseded", new_language);
                    return Ok(SwitchOutcome::Superseded);
                }

                warn!(
                    "Switch to '{}' failed ({}), rolling back to '{}'",
                    new_language, e, old_language
                );
                self.set_phase(SwitchPhase::ErrorRecovering);

                // The state was never replaced; re-establish the old table
                // (cache hit in practice) and resynchronize the selector.
                let table = match self.store.load(&old_language).await {
                    Ok(table) => table,
                    Err(_) => self.state_snapshot().table,
                };
                // The rollback load awaited too; a switch initiated in the
                // meantime owns the page now.
                if self.is_superseded(generation) {
                    debug!("Rollback for '{}' superseded", new_language);
                    return Ok(SwitchOutcome::Superseded);
                }
                self.sync_page(&old_language, &table);

                self.set_phase(SwitchPhase::Idle);
                Err(SiteError::Load(e))
            }
        }
    }

    fn sync_page(&self, language: &Language, table: &TranslationTable) {
        if let Ok(mut page) = self.page.lock() {
            page.set_lang(language.code());
            for root in page.roots_mut() {
                translate::apply(table, root);
            }
            page.set_selector_value(language.code());
        }
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn set_phase(&self, phase: SwitchPhase) {
        if let Ok(mut guard) = self.phase.lock() {
            *guard = phase;
        }
    }
}
