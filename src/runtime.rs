//! Top-level wiring of the site runtime.
//!
//! `SiteRuntime` owns the component graph (registry, translation store,
//! language switcher, content router, contact form flow, notifier) and maps
//! form-flow outcomes onto user-facing notifications. The seams
//! (`ResourceFetcher`, `FragmentDecoder`, `PreferenceStore`,
//! `VerificationWidget`, `Notifier`) stay injectable so a browser binding and
//! the tests plug in their own implementations.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::SiteError;
use crate::fetch::ResourceFetcher;
use crate::form::{ContactForm, ContactFormHandler, VerificationWidget, WIDGET_CONTAINER_ID};
use crate::i18n::{resolve, BrowserEnv, Language, LanguageRegistry, TranslationStore};
use crate::notify::{Notification, NotificationKind, Notifier, PopupNotifier};
use crate::page::{FragmentDecoder, Page};
use crate::router::{ContentRouter, NavigateOutcome, Routes};
use crate::storage::PreferenceStore;
use crate::switcher::{LanguageSwitcher, SwitchOutcome};

// Translation keys for the form-flow notifications. Lookups degrade to the
// key itself when a table lacks them.
const KEY_SUCCESS_TITLE: &str = "notifications.success.title";
const KEY_SUCCESS_MESSAGE: &str = "notifications.success.message";
const KEY_ERROR_TITLE: &str = "notifications.error.title";
const KEY_VALIDATION_MESSAGE: &str = "notifications.validation.message";
const KEY_WIDGET_MESSAGE: &str = "notifications.widget.message";
const KEY_ACTION_CLOSE: &str = "notifications.action.close";
const KEY_ACTION_RETRY: &str = "notifications.action.retry";
const KEY_ACTION_RELOAD: &str = "notifications.action.reload";

pub struct SiteRuntime {
    registry: Arc<LanguageRegistry>,
    prefs: Arc<dyn PreferenceStore>,
    store: Arc<TranslationStore>,
    page: Arc<Mutex<Page>>,
    switcher: Arc<LanguageSwitcher>,
    router: ContentRouter,
    form: ContactFormHandler,
    notifier: Arc<dyn Notifier>,
}

impl SiteRuntime {
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn ResourceFetcher>,
        decoder: Arc<dyn FragmentDecoder>,
        prefs: Arc<dyn PreferenceStore>,
        widget: Arc<dyn VerificationWidget>,
    ) -> Self {
        let registry = Arc::new(LanguageRegistry::site_default());
        let store = Arc::new(TranslationStore::new(Arc::clone(&fetcher)));
        let page = Arc::new(Mutex::new(Page::site_default()));
        let switcher = Arc::new(LanguageSwitcher::new(
            Arc::clone(&registry),
            Arc::clone(&store),
            Arc::clone(&prefs),
            Arc::clone(&page),
        ));
        let router = ContentRouter::new(
            Routes::site_default(),
            Arc::clone(&fetcher),
            decoder,
            Arc::clone(&page),
            Arc::clone(&switcher),
            &config.site_title,
        );
        let form = ContactFormHandler::new(reqwest::Client::new(), &config.form_endpoint, widget);
        let notifier: Arc<dyn Notifier> = Arc::new(PopupNotifier::new(Arc::clone(&page)));
        Self {
            registry,
            prefs,
            store,
            page,
            switcher,
            router,
            form,
            notifier,
        }
    }

    /// Swap the notification surface (tests record instead of rendering).
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn page(&self) -> Arc<Mutex<Page>> {
        Arc::clone(&self.page)
    }

    pub fn switcher(&self) -> &LanguageSwitcher {
        &self.switcher
    }

    pub fn router(&self) -> &ContentRouter {
        &self.router
    }

    /// Boot the session: resolve the starting language, load and apply its
    /// translations, and render the view for the starting hash. Returns the
    /// language actually in effect.
    pub async fn start(&self, env: &BrowserEnv, initial_hash: &str) -> Result<Language, SiteError> {
        let resolved = resolve(&self.registry, self.prefs.as_ref(), env);
        let effective = self.switcher.initialize(&resolved).await;
        self.router.on_hash_change(initial_hash).await?;
        info!("Site runtime started in '{}'", effective);
        Ok(effective)
    }

    /// Selector-change entry point.
    pub async fn switch_language(&self, code: &str) -> Result<SwitchOutcome, SiteError> {
        self.switcher.switch(code).await
    }

    /// `hashchange` entry point.
    pub async fn navigate(&self, hash: &str) -> Result<NavigateOutcome, SiteError> {
        self.router.on_hash_change(hash).await
    }

    /// Fetch every enabled language's table into the cache so later switches
    /// are instant. Failures only cost the prefetch; the language stays
    /// switchable (the switch itself will retry the fetch).
    pub async fn preload_languages(&self) -> usize {
        let languages: Vec<Language> = self
            .registry
            .list_enabled()
            .iter()
            .filter_map(|config| self.registry.parse(&config.code))
            .collect();

        let loads = languages.iter().map(|language| async move {
            match self.store.load(language).await {
                Ok(_) => true,
                Err(e) => {
                    warn!("Could not prefetch translations for '{}': {}", language, e);
                    false
                }
            }
        });

        futures::future::join_all(loads)
            .await
            .into_iter()
            .filter(|loaded| *loaded)
            .count()
    }

    /// Wait for the verification widget and render it into its container on
    /// the contact view. A widget that never loads ends in an error
    /// notification with a reload action.
    pub async fn prepare_contact_widget(&self) -> Result<(), SiteError> {
        if let Err(e) = self.form.wait_ready().await {
            self.notifier.show(self.widget_unavailable_notification());
            return Err(e);
        }
        if let Ok(mut page) = self.page.lock() {
            if let Some(container) = page
                .content_mut()
                .find_mut(&|el| el.attr("id") == Some(WIDGET_CONTAINER_ID))
            {
                self.form.render_into(container);
            }
        }
        Ok(())
    }

    /// Submit the contact form and surface the outcome as a notification.
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<(), SiteError> {
        match self.form.submit(form).await {
            Ok(()) => {
                self.notifier.show(Notification::new(
                    NotificationKind::Success,
                    &self.t(KEY_SUCCESS_TITLE),
                    &self.t(KEY_SUCCESS_MESSAGE),
                    &self.t(KEY_ACTION_CLOSE),
                ));
                Ok(())
            }
            Err(e) => {
                self.notifier.show(self.failure_notification(&e));
                Err(e)
            }
        }
    }

    /// Expiry callback from the widget.
    pub fn on_widget_expired(&self) {
        self.form.on_expired();
    }

    fn failure_notification(&self, error: &SiteError) -> Notification {
        match error {
            SiteError::Validation => Notification::new(
                NotificationKind::Error,
                &self.t(KEY_ERROR_TITLE),
                &self.t(KEY_VALIDATION_MESSAGE),
                &self.t(KEY_ACTION_RETRY),
            ),
            SiteError::WidgetUnavailable { .. } => self.widget_unavailable_notification(),
            SiteError::Submission { message, .. } => Notification::new(
                NotificationKind::Error,
                &self.t(KEY_ERROR_TITLE),
                message,
                &self.t(KEY_ACTION_RETRY),
            ),
            other => Notification::new(
                NotificationKind::Error,
                &self.t(KEY_ERROR_TITLE),
                &other.to_string(),
                &self.t(KEY_ACTION_RETRY),
            ),
        }
    }

    fn widget_unavailable_notification(&self) -> Notification {
        Notification::new(
            NotificationKind::Error,
            &self.t(KEY_ERROR_TITLE),
            &self.t(KEY_WIDGET_MESSAGE),
            &self.t(KEY_ACTION_RELOAD),
        )
    }

    fn t(&self, key: &str) -> String {
        self.switcher.table().get(key).to_string()
    }
}
