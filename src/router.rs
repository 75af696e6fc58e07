//! Hash-based content router.
//!
//! Maps hash route tokens to view fragments, swaps them into the page's
//! content region, and re-runs the per-view passes (widget initialization,
//! translation, form binding) over the fresh markup. Navigation requests
//! follow the same last-initiated-wins discipline as language switches: a
//! fetch that completes after a newer navigation started applies nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use crate::error::SiteError;
use crate::fetch::ResourceFetcher;
use crate::form;
use crate::page::{FragmentDecoder, Page};
use crate::switcher::LanguageSwitcher;
use crate::translate;
use crate::widgets;

/// Route token of the home view (the empty hash).
pub const HOME_TOKEN: &str = "";

/// One routable view.
#[derive(Debug, Clone)]
pub struct Route {
    /// Fragment path, relative to the site base URL.
    pub template: String,
    /// Translation key for the document-title suffix.
    pub title_key: String,
    /// Whether the view carries the contact form.
    pub has_form: bool,
}

impl Route {
    pub fn new(template: &str, title_key: &str) -> Self {
        Self {
            template: template.to_string(),
            title_key: title_key.to_string(),
            has_form: false,
        }
    }

    pub fn with_form(mut self) -> Self {
        self.has_form = true;
        self
    }
}

/// The route table.
#[derive(Debug, Clone, Default)]
pub struct Routes {
    map: HashMap<String, Route>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: &str, route: Route) {
        self.map.insert(token.to_string(), route);
    }

    /// The shipped route table.
    pub fn site_default() -> Self {
        let mut routes = Self::new();
        routes.insert(HOME_TOKEN, Route::new("views/home.html", "navigation.home"));
        routes.insert(
            "servicios",
            Route::new("views/services.html", "navigation.services"),
        );
        routes.insert(
            "portafolio",
            Route::new("views/portfolio.html", "navigation.portfolio"),
        );
        routes.insert(
            "contacto",
            Route::new("views/contact.html", "navigation.contact").with_form(),
        );
        routes
    }

    pub fn tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.map.keys().cloned().collect();
        tokens.sort();
        tokens
    }

    pub fn get(&self, token: &str) -> Option<&Route> {
        self.map.get(token)
    }

    /// Resolve a token to its route, substituting home for unknown tokens.
    /// The substitution happens once; a missing home route is a
    /// misconfiguration, not a loop.
    fn resolve(&self, token: &str) -> Result<(String, &Route), SiteError> {
        if let Some(route) = self.map.get(token) {
            return Ok((token.to_string(), route));
        }
        warn!("Unknown route '{}', falling back to home", token);
        self.map
            .get(HOME_TOKEN)
            .map(|route| (HOME_TOKEN.to_string(), route))
            .ok_or(SiteError::HomeRouteMissing)
    }
}

/// How a navigation request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// Fragment fetched and rendered.
    Rendered,
    /// Fragment unreachable; the inline error block is showing.
    ErrorShown,
    /// A newer navigation was initiated while this one was in flight.
    Superseded,
}

pub struct ContentRouter {
    routes: Routes,
    fetcher: Arc<dyn ResourceFetcher>,
    decoder: Arc<dyn FragmentDecoder>,
    page: Arc<Mutex<Page>>,
    switcher: Arc<LanguageSwitcher>,
    site_title: String,
    generation: AtomicU64,
}

impl ContentRouter {
    pub fn new(
        routes: Routes,
        fetcher: Arc<dyn ResourceFetcher>,
        decoder: Arc<dyn FragmentDecoder>,
        page: Arc<Mutex<Page>>,
        switcher: Arc<LanguageSwitcher>,
        site_title: &str,
    ) -> Self {
        Self {
            routes,
            fetcher,
            decoder,
            page,
            switcher,
            site_title: site_title.to_string(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Hash fragment for a route token ("#servicios"; home is the bare hash).
    pub fn hash_for(token: &str) -> String {
        format!("#{}", token)
    }

    /// Click interception for internal nav links: default navigation is
    /// suppressed and only the hash mutates, so [`Self::on_hash_change`]
    /// stays the single rendering path. Returns the hash to assign.
    pub fn link_hash(route_attr: &str) -> String {
        if route_attr == "home" {
            "#".to_string()
        } else {
            format!("#{}", route_attr)
        }
    }

    /// `hashchange` entry point: strips the leading `#` and navigates.
    pub async fn on_hash_change(&self, hash: &str) -> Result<NavigateOutcome, SiteError> {
        self.navigate(hash.trim_start_matches('#')).await
    }

    /// Navigate to the view for `token`.
    ///
    /// Shows the loading placeholder while the fragment is in flight. On
    /// success the fragment replaces the content region and the per-view
    /// passes run over it; on fetch failure the inline error block is shown
    /// instead (the chrome stays usable) and `ErrorShown` is returned rather
    /// than an error.
    pub async fn navigate(&self, token: &str) -> Result<NavigateOutcome, SiteError> {
        let (token, route) = self.routes.resolve(token)?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Navigating to '{}' ({})", token, route.template);

        if let Ok(mut page) = self.page.lock() {
            page.show_loading();
        }

        match self.fetcher.fetch_text(&route.template).await {
            Ok(markup) => {
                if self.is_superseded(generation) {
                    debug!("Navigation to '{}' superseded, dropping fragment", token);
                    return Ok(NavigateOutcome::Superseded);
                }
                self.render(&token, route, &markup);
                info!("Rendered view '{}'", route.template);
                Ok(NavigateOutcome::Rendered)
            }
            Err(e) => {
                if self.is_superseded(generation) {
                    debug!("Failed navigation to '{}' superseded", token);
                    return Ok(NavigateOutcome::Superseded);
                }
                error!("Could not load view '{}': {}", route.template, e);
                if let Ok(mut page) = self.page.lock() {
                    page.show_error(&e.to_string());
                }
                Ok(NavigateOutcome::ErrorShown)
            }
        }
    }

    fn render(&self, token: &str, route: &Route, markup: &str) {
        let children = self.decoder.decode(markup);
        let state = self.switcher.state_snapshot();

        let Ok(mut page) = self.page.lock() else {
            return;
        };
        page.replace_content(children);

        let content = page.content_mut();
        widgets::init_tooltips(content);
        widgets::init_portfolio_filters(content);
        translate::apply(&state.table, content);
        if route.has_form && form::bind_contact_form(content) {
            debug!("Contact form bound on '{}'", route.template);
        }

        page.set_title(&format!(
            "{} | {}",
            self.site_title,
            state.table.get(&route.title_key)
        ));
        page.set_active_nav(token);
        page.set_selector_value(state.current.code());
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, LANG_ATTR};
    use crate::i18n::{LanguageRegistry, TranslationStore};
    use crate::storage::{MemoryPreferenceStore, PreferenceStore};
    use crate::test_support::StaticFetcher;
    use std::time::Duration;

    const ES_TABLE: &str = r#"{
        "navigation": {"home": "Inicio", "services": "Servicios", "contact": "Contacto"},
        "services": {"heading": "Lo que hago"}
    }"#;

    /// Decoder used in place of a browser's innerHTML parser: views are keyed
    /// by their markup string.
    struct StubDecoder;

    impl FragmentDecoder for StubDecoder {
        fn decode(&self, markup: &str) -> Vec<Element> {
            match markup {
                "SERVICES" => vec![Element::new("section")
                    .with_child(
                        Element::new("h2")
                            .with_attr(LANG_ATTR, "services.heading")
                            .with_text("placeholder"),
                    )
                    .with_child(Element::new("span").with_attr("data-bs-toggle", "tooltip"))],
                "CONTACT" => vec![Element::new("section")
                    .with_child(Element::new("form").with_attr("id", "contact-form"))],
                other => vec![Element::new("div").with_text(other)],
            }
        }
    }

    struct Fixture {
        router: ContentRouter,
        fetcher: Arc<StaticFetcher>,
        page: Arc<Mutex<Page>>,
    }

    async fn fixture_with(fetcher: StaticFetcher, routes: Routes) -> Fixture {
        let registry = Arc::new(LanguageRegistry::site_default());
        let fetcher = Arc::new(fetcher);
        let store = Arc::new(TranslationStore::new(
            Arc::clone(&fetcher) as Arc<dyn ResourceFetcher>
        ));
        let page = Arc::new(Mutex::new(Page::site_default()));
        let switcher = Arc::new(LanguageSwitcher::new(
            Arc::clone(&registry),
            store,
            Arc::new(MemoryPreferenceStore::new()) as Arc<dyn PreferenceStore>,
            Arc::clone(&page),
        ));
        switcher.initialize(&registry.parse("es").unwrap()).await;
        let router = ContentRouter::new(
            routes,
            Arc::clone(&fetcher) as Arc<dyn ResourceFetcher>,
            Arc::new(StubDecoder),
            Arc::clone(&page),
            switcher,
            "QA Expert",
        );
        Fixture {
            router,
            fetcher,
            page,
        }
    }

    async fn fixture(fetcher: StaticFetcher) -> Fixture {
        fixture_with(fetcher, Routes::site_default()).await
    }

    fn base_fetcher() -> StaticFetcher {
        StaticFetcher::new()
            .with("lang/es.json", ES_TABLE)
            .with("views/home.html", "HOME")
            .with("views/services.html", "SERVICES")
            .with("views/contact.html", "CONTACT")
    }

    #[tokio::test]
    async fn renders_view_with_title_nav_and_translation() {
        let fx = fixture(base_fetcher()).await;

        let outcome = fx.router.navigate("servicios").await.expect("navigate");
        assert_eq!(outcome, NavigateOutcome::Rendered);

        let page = fx.page.lock().unwrap();
        assert!(!page.is_loading());
        assert_eq!(page.title(), "QA Expert | Servicios");
        assert_eq!(page.selector_value(), Some("es"));

        // Injected content went through the translation pass
        let heading = page
            .content()
            .find_all(&|el| el.attr(LANG_ATTR) == Some("services.heading"))[0];
        assert_eq!(heading.text(), "Lo que hago");

        // And the tooltip pass
        let tooltip = page
            .content()
            .find_all(&|el| el.attr("data-bs-toggle") == Some("tooltip"))[0];
        assert_eq!(tooltip.attr(widgets::TOOLTIP_INIT_ATTR), Some("true"));

        let active: Vec<&Element> = page.chrome().find_all(&|el| el.has_class("active"));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].attr("data-route"), Some("servicios"));
    }

    #[tokio::test]
    async fn unknown_token_falls_back_to_home_once() {
        let fx = fixture(base_fetcher()).await;

        let outcome = fx.router.navigate("no-such-view").await.expect("navigate");
        assert_eq!(outcome, NavigateOutcome::Rendered);

        assert_eq!(fx.fetcher.calls("views/home.html"), 1);
        let page = fx.page.lock().unwrap();
        assert_eq!(page.content_text(), "HOME");
        let active: Vec<&Element> = page.chrome().find_all(&|el| el.has_class("active"));
        assert_eq!(active[0].attr("data-route"), Some("home"));
    }

    #[tokio::test]
    async fn missing_home_route_is_an_error() {
        let mut routes = Routes::new();
        routes.insert("servicios", Route::new("views/services.html", "navigation.services"));
        let fx = fixture_with(base_fetcher(), routes).await;

        let err = fx.router.navigate("no-such-view").await.unwrap_err();
        assert!(matches!(err, SiteError::HomeRouteMissing));
    }

    #[tokio::test]
    async fn fetch_failure_shows_inline_error_and_keeps_chrome() {
        // services.html missing: the fetcher answers 404
        let fx = fixture(
            StaticFetcher::new()
                .with("lang/es.json", ES_TABLE)
                .with("views/home.html", "HOME"),
        )
        .await;

        let outcome = fx.router.navigate("servicios").await.expect("navigate");
        assert_eq!(outcome, NavigateOutcome::ErrorShown);

        let page = fx.page.lock().unwrap();
        let text = page.content_text();
        assert!(text.contains("views/services.html"));
        assert!(text.contains("404"));
        // Navigation chrome survives a failed view load
        assert_eq!(
            page.nav_tokens(),
            vec!["", "servicios", "portafolio", "contacto"]
        );
    }

    #[tokio::test]
    async fn slow_navigation_is_superseded_by_a_later_one() {
        let fx = fixture(
            base_fetcher().with_delay("views/services.html", Duration::from_millis(100)),
        )
        .await;

        let slow = fx.router.navigate("servicios");
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            fx.router.navigate("").await
        };
        let (slow_result, fast_result) = tokio::join!(slow, fast);

        assert_eq!(slow_result.expect("slow"), NavigateOutcome::Superseded);
        assert_eq!(fast_result.expect("fast"), NavigateOutcome::Rendered);

        // The stale fragment never reached the page
        let page = fx.page.lock().unwrap();
        assert_eq!(page.content_text(), "HOME");
        assert_eq!(page.title(), "QA Expert | Inicio");
    }

    #[tokio::test]
    async fn contact_view_binds_its_form() {
        let fx = fixture(base_fetcher()).await;

        fx.router.navigate("contacto").await.expect("navigate");

        let page = fx.page.lock().unwrap();
        let forms = page.content().find_all(&|el| el.tag() == "form");
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].attr(form::FORM_BOUND_ATTR), Some("true"));
    }

    #[tokio::test]
    async fn hash_change_strips_the_marker() {
        let fx = fixture(base_fetcher()).await;

        let outcome = fx.router.on_hash_change("#servicios").await.expect("navigate");
        assert_eq!(outcome, NavigateOutcome::Rendered);
        assert_eq!(fx.fetcher.calls("views/services.html"), 1);

        // Bare hash is home
        fx.router.on_hash_change("#").await.expect("navigate");
        assert_eq!(fx.fetcher.calls("views/home.html"), 1);
    }

    #[test]
    fn hash_for_round_trips_tokens() {
        assert_eq!(ContentRouter::hash_for(""), "#");
        assert_eq!(ContentRouter::hash_for("portafolio"), "#portafolio");
    }

    #[test]
    fn link_hash_maps_the_home_marker_to_the_bare_hash() {
        assert_eq!(ContentRouter::link_hash("home"), "#");
        assert_eq!(ContentRouter::link_hash("servicios"), "#servicios");
    }

    #[test]
    fn default_routes_cover_the_site() {
        let routes = Routes::site_default();
        assert_eq!(routes.tokens(), vec!["", "contacto", "portafolio", "servicios"]);
        assert!(routes.get("contacto").unwrap().has_form);
        assert!(!routes.get("").unwrap().has_form);
    }
}
