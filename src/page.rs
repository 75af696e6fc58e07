//! The live page model.
//!
//! `Page` is the runtime's view of the document: the static chrome (navbar,
//! language selector), the content region the router swaps fragments into,
//! the document title and the `lang` attribute. A browser binding mirrors
//! mutations of this model into the real DOM; tests assert on it directly.

use crate::dom::Element;

/// id of the content region element.
pub const CONTENT_REGION_ID: &str = "spa-content";

/// id of the language selector element.
pub const SELECTOR_ID: &str = "languageSelector";

/// Attribute marking internal navigation links with their route token.
pub const ROUTE_ATTR: &str = "data-route";

/// Turns fetched fragment markup into elements for the content region.
///
/// A browser binding parses the markup (innerHTML); the headless default
/// injects it verbatim as a single opaque node.
pub trait FragmentDecoder: Send + Sync {
    fn decode(&self, markup: &str) -> Vec<Element>;
}

/// Default decoder: the fragment body is opaque markup, injected verbatim.
pub struct OpaqueMarkup;

impl FragmentDecoder for OpaqueMarkup {
    fn decode(&self, markup: &str) -> Vec<Element> {
        vec![Element::new("div").with_text(markup)]
    }
}

/// Document state the runtime reads and mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    chrome: Element,
    content: Element,
    title: String,
    lang: String,
}

impl Page {
    pub fn new(chrome: Element) -> Self {
        Self {
            chrome,
            content: Element::new("main").with_attr("id", CONTENT_REGION_ID),
            title: String::new(),
            lang: String::new(),
        }
    }

    /// Chrome matching the shipped markup: nav links for the four routes plus
    /// the language selector.
    pub fn site_default() -> Self {
        let nav = Element::new("nav")
            .with_child(nav_link("home", "navigation.home", "Inicio"))
            .with_child(nav_link("servicios", "navigation.services", "Servicios"))
            .with_child(nav_link("portafolio", "navigation.portfolio", "Portafolio"))
            .with_child(nav_link("contacto", "navigation.contact", "Contacto"))
            .with_child(Element::new("select").with_attr("id", SELECTOR_ID));
        Self::new(Element::new("header").with_child(nav))
    }

    // ==================== Document-level state ====================

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// `documentElement.lang`.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn set_lang(&mut self, lang: &str) {
        self.lang = lang.to_string();
    }

    // ==================== Chrome ====================

    pub fn chrome(&self) -> &Element {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut Element {
        &mut self.chrome
    }

    /// Current value of the language selector, if the chrome has one.
    pub fn selector_value(&self) -> Option<&str> {
        self.chrome
            .find_all(&|el| el.attr("id") == Some(SELECTOR_ID))
            .first()
            .and_then(|el| el.attr("value"))
    }

    /// Synchronize the language selector with the active language. No-op if
    /// the chrome carries no selector.
    pub fn set_selector_value(&mut self, code: &str) {
        if let Some(selector) = self
            .chrome
            .find_mut(&|el| el.attr("id") == Some(SELECTOR_ID))
        {
            selector.set_attr("value", code);
        }
    }

    /// Toggle the `active` class so exactly the link for `token` carries it.
    pub fn set_active_nav(&mut self, token: &str) {
        let token = token.to_string();
        self.chrome.walk_mut(&mut |el| {
            if let Some(route) = el.attr(ROUTE_ATTR).map(str::to_string) {
                if nav_token(&route) == token {
                    el.add_class("active");
                } else {
                    el.remove_class("active");
                }
            }
        });
    }

    /// Route tokens of all internal navigation links, in document order.
    pub fn nav_tokens(&self) -> Vec<String> {
        self.chrome
            .find_all(&|el| el.attr(ROUTE_ATTR).is_some())
            .iter()
            .filter_map(|el| el.attr(ROUTE_ATTR))
            .map(nav_token)
            .collect()
    }

    // ==================== Content region ====================

    pub fn content(&self) -> &Element {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Element {
        &mut self.content
    }

    /// Replace the content region's markup.
    pub fn replace_content(&mut self, children: Vec<Element>) {
        self.content.set_children(children);
    }

    /// Render the transient loading placeholder.
    pub fn show_loading(&mut self) {
        let spinner = Element::new("div")
            .with_attr("class", "spinner-border text-primary")
            .with_attr("role", "status");
        self.replace_content(vec![Element::new("div")
            .with_attr("class", "spa-loading")
            .with_child(spinner)]);
    }

    /// Whether the loading placeholder is currently rendered.
    pub fn is_loading(&self) -> bool {
        self.content
            .children()
            .first()
            .map(|el| el.has_class("spa-loading"))
            .unwrap_or(false)
    }

    /// Render the inline fragment-load error block. `reason` carries the
    /// failing URL and status so the user (and the tests) can see what broke.
    pub fn show_error(&mut self, reason: &str) {
        let block = Element::new("div")
            .with_attr("class", "container py-5")
            .with_child(Element::new("h2").with_text("Error"))
            .with_child(Element::new("p").with_text("No se pudo cargar el contenido."))
            .with_child(Element::new("p").with_text(reason));
        self.replace_content(vec![block]);
    }

    /// Both translation roots: chrome and content.
    pub fn roots_mut(&mut self) -> [&mut Element; 2] {
        [&mut self.chrome, &mut self.content]
    }

    /// Concatenated text of the content region (test/diagnostic helper).
    pub fn content_text(&self) -> String {
        let mut out = String::new();
        self.content.walk(&mut |el| {
            if !el.text().is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(el.text());
            }
        });
        out
    }
}

/// Hash token a nav link navigates to ("home" maps to the empty home token).
fn nav_token(route: &str) -> String {
    if route == "home" {
        String::new()
    } else {
        route.to_string()
    }
}

fn nav_link(route: &str, lang_key: &str, text: &str) -> Element {
    Element::new("a")
        .with_attr(ROUTE_ATTR, route)
        .with_attr(crate::dom::LANG_ATTR, lang_key)
        .with_attr("class", "nav-link")
        .with_text(text)
}
