//! Widget initialization passes re-run over freshly injected content.
//!
//! Third-party UI behaviors (Bootstrap tooltips) and the portfolio filter
//! need re-wiring every time the router swaps the content region. Each pass
//! carries its own guard attribute so repeated navigation to the same view
//! never initializes a widget twice.

use tracing::debug;

use crate::dom::Element;

/// Guard attribute marking tooltip triggers that were already initialized.
pub const TOOLTIP_INIT_ATTR: &str = "data-bs-initialized";

/// Category filter value matching every project item.
pub const FILTER_ALL: &str = "all";

/// Initialize Bootstrap tooltip triggers under `root` exactly once each.
pub fn init_tooltips(root: &mut Element) {
    let mut initialized = 0u32;
    root.walk_mut(&mut |el| {
        if el.attr("data-bs-toggle") == Some("tooltip") && el.attr(TOOLTIP_INIT_ATTR).is_none() {
            el.set_attr(TOOLTIP_INIT_ATTR, "true");
            initialized += 1;
        }
    });
    if initialized > 0 {
        debug!("Initialized {} tooltip(s)", initialized);
    }
}

/// Wire up the portfolio category filter under `root`.
///
/// Ensures one filter button carries the `active` class (the first one when
/// none is marked) and applies that button's filter to the project items.
/// No-op when the view carries no filter UI.
pub fn init_portfolio_filters(root: &mut Element) {
    let buttons = root.find_all(&|el| el.has_class("filter-btn"));
    if buttons.is_empty() {
        return;
    }
    let has_items = !root.find_all(&|el| el.has_class("project-item")).is_empty();
    if !has_items {
        return;
    }

    let active_filter = buttons
        .iter()
        .find(|el| el.has_class("active"))
        .or_else(|| buttons.first())
        .and_then(|el| el.attr("data-filter"))
        .unwrap_or(FILTER_ALL)
        .to_string();

    apply_filter(root, &active_filter);
}

/// Select the filter button for `filter` and show only matching items.
pub fn apply_filter(root: &mut Element, filter: &str) {
    let filter = filter.to_string();
    root.walk_mut(&mut |el| {
        if el.has_class("filter-btn") {
            if el.attr("data-filter") == Some(filter.as_str()) {
                el.add_class("active");
            } else {
                el.remove_class("active");
            }
        }
        if el.has_class("project-item") {
            let visible = filter == FILTER_ALL || el.attr("data-category") == Some(filter.as_str());
            el.set_attr("style", if visible { "display: block" } else { "display: none" });
        }
    });
}
