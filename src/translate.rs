//! Page translator: rewrites marked elements from the active table.
//!
//! Two passes, mirroring the marker attributes the markup carries:
//!
//! 1. Elements with `data-lang` get the resolved string written into the slot
//!    chosen by [`classify`]: placeholder for form inputs, alt for images,
//!    text content otherwise. A lookup miss (resolution equals the key)
//!    leaves the element's existing value alone, so authored placeholder
//!    content survives.
//! 2. Elements with `data-lang-title` that already carry a `title` attribute
//!    get the resolved string written into `title`.
//!
//! Both passes are idempotent: re-running with the same table is a no-op.

use crate::dom::{classify, Element, TranslationSlot, LANG_ATTR, LANG_TITLE_ATTR};
use crate::i18n::TranslationTable;

/// Translate `root` and every descendant in place.
pub fn apply(table: &TranslationTable, root: &mut Element) {
    root.walk_mut(&mut |el| {
        if let Some(key) = el.attr(LANG_ATTR).map(str::to_string) {
            let resolved = table.get(&key).to_string();
            if !resolved.is_empty() && resolved != key {
                match classify(el.tag()) {
                    TranslationSlot::Text => el.set_text(&resolved),
                    TranslationSlot::Placeholder => el.set_attr("placeholder", &resolved),
                    TranslationSlot::AltText => el.set_attr("alt", &resolved),
                }
            }
        }

        if el.attr("title").is_some() {
            if let Some(key) = el.attr(LANG_TITLE_ATTR).map(str::to_string) {
                let resolved = table.get(&key).to_string();
                if !resolved.is_empty() {
                    el.set_attr("title", &resolved);
                }
            }
        }
    });
}
