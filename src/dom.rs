//! Lightweight element tree standing in for the live DOM.
//!
//! The runtime never talks to a real browser; it operates on this tree and a
//! host binding mirrors the mutations into the actual document. The shape is
//! deliberately minimal: tag, attributes, text content, children.

use std::collections::BTreeMap;

/// Attribute carrying a translation key for text/placeholder/alt content.
pub const LANG_ATTR: &str = "data-lang";

/// Attribute carrying a translation key for the tooltip (`title`) attribute.
pub const LANG_TITLE_ATTR: &str = "data-lang-title";

/// An element node. Tags are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Replace all children.
    pub fn set_children(&mut self, children: Vec<Element>) {
        self.children = children;
    }

    // ==================== Class helpers ====================

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|part| part == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes = self.attr("class").unwrap_or("").to_string();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self.set_attr("class", &classes);
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(current) = self.attr("class") {
            let kept: Vec<&str> = current
                .split_whitespace()
                .filter(|part| *part != class)
                .collect();
            let joined = kept.join(" ");
            self.set_attr("class", &joined);
        }
    }

    // ==================== Traversal ====================

    /// Pre-order walk over this element and all descendants.
    pub fn walk(&self, f: &mut impl FnMut(&Element)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Pre-order mutable walk over this element and all descendants.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// First descendant (or self) matching the predicate.
    pub fn find_mut(&mut self, pred: &impl Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Some(found) = child.find_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants (and self) matching the predicate, read-only.
    pub fn find_all(&self, pred: &impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_into(pred, &mut out);
        out
    }

    fn collect_into<'a>(&'a self, pred: &impl Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for child in &self.children {
            child.collect_into(pred, out);
        }
    }
}

/// Where a resolved translation lands on an element.
///
/// Chosen by [`classify`] from a closed tag set instead of ad hoc tag-name
/// checks scattered through the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationSlot {
    /// Overwrite the element's text content.
    Text,
    /// Write to the `placeholder` attribute (form inputs).
    Placeholder,
    /// Write to the `alt` attribute (images).
    AltText,
}

/// Classify an element tag into its translation slot.
pub fn classify(tag: &str) -> TranslationSlot {
    if tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea") {
        TranslationSlot::Placeholder
    } else if tag.eq_ignore_ascii_case("img") {
        TranslationSlot::AltText
    } else {
        TranslationSlot::Text
    }
}
