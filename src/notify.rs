//! Popup notification surface.
//!
//! A dismissible overlay popup carrying a kind, title, message, and a single
//! action button. The form flow reports success and failure through this
//! surface; nothing in the runtime fails silently.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::dom::Element;
use crate::page::Page;

/// id of the notification overlay element.
pub const OVERLAY_ID: &str = "notificationOverlay";

/// Closed set of notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// Popup modifier class.
    pub fn class_name(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }

    /// Bootstrap icon class for the popup header.
    pub fn icon_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "bi bi-check-circle-fill",
            NotificationKind::Error => "bi bi-exclamation-circle-fill",
            NotificationKind::Info => "bi bi-info-circle-fill",
        }
    }
}

/// One notification to display.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_label: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: &str, message: &str, action_label: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            action_label: action_label.to_string(),
        }
    }
}

/// Displays and dismisses notifications.
pub trait Notifier: Send + Sync {
    fn show(&self, notification: Notification);
    fn hide(&self);
}

/// Notifier that renders the popup into the page chrome.
pub struct PopupNotifier {
    page: Arc<Mutex<Page>>,
}

impl PopupNotifier {
    pub fn new(page: Arc<Mutex<Page>>) -> Self {
        Self { page }
    }
}

impl Notifier for PopupNotifier {
    fn show(&self, notification: Notification) {
        info!(
            "Notification ({}): {} - {}",
            notification.kind.class_name(),
            notification.title,
            notification.message
        );
        let overlay = build_overlay(&notification);
        if let Ok(mut page) = self.page.lock() {
            let chrome = page.chrome_mut();
            // One popup at a time: a new notification replaces the old one
            chrome
                .children_mut()
                .retain(|el| el.attr("id") != Some(OVERLAY_ID));
            chrome.push_child(overlay);
        }
    }

    fn hide(&self) {
        if let Ok(mut page) = self.page.lock() {
            if let Some(overlay) = page
                .chrome_mut()
                .find_mut(&|el| el.attr("id") == Some(OVERLAY_ID))
            {
                overlay.remove_class("active");
            }
        }
    }
}

fn build_overlay(notification: &Notification) -> Element {
    let popup = Element::new("div")
        .with_attr("id", "notificationPopup")
        .with_attr(
            "class",
            &format!("notification-popup {}", notification.kind.class_name()),
        )
        .with_child(
            Element::new("button")
                .with_attr("id", "closeNotification")
                .with_attr("class", "close-btn")
                .with_text("×"),
        )
        .with_child(
            Element::new("div")
                .with_attr("class", "icon")
                .with_child(Element::new("i").with_attr("class", notification.kind.icon_class())),
        )
        .with_child(
            Element::new("h3")
                .with_attr("id", "notificationTitle")
                .with_text(&notification.title),
        )
        .with_child(
            Element::new("p")
                .with_attr("id", "notificationMessage")
                .with_text(&notification.message),
        )
        .with_child(
            Element::new("button")
                .with_attr("id", "notificationAction")
                .with_attr("class", "btn btn-primary mt-3")
                .with_text(&notification.action_label),
        );

    Element::new("div")
        .with_attr("id", OVERLAY_ID)
        .with_attr("class", "notification-overlay active")
        .with_child(popup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown_overlay(page: &Page) -> Option<&Element> {
        page.chrome()
            .find_all(&|el| el.attr("id") == Some(OVERLAY_ID))
            .first()
            .copied()
    }

    #[test]
    fn show_renders_popup_with_kind_and_texts() {
        let page = Arc::new(Mutex::new(Page::site_default()));
        let notifier = PopupNotifier::new(Arc::clone(&page));

        notifier.show(Notification::new(
            NotificationKind::Error,
            "Verificación requerida",
            "Por favor completa el reCAPTCHA",
            "Reintentar",
        ));

        let guard = page.lock().unwrap();
        let overlay = shown_overlay(&guard).expect("overlay rendered");
        assert!(overlay.has_class("active"));

        let popup = &overlay.children()[0];
        assert!(popup.has_class("error"));
        let title = popup
            .find_all(&|el| el.attr("id") == Some("notificationTitle"))[0];
        assert_eq!(title.text(), "Verificación requerida");
        let action = popup
            .find_all(&|el| el.attr("id") == Some("notificationAction"))[0];
        assert_eq!(action.text(), "Reintentar");
    }

    #[test]
    fn second_show_replaces_first_popup() {
        let page = Arc::new(Mutex::new(Page::site_default()));
        let notifier = PopupNotifier::new(Arc::clone(&page));

        notifier.show(Notification::new(NotificationKind::Info, "a", "b", "c"));
        notifier.show(Notification::new(NotificationKind::Success, "d", "e", "f"));

        let guard = page.lock().unwrap();
        let overlays = guard
            .chrome()
            .find_all(&|el| el.attr("id") == Some(OVERLAY_ID));
        assert_eq!(overlays.len(), 1);
        assert!(overlays[0].children()[0].has_class("success"));
    }

    #[test]
    fn hide_removes_active_class() {
        let page = Arc::new(Mutex::new(Page::site_default()));
        let notifier = PopupNotifier::new(Arc::clone(&page));

        notifier.show(Notification::new(NotificationKind::Info, "a", "b", "c"));
        notifier.hide();

        let guard = page.lock().unwrap();
        let overlay = shown_overlay(&guard).expect("overlay still present");
        assert!(!overlay.has_class("active"));
    }

    #[test]
    fn icon_class_per_kind() {
        assert!(NotificationKind::Success.icon_class().contains("check"));
        assert!(NotificationKind::Error.icon_class().contains("exclamation"));
        assert!(NotificationKind::Info.icon_class().contains("info"));
    }
}
