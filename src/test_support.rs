//! Shared fakes for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::fetch::ResourceFetcher;
use crate::form::VerificationWidget;
use crate::notify::{Notification, Notifier};

/// In-memory fetcher with per-path canned bodies, call counting, and optional
/// per-path delays (for last-initiated-wins tests). Unknown paths answer 404.
pub(crate) struct StaticFetcher {
    responses: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    counts: Mutex<HashMap<String, usize>>,
}

impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self {
            responses: HashMap::new(),
            delays: HashMap::new(),
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn with(mut self, path: &str, body: &str) -> Self {
        self.responses.insert(path.to_string(), body.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// How many times `path` was requested.
    pub(crate) fn calls(&self, path: &str) -> usize {
        self.counts
            .lock()
            .map(|counts| counts.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total requests across all paths.
    pub(crate) fn total_calls(&self) -> usize {
        self.counts
            .lock()
            .map(|counts| counts.values().sum())
            .unwrap_or(0)
    }
}

/// Verification widget that is always ready and answers with a fixed token.
pub(crate) struct StaticWidget {
    token: Option<String>,
    resets: std::sync::atomic::AtomicU32,
}

impl StaticWidget {
    pub(crate) fn solved(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            resets: std::sync::atomic::AtomicU32::new(0),
        }
    }

    pub(crate) fn unsolved() -> Self {
        Self {
            token: None,
            resets: std::sync::atomic::AtomicU32::new(0),
        }
    }

    pub(crate) fn resets(&self) -> u32 {
        self.resets.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl VerificationWidget for StaticWidget {
    async fn is_ready(&self) -> bool {
        true
    }

    fn render(&self) -> u32 {
        0
    }

    fn response(&self) -> Option<String> {
        self.token.clone()
    }

    fn reset(&self) {
        self.resets
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

/// Notifier that records what was shown instead of rendering a popup.
pub(crate) struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn shown(&self) -> Vec<Notification> {
        self.shown
            .lock()
            .map(|shown| shown.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notification: Notification) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(notification);
        }
    }

    fn hide(&self) {}
}

#[async_trait]
impl ResourceFetcher for StaticFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        if let Ok(mut counts) = self.counts.lock() {
            *counts.entry(path.to_string()).or_insert(0) += 1;
        }
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        match self.responses.get(path) {
            Some(body) => Ok(body.clone()),
            None => Err(LoadError::Status {
                url: path.to_string(),
                status: 404,
            }),
        }
    }
}
