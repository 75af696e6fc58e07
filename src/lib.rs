//! Headless runtime for a single-page portfolio site.
//!
//! Covers the client-side behaviors of the deployment: language detection and
//! switching backed by remote translation tables, a hash-based content router
//! that swaps view fragments into the page model, a CAPTCHA-guarded contact
//! form flow, and popup notifications. Browser specifics (DOM, localStorage,
//! the widget script) sit behind traits so the same logic runs in tests, in
//! the `site-check` binary, and in a browser binding.

pub mod config;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod form;
pub mod i18n;
pub mod notify;
pub mod page;
pub mod retry;
pub mod router;
pub mod runtime;
pub mod storage;
pub mod switcher;
pub mod translate;
pub mod widgets;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{LoadError, SiteError};
pub use runtime::SiteRuntime;
