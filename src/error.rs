//! Error taxonomy for the site runtime.
//!
//! `LoadError` covers translation and fragment fetch/parse failures;
//! `SiteError` is the crate-level error surfaced to callers. No error here is
//! allowed to leave the page in a non-interactive state: load failures end in
//! a rendered fallback, everything else ends in a dismissible notification.

use thiserror::Error;

/// Failure to fetch or parse a remote resource (translation file or HTML fragment).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The server answered with a non-success status.
    #[error("request for {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// The request never completed (DNS, connect, timeout, ...).
    #[error("request for {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The payload was fetched but is not valid structured data.
    #[error("could not parse payload from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// URL of the resource that failed to load.
    pub fn url(&self) -> &str {
        match self {
            LoadError::Status { url, .. }
            | LoadError::Network { url, .. }
            | LoadError::Parse { url, .. } => url,
        }
    }
}

/// Top-level runtime error.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The verification widget never became ready within the retry budget.
    #[error("verification widget unavailable after {attempts} attempts")]
    WidgetUnavailable { attempts: u32 },

    /// The form was submitted without a completed verification response.
    #[error("verification response missing")]
    Validation,

    /// The form endpoint rejected the submission.
    #[error("submission rejected with status {status}: {message}")]
    Submission { status: u16, message: String },

    /// The route table has no entry for the home token. Navigation cannot
    /// fall back anywhere, so this is a fatal configuration error.
    #[error("no route configured for the home token")]
    HomeRouteMissing,
}
