//! Resource fetching seam.
//!
//! Translation files and HTML fragments are both plain GET-for-text requests
//! against the deployment. The trait exists so the switcher, store and router
//! can be exercised without a network (tests inject counting/failing fakes).

use async_trait::async_trait;
use tracing::debug;

use crate::error::LoadError;

/// Fetches text resources by path, relative to the site base URL.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// GET `path` and return the response body.
    ///
    /// A non-success status is a [`LoadError::Status`]; transport failures
    /// are [`LoadError::Network`].
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError>;
}

/// Production fetcher over `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        let url = self.url_for(path);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LoadError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| LoadError::Network {
            url: url.clone(),
            source,
        })
    }
}
