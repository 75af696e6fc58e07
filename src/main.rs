use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info};

use portfolio_spa::config::Config;
use portfolio_spa::fetch::HttpFetcher;
use portfolio_spa::form::VerificationWidget;
use portfolio_spa::i18n::BrowserEnv;
use portfolio_spa::page::OpaqueMarkup;
use portfolio_spa::router::{ContentRouter, NavigateOutcome};
use portfolio_spa::storage::FilePreferenceStore;
use portfolio_spa::SiteRuntime;

/// There is no widget script in a headless run; the check never submits the
/// form, it only verifies that views and translations are reachable.
struct HeadlessWidget;

#[async_trait]
impl VerificationWidget for HeadlessWidget {
    async fn is_ready(&self) -> bool {
        false
    }

    fn render(&self) -> u32 {
        0
    }

    fn response(&self) -> Option<String> {
        None
    }

    fn reset(&self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production/CI)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_spa=info".parse()?),
        )
        .init();

    info!("Starting site check");

    // Load configuration from environment
    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.preference_dir)?;

    let fetcher = Arc::new(HttpFetcher::new(reqwest::Client::new(), &config.base_url));
    let prefs = Arc::new(FilePreferenceStore::new(&config.preference_dir));
    let runtime = SiteRuntime::new(
        &config,
        fetcher,
        Arc::new(OpaqueMarkup),
        prefs,
        Arc::new(HeadlessWidget),
    );

    // Step 1: Resolve and initialize the session language
    let language = runtime.start(&BrowserEnv::default(), "").await?;
    info!("Session language: {}", language);

    // Step 2: Prefetch every enabled language's translation table
    let loaded = runtime.preload_languages().await;
    info!("Prefetched {} translation table(s)", loaded);

    // Step 3: Walk every route and verify its view renders
    let mut failures = 0;
    for token in runtime.router().routes().tokens() {
        match runtime.navigate(&ContentRouter::hash_for(&token)).await? {
            NavigateOutcome::Rendered => {
                let page = runtime.page();
                let title = page.lock().map(|p| p.title().to_string()).unwrap_or_default();
                info!("Route '#{}' rendered ({})", token, title);
            }
            NavigateOutcome::ErrorShown => {
                error!("Route '#{}' failed to load", token);
                failures += 1;
            }
            NavigateOutcome::Superseded => {}
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} route(s) failed to load");
    }

    info!("Site check passed");
    Ok(())
}
