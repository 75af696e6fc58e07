use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Site
    pub base_url: String,
    pub site_title: String,

    // Contact form
    pub form_endpoint: String,
    pub recaptcha_site_key: String,

    // Language preference persistence
    pub preference_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Site - where translation files and view fragments are served from
            base_url: std::env::var("SITE_BASE_URL").context("SITE_BASE_URL not set")?,
            site_title: std::env::var("SITE_TITLE").unwrap_or_else(|_| "QA Expert".to_string()),

            // Contact form
            form_endpoint: std::env::var("CONTACT_FORM_ENDPOINT")
                .context("CONTACT_FORM_ENDPOINT not set")?,
            recaptcha_site_key: std::env::var("RECAPTCHA_SITE_KEY")
                .context("RECAPTCHA_SITE_KEY not set")?,

            // Language preference persistence
            preference_dir: std::env::var("PREFERENCE_DIR")
                .unwrap_or_else(|_| ".state".to_string()),
        })
    }
}
