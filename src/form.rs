//! Contact form submission flow, gated by a third-party verification widget.
//!
//! The widget (reCAPTCHA in the deployment) is abstracted behind
//! [`VerificationWidget`]: the flow waits for it with a bounded fixed-interval
//! retry, renders it into its container exactly once, reads its response
//! token before submitting, and resets it after success and on expiry.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::dom::Element;
use crate::error::SiteError;
use crate::retry::{with_retry, RetryConfig};

/// Guard attribute marking a rendered view whose form already has its
/// submission handler attached.
pub const FORM_BOUND_ATTR: &str = "data-form-bound";

/// Guard attribute marking the container the widget was rendered into.
pub const WIDGET_ID_ATTR: &str = "data-widget-id";

/// Field name the endpoint expects the verification token under.
pub const VERIFICATION_FIELD: &str = "g-recaptcha-response";

/// id of the element the widget renders into on the contact view.
pub const WIDGET_CONTAINER_ID: &str = "recaptcha-container";

/// Contact form field values as read from the rendered view.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub service: String,
    pub message: String,
    pub privacy: bool,
}

/// Third-party human-verification widget.
#[async_trait]
pub trait VerificationWidget: Send + Sync {
    /// Whether the widget script has loaded and can render.
    async fn is_ready(&self) -> bool;

    /// Render into the container and return the widget instance id.
    fn render(&self) -> u32;

    /// The completed verification token, if the user solved the challenge.
    fn response(&self) -> Option<String>;

    /// Discard the current challenge state.
    fn reset(&self);
}

/// Machine-readable error body the form endpoint answers with on rejection.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ContactFormHandler {
    client: reqwest::Client,
    endpoint: String,
    widget: Arc<dyn VerificationWidget>,
    ready_retry: RetryConfig,
}

impl ContactFormHandler {
    pub fn new(client: reqwest::Client, endpoint: &str, widget: Arc<dyn VerificationWidget>) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            widget,
            ready_retry: RetryConfig::widget_ready(),
        }
    }

    /// Override the readiness retry policy (tests use a tighter budget).
    pub fn with_ready_retry(mut self, retry: RetryConfig) -> Self {
        self.ready_retry = retry;
        self
    }

    /// Wait for the widget script to load, with the bounded fixed-interval
    /// retry. Callers holding a page lock wait here first, then render.
    pub async fn wait_ready(&self) -> Result<(), SiteError> {
        let widget = Arc::clone(&self.widget);
        let ready = with_retry(&self.ready_retry, "verification widget ready", || {
            let widget = Arc::clone(&widget);
            async move {
                if widget.is_ready().await {
                    Ok(())
                } else {
                    Err("widget script not loaded yet")
                }
            }
        })
        .await;

        ready.map_err(|_| SiteError::WidgetUnavailable {
            attempts: self.ready_retry.max_attempts,
        })
    }

    /// Render the widget into `container` exactly once. Repeated calls
    /// (repeated navigation to the contact view with a surviving container)
    /// are no-ops.
    pub fn render_into(&self, container: &mut Element) {
        if container.attr(WIDGET_ID_ATTR).is_none() {
            let id = self.widget.render();
            container.set_attr(WIDGET_ID_ATTR, &id.to_string());
            debug!("Verification widget rendered with id {}", id);
        }
    }

    /// Wait for readiness, then render into `container` once.
    pub async fn ensure_widget(&self, container: &mut Element) -> Result<(), SiteError> {
        self.wait_ready().await?;
        self.render_into(container);
        Ok(())
    }

    /// Submit the form. Refuses without a completed verification response
    /// (no network request is sent in that case); resets the widget after a
    /// successful submission.
    pub async fn submit(&self, form: &ContactForm) -> Result<(), SiteError> {
        let Some(token) = self.widget.response() else {
            warn!("Submission attempted without a verification response");
            return Err(SiteError::Validation);
        };

        let fields: [(&str, &str); 7] = [
            ("name", &form.name),
            ("email", &form.email),
            ("subject", &form.subject),
            ("service", &form.service),
            ("message", &form.message),
            ("privacy", if form.privacy { "true" } else { "false" }),
            (VERIFICATION_FIELD, &token),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .form(&fields)
            .send()
            .await
            .map_err(|e| SiteError::Submission {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or_else(|_| "Error en el servidor".to_string());
            warn!("Form endpoint rejected submission ({}): {}", status, message);
            return Err(SiteError::Submission {
                status: status.as_u16(),
                message,
            });
        }

        info!("Contact form submitted");
        self.widget.reset();
        Ok(())
    }

    /// Expiry callback: the token timed out, discard it.
    pub fn on_expired(&self) {
        warn!("Verification token expired, resetting widget");
        self.widget.reset();
    }
}

/// Attach the submission handler to the form in a freshly rendered view.
///
/// Returns `true` when the handler was attached, `false` when the view
/// carries no form or the form is already bound (repeated navigation must
/// not stack handlers).
pub fn bind_contact_form(root: &mut Element) -> bool {
    match root.find_mut(&|el| el.tag() == "form") {
        Some(form) if form.attr(FORM_BOUND_ATTR).is_none() => {
            form.set_attr(FORM_BOUND_ATTR, "true");
            debug!("Contact form handler attached");
            true
        }
        Some(_) => {
            debug!("Contact form already bound, skipping");
            false
        }
        None => false,
    }
}
