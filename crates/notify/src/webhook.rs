//! Webhook delivery of text notifications.
//!
//! The body is `{"content": "<message>"}`, which Discord webhooks
//! render as a chat message.

use std::time::Duration;

use async_trait::async_trait;

use warledger_core::error::NotifyError;
use warledger_core::providers::Notifier;

/// HTTP request timeout for a single delivery attempt.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Discord rejects `content` longer than this.
pub const MAX_CONTENT_CHARS: usize = 2000;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

impl From<WebhookError> for NotifyError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::Request(e) => NotifyError::Transport(e.to_string()),
            WebhookError::HttpStatus(code) => NotifyError::HttpStatus(code),
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookNotifier
// ---------------------------------------------------------------------------

/// Delivers text messages to one webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier with a pre-configured HTTP client.
    pub fn new(url: String) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, url })
    }

    /// Execute a single POST request and check the response status.
    pub async fn post(&self, message: &str) -> Result<(), WebhookError> {
        let payload = payload(message);
        let response = self.client.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

/// JSON body for `message`, truncated to [`MAX_CONTENT_CHARS`].
pub fn payload(message: &str) -> serde_json::Value {
    let content: String = message.chars().take(MAX_CONTENT_CHARS).collect();
    serde_json::json!({ "content": content })
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.post(message).await?;
        tracing::info!("Notification delivered");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
