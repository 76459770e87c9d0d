//! REST client for the Torn ranked-war endpoints.
//!
//! The API key travels as a query parameter, so request URLs are only
//! ever logged by path.

use std::time::Duration;

use async_trait::async_trait;

use warledger_core::error::{ProviderError, ValidationError};
use warledger_core::providers::WarDataProvider;
use warledger_core::types::EntityId;
use warledger_core::war::WarSnapshot;

use crate::payload::{into_snapshots, RankedWarsResponse, RATE_LIMIT_CODE};

/// Public Torn API host.
pub const DEFAULT_BASE_URL: &str = "https://api.torn.com";

/// Per-request ceiling when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SELECTIONS: &str = "rankedwars";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the Torn REST layer.
#[derive(Debug, thiserror::Error)]
pub enum TornError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Torn returned a non-2xx status code.
    #[error("Torn API error ({status}): {body}")]
    HttpStatus { status: u16, body: String },

    /// Torn reported an error object inside a 200 response.
    #[error("Torn API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The body was not valid JSON of the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body parsed but an entry failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<TornError> for ProviderError {
    fn from(err: TornError) -> Self {
        match err {
            TornError::Request(e) => ProviderError::Transport(e.to_string()),
            TornError::HttpStatus { status, body } => ProviderError::HttpStatus { status, body },
            TornError::Api { code, .. } if code == RATE_LIMIT_CODE => ProviderError::RateLimited,
            TornError::Api { code, message } => ProviderError::Api { code, message },
            TornError::Decode(e) => ProviderError::Malformed(e.to_string()),
            TornError::Validation(e) => e.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TornClient
// ---------------------------------------------------------------------------

/// HTTP client bound to one API key.
pub struct TornClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TornClient {
    /// Create a client with a per-request `timeout`.
    ///
    /// * `base_url` - API root without trailing slash, e.g. `https://api.torn.com`.
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, TornError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// `GET /torn/?selections=rankedwars` -- every listed ranked war.
    pub async fn ranked_wars(&self) -> Result<Vec<WarSnapshot>, TornError> {
        self.get_ranked_wars("/torn/").await
    }

    /// `GET /faction/{id}?selections=rankedwars` -- one faction's wars.
    pub async fn faction_ranked_wars(&self, faction: EntityId) -> Result<Vec<WarSnapshot>, TornError> {
        self.get_ranked_wars(&format!("/faction/{faction}")).await
    }

    // ---- private helpers ----

    async fn get_ranked_wars(&self, path: &str) -> Result<Vec<WarSnapshot>, TornError> {
        tracing::debug!(path, "Fetching ranked wars");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("selections", SELECTIONS), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        let body = response.text().await.map_err(redact)?;
        if !status.is_success() {
            return Err(TornError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parse_listing(&body)?;
        tracing::debug!(path, wars = parsed.len(), "Fetched ranked wars");
        Ok(parsed)
    }
}

/// reqwest errors carry the request URL, which includes the API key.
fn redact(err: reqwest::Error) -> TornError {
    TornError::Request(err.without_url())
}

/// Decode and validate a listing body, surfacing Torn's embedded errors.
pub fn parse_listing(body: &str) -> Result<Vec<WarSnapshot>, TornError> {
    let parsed: RankedWarsResponse = serde_json::from_str(body)?;
    if let Some(err) = parsed.error {
        return Err(TornError::Api {
            code: err.code,
            message: err.error,
        });
    }
    Ok(into_snapshots(parsed.rankedwars)?)
}

#[async_trait]
impl WarDataProvider for TornClient {
    async fn fetch_wars(&self) -> Result<Vec<WarSnapshot>, ProviderError> {
        let wars = self.ranked_wars().await?;
        tracing::info!(count = wars.len(), "Fetched wars from Torn API");
        Ok(wars)
    }

    async fn fetch_entity_history(
        &self,
        entity: EntityId,
    ) -> Result<Vec<WarSnapshot>, ProviderError> {
        Ok(self.faction_ranked_wars(entity).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn new_does_not_panic() {
        let client = TornClient::new(
            "https://api.torn.com/".into(),
            "key".into(),
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.torn.com");
    }

    #[test]
    fn rate_limit_maps_to_rate_limited() {
        let err = parse_listing(r#"{ "error": { "code": 5, "error": "Too many requests" } }"#)
            .unwrap_err();
        assert_matches!(ProviderError::from(err), ProviderError::RateLimited);
    }

    #[test]
    fn other_api_errors_keep_code_and_message() {
        let err = parse_listing(r#"{ "error": { "code": 2, "error": "Incorrect key" } }"#)
            .unwrap_err();
        assert_matches!(
            ProviderError::from(err),
            ProviderError::Api { code: 2, ref message } if message == "Incorrect key"
        );
    }

    #[test]
    fn garbage_body_maps_to_malformed() {
        let err = parse_listing("<html>oops</html>").unwrap_err();
        assert_matches!(ProviderError::from(err), ProviderError::Malformed(_));
    }

    #[test]
    fn empty_listing_is_ok() {
        assert!(parse_listing(r#"{ "rankedwars": {} }"#).unwrap().is_empty());
    }

    #[test]
    fn http_status_maps_through() {
        let err = TornError::HttpStatus {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_matches!(
            ProviderError::from(err),
            ProviderError::HttpStatus { status: 502, .. }
        );
    }
}
