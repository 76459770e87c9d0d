//! Error enums shared by the collaborator traits.
//!
//! The HTTP crates map their transport-specific failures into these
//! variants so the provisioner never depends on `reqwest` directly.

use crate::types::EntityId;

/// Failure reading from the war-data provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network, DNS, TLS or timeout failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx HTTP status.
    #[error("Provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The provider reported an error inside an otherwise valid response.
    #[error("Provider error {code}: {message}")]
    Api { code: i64, message: String },

    /// The provider is throttling this client.
    #[error("Rate limited by provider")]
    RateLimited,

    /// The payload could not be parsed or failed boundary validation.
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Failure talking to the tabular store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Credentials missing, unreadable or rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network, DNS, TLS or timeout failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The store answered with a non-2xx HTTP status.
    #[error("Store returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The store response did not have the expected shape.
    #[error("Unexpected store response: {0}")]
    Malformed(String),

    /// An operation referenced a table that does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

/// Failure delivering a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Notifier returned HTTP {0}")]
    HttpStatus(u16),
}

/// Boundary-validation failure for a single war entry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("War {war_id} has {count} participants, expected 2")]
    ParticipantCount { war_id: u64, count: usize },

    #[error("War {war_id} has an out-of-range timestamp {value}")]
    Timestamp { war_id: u64, value: i64 },

    #[error("War {war_id} lists participant {entity} twice")]
    DuplicateParticipant { war_id: u64, entity: EntityId },
}

impl From<ValidationError> for ProviderError {
    fn from(err: ValidationError) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}
