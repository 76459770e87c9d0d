use warledger_core::error::{ProviderError, StoreError};

/// Fatal failure of a provisioning run.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The main war-data fetch failed.
    #[error("Failed to fetch wars: {0}")]
    Provider(#[from] ProviderError),

    /// Reading or writing the weekly table failed.
    #[error("Tabular store error: {0}")]
    Store(#[from] StoreError),
}

/// Failure of an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Tabular store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}
