//! Google Sheets v4 implementation of the tabular store.
//!
//! - [`auth`] -- service-account credentials and the JWT bearer grant.
//! - [`wire`] -- request builders and response types for the REST API.
//! - [`client`] -- [`SheetsClient`], the [`TabularStore`] implementation.
//!
//! [`TabularStore`]: warledger_core::providers::TabularStore

pub mod auth;
pub mod client;
pub mod wire;

pub use auth::{AuthError, ServiceAccountKey, TokenSource};
pub use client::{SheetsClient, SheetsError};
