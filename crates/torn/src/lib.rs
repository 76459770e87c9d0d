//! Torn HTTP API client.
//!
//! Provides the raw ranked-war payload types, their validation into
//! [`WarSnapshot`](warledger_core::war::WarSnapshot) values, and a
//! [`TornClient`] implementing
//! [`WarDataProvider`](warledger_core::providers::WarDataProvider).

pub mod client;
pub mod payload;

pub use client::{TornClient, TornError};
