//! Weekly war-ledger pipeline.
//!
//! Drives the collaborator traits from `warledger-core`:
//!
//! - [`history`] -- per-entity win/loss tallies with a zeroed fallback.
//! - [`provisioner`] -- [`WeeklyProvisioner`]: locate or create this
//!   week's table, repair its header, replace its rows.
//! - [`retention`] -- best-effort pruning of old weekly tables.
//! - [`notice`] -- the publication message and its delivery.
//! - [`export`] -- dump one table to a JSON document.

pub mod error;
pub mod export;
pub mod history;
pub mod notice;
pub mod provisioner;
pub mod retention;

pub use error::{ExportError, ProvisionError};
pub use provisioner::{ProvisionerSettings, RunSummary, TableState, WeeklyProvisioner};
pub use retention::RetentionReport;
