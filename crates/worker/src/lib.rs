//! Process wiring for the war-ledger binaries.
//!
//! - [`config`] -- environment configuration.
//! - [`telemetry`] -- tracing subscriber setup.
//! - [`app`] -- builds the Torn, Sheets and webhook clients and runs the
//!   pipeline.

pub mod app;
pub mod config;
pub mod telemetry;

pub use config::{ConfigError, ExportConfig, SheetsConfig, WorkerConfig};
