//! Domain values and pure derivations for the weekly war ledger.
//!
//! - [`war`] -- validated war snapshots, enriched records, status,
//!   duration and win-rate derivations.
//! - [`calendar`] -- anchor-day resolution and weekly table names.
//! - [`layout`] -- canonical header, fixed row offsets, row synthesis and
//!   A1 addressing.
//! - [`retention`] -- which weekly tables to prune.
//! - [`providers`] -- the async traits the provisioner drives.

pub mod calendar;
pub mod error;
pub mod layout;
pub mod providers;
pub mod retention;
pub mod types;
pub mod war;
