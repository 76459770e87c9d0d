//! Outbound notification delivery.
//!
//! [`WebhookNotifier`] posts a plain-text message to a Discord-style
//! webhook. Delivery is a single attempt; callers decide whether a
//! failure matters.

pub mod webhook;

pub use webhook::WebhookNotifier;
