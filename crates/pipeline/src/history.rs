//! Per-entity historical tallies.
//!
//! Each distinct entity's history is fetched at most once per run, after
//! a fixed pause that keeps the run under the provider's request-rate
//! ceiling. A failed lookup degrades to [`WinLoss::default`].

use std::collections::HashMap;
use std::time::Duration;

use warledger_core::error::ProviderError;
use warledger_core::providers::WarDataProvider;
use warledger_core::types::EntityId;
use warledger_core::war::{WarRecord, WarSnapshot, WinLoss};

/// Pause before each history request when none is configured.
pub const DEFAULT_HISTORY_DELAY: Duration = Duration::from_millis(200);

/// Memoizing tally lookup over a [`WarDataProvider`].
pub struct HistoryTally<'a> {
    provider: &'a dyn WarDataProvider,
    delay: Duration,
    cache: HashMap<EntityId, WinLoss>,
}

impl<'a> HistoryTally<'a> {
    pub fn new(provider: &'a dyn WarDataProvider, delay: Duration) -> Self {
        Self {
            provider,
            delay,
            cache: HashMap::new(),
        }
    }

    /// Fetch and tally `entity`'s history. Errors are returned as-is.
    pub async fn lookup(&self, entity: EntityId) -> Result<WinLoss, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        tracing::debug!(entity, "Fetching entity history");
        let history = self.provider.fetch_entity_history(entity).await?;
        Ok(WinLoss::tally(entity, &history))
    }

    /// Cached [`lookup`](Self::lookup) with a zeroed fallback on error.
    pub async fn record_for(&mut self, entity: EntityId) -> WinLoss {
        if let Some(hit) = self.cache.get(&entity) {
            return *hit;
        }

        let record = match self.lookup(entity).await {
            Ok(record) => record,
            Err(ProviderError::RateLimited) => {
                tracing::warn!(entity, "Rate limited fetching history, using default stats");
                WinLoss::default()
            }
            Err(e) => {
                tracing::warn!(entity, error = %e, "Failed to fetch history, using default stats");
                WinLoss::default()
            }
        };
        self.cache.insert(entity, record);
        record
    }

    /// Number of distinct entities looked up so far.
    pub fn entities_seen(&self) -> usize {
        self.cache.len()
    }

    /// Enrich every snapshot with both participants' tallies.
    pub async fn enrich(&mut self, wars: &[WarSnapshot]) -> Vec<WarRecord> {
        let mut records = Vec::with_capacity(wars.len());
        for war in wars {
            let [a, b] = war.entity_ids();
            let tallies = [self.record_for(a).await, self.record_for(b).await];
            records.push(WarRecord::new(war, tallies));
        }
        records
    }
}
