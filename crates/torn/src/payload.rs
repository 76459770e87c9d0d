//! Raw ranked-war payloads and boundary validation.
//!
//! Both the global listing (`/torn/?selections=rankedwars`) and a
//! faction's own listing (`/faction/{id}?selections=rankedwars`) share
//! this shape:
//!
//! ```json
//! {
//!   "rankedwars": {
//!     "1234": {
//!       "factions": {
//!         "111": { "name": "Alpha", "score": 1500, "chain": 40 },
//!         "222": { "name": "Bravo", "score": 900, "chain": 12 }
//!       },
//!       "war": { "start": 1704196800, "end": 0, "target": 3000, "winner": 0 }
//!     }
//!   }
//! }
//! ```
//!
//! `end` and `winner` use `0` for "not yet".

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use serde::Deserialize;

use warledger_core::error::ValidationError;
use warledger_core::types::{EntityId, Timestamp, WarId};
use warledger_core::war::{ParticipantSnapshot, WarSnapshot};

/// Torn error code for "Too many requests".
pub const RATE_LIMIT_CODE: i64 = 5;

const UNKNOWN_NAME: &str = "Unknown";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Top-level response envelope.
#[derive(Debug, Deserialize)]
pub struct RankedWarsResponse {
    #[serde(default)]
    pub rankedwars: BTreeMap<WarId, RawRankedWar>,
    pub error: Option<ApiErrorBody>,
}

/// Error object Torn embeds in a 200 response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct RawRankedWar {
    #[serde(default)]
    pub factions: BTreeMap<EntityId, RawFaction>,
    pub war: RawWarTimes,
}

#[derive(Debug, Deserialize)]
pub struct RawFaction {
    pub name: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub chain: i64,
}

#[derive(Debug, Deserialize)]
pub struct RawWarTimes {
    pub start: i64,
    pub end: Option<i64>,
    #[serde(default)]
    pub target: i64,
    pub winner: Option<EntityId>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate every entry of a listing, in war-id order.
pub fn into_snapshots(
    wars: BTreeMap<WarId, RawRankedWar>,
) -> Result<Vec<WarSnapshot>, ValidationError> {
    wars.into_iter()
        .map(|(id, raw)| raw.into_snapshot(id))
        .collect()
}

impl RawRankedWar {
    pub fn into_snapshot(self, id: WarId) -> Result<WarSnapshot, ValidationError> {
        let start = to_timestamp(id, self.war.start)?;
        let end = match self.war.end {
            Some(0) | None => None,
            Some(secs) => Some(to_timestamp(id, secs)?),
        };
        let winner = self.war.winner.filter(|w| *w != 0);

        let participants = self
            .factions
            .into_iter()
            .map(|(fid, f)| ParticipantSnapshot {
                id: fid,
                name: f.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                score: f.score,
                streak: f.chain,
            })
            .collect();

        WarSnapshot::new(id, start, end, self.war.target, winner, participants)
    }
}

fn to_timestamp(war_id: WarId, secs: i64) -> Result<Timestamp, ValidationError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(ValidationError::Timestamp {
            war_id,
            value: secs,
        })
}
