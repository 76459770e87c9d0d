//! War values and their derived fields.
//!
//! [`WarSnapshot`] is what a provider hands back after boundary
//! validation. [`WarRecord`] is the snapshot enriched with each
//! participant's historical [`WinLoss`] tally, ready for row synthesis.

use serde::Serialize;

use crate::error::ValidationError;
use crate::types::{EntityId, Timestamp, WarId};

// ---------------------------------------------------------------------------
// Snapshots (provider boundary)
// ---------------------------------------------------------------------------

/// One side of a war as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSnapshot {
    pub id: EntityId,
    pub name: String,
    pub score: i64,
    /// Current chain / streak counter.
    pub streak: i64,
}

/// A validated war entry with exactly two participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarSnapshot {
    pub id: WarId,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub target: i64,
    pub winner: Option<EntityId>,
    /// Ordered by ascending entity id.
    pub participants: [ParticipantSnapshot; 2],
}

impl WarSnapshot {
    /// Build a snapshot from loosely shaped provider fields.
    ///
    /// Participants are sorted by id so the two row columns are stable
    /// across runs. Fails unless exactly two distinct participants are given.
    pub fn new(
        id: WarId,
        start: Timestamp,
        end: Option<Timestamp>,
        target: i64,
        winner: Option<EntityId>,
        mut participants: Vec<ParticipantSnapshot>,
    ) -> Result<Self, ValidationError> {
        participants.sort_by_key(|p| p.id);
        let participants: [ParticipantSnapshot; 2] =
            participants
                .try_into()
                .map_err(|rest: Vec<_>| ValidationError::ParticipantCount {
                    war_id: id,
                    count: rest.len(),
                })?;
        if participants[0].id == participants[1].id {
            return Err(ValidationError::DuplicateParticipant {
                war_id: id,
                entity: participants[0].id,
            });
        }

        Ok(Self {
            id,
            start,
            end,
            target,
            winner,
            participants,
        })
    }

    /// Both participant ids, in row order.
    pub fn entity_ids(&self) -> [EntityId; 2] {
        [self.participants[0].id, self.participants[1].id]
    }
}

// ---------------------------------------------------------------------------
// Win / loss tally
// ---------------------------------------------------------------------------

/// Historical record of one entity, derived from its own war list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
}

impl WinLoss {
    /// Tally `history` from the point of view of `entity`.
    ///
    /// Wars without a recorded winner count towards `total` only.
    pub fn tally(entity: EntityId, history: &[WarSnapshot]) -> Self {
        let mut out = Self::default();
        for war in history {
            out.total += 1;
            match war.winner {
                Some(w) if w == entity => out.wins += 1,
                Some(_) => out.losses += 1,
                None => {}
            }
        }
        out
    }

    /// Rounded win percentage, e.g. `"75%"`. `"0%"` without history.
    pub fn win_rate(&self) -> String {
        if self.total == 0 {
            return "0%".to_string();
        }
        let pct = (f64::from(self.wins) / f64::from(self.total) * 100.0).round();
        format!("{}%", pct as u32)
    }
}

// ---------------------------------------------------------------------------
// Enriched records
// ---------------------------------------------------------------------------

/// A participant with its historical tally attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub id: EntityId,
    pub name: String,
    pub score: i64,
    pub streak: i64,
    pub record: WinLoss,
}

impl ParticipantSummary {
    pub fn new(snapshot: &ParticipantSnapshot, record: WinLoss) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name.clone(),
            score: snapshot.score,
            streak: snapshot.streak,
            record,
        }
    }
}

/// A war ready to be flattened into one table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarRecord {
    pub id: WarId,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub target: i64,
    pub participants: [ParticipantSummary; 2],
    pub total_score: i64,
    pub winner: Option<EntityId>,
}

impl WarRecord {
    /// Attach the tallies (in participant order) to `snapshot`.
    pub fn new(snapshot: &WarSnapshot, records: [WinLoss; 2]) -> Self {
        let [a, b] = &snapshot.participants;
        let participants = [
            ParticipantSummary::new(a, records[0]),
            ParticipantSummary::new(b, records[1]),
        ];
        Self {
            id: snapshot.id,
            start: snapshot.start,
            end: snapshot.end,
            target: snapshot.target,
            total_score: a.score + b.score,
            participants,
            winner: snapshot.winner,
        }
    }

    pub fn status(&self, now: Timestamp) -> WarStatus {
        WarStatus::derive(self.end, now)
    }

    /// Elapsed time from start to end (or `now` while still running).
    pub fn duration(&self, now: Timestamp) -> String {
        format_duration(self.start, self.end.unwrap_or(now))
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarStatus {
    Active,
    Finished,
    Preparing,
}

impl WarStatus {
    /// No end → `Active`; end already passed → `Finished`; else `Preparing`.
    pub fn derive(end: Option<Timestamp>, now: Timestamp) -> Self {
        match end {
            None => Self::Active,
            Some(end) if end < now => Self::Finished,
            Some(_) => Self::Preparing,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Finished => "Finished",
            Self::Preparing => "Preparing",
        }
    }
}

impl std::fmt::Display for WarStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// Render `end - start` as `{d}d {h}h {m}m`, dropping leading zero units.
///
/// Negative spans (start in the future) render as `"0m"`.
pub fn format_duration(start: Timestamp, end: Timestamp) -> String {
    let minutes = (end - start).num_minutes().max(0);
    format_minutes(minutes)
}

/// Minute-count form of [`format_duration`].
pub fn format_minutes(minutes: i64) -> String {
    let days = minutes / (24 * 60);
    let hours = (minutes % (24 * 60)) / 60;
    let mins = minutes % 60;

    if days > 0 {
        format!("{days}d {hours}h {mins}m")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}
