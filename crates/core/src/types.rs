/// Provider-assigned identifier of a faction (or any warring entity).
pub type EntityId = u64;

/// Provider-assigned identifier of a single war.
pub type WarId = u64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
