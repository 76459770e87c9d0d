//! Weekly table retention.

/// How many weekly tables are kept when not configured.
pub const DEFAULT_KEEP: usize = 8;

/// Weekly tables split into those retained and those to delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPlan {
    /// Newest first.
    pub kept: Vec<String>,
    /// Oldest last.
    pub doomed: Vec<String>,
}

/// Split the weekly tables in `names` into kept and doomed.
///
/// Only names starting with `prefix` are considered. They are sorted
/// descending (fixed-width dates make that newest first); the first `keep`
/// are kept and the rest are doomed.
pub fn plan_retention<S: AsRef<str>>(names: &[S], prefix: &str, keep: usize) -> RetentionPlan {
    let mut weekly: Vec<String> = names
        .iter()
        .map(AsRef::as_ref)
        .filter(|n| n.starts_with(prefix))
        .map(str::to_string)
        .collect();
    weekly.sort_unstable_by(|a, b| b.cmp(a));
    let doomed = weekly.split_off(keep.min(weekly.len()));
    RetentionPlan {
        kept: weekly,
        doomed,
    }
}
