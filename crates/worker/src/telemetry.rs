use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str =
    "warledger_worker=info,warledger_pipeline=info,warledger_torn=info,warledger_sheets=info,warledger_notify=info";

/// Install the global subscriber. `json` selects JSON lines output.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// `true` when `LOG_FORMAT=json`. Read ahead of [`WorkerConfig`] so the
/// subscriber exists before configuration errors need reporting.
///
/// [`WorkerConfig`]: crate::config::WorkerConfig
pub fn json_requested() -> bool {
    std::env::var("LOG_FORMAT").is_ok_and(|v| v.trim().eq_ignore_ascii_case("json"))
}
