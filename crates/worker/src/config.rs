//! Environment configuration for the two binaries.
//!
//! Both share [`SheetsConfig`]. Only the provisioning run talks to Torn,
//! so [`ExportConfig`] never asks for a Torn key.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Weekday;

use warledger_core::calendar::{self, DEFAULT_ANCHOR_WEEKDAY};
use warledger_core::layout::{DATA_START_ROW, DEFAULT_CAPACITY_ROWS};
use warledger_core::retention::DEFAULT_KEEP;
use warledger_pipeline::export::{DEFAULT_EXPORT_PATH, DEFAULT_EXPORT_TABLE};
use warledger_pipeline::provisioner::DEFAULT_PREFIX;
use warledger_pipeline::ProvisionerSettings;
use warledger_torn::client::DEFAULT_BASE_URL;

const DEFAULT_HISTORY_DELAY_MS: u64 = 200;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Either GOOGLE_CREDENTIALS_PATH or GOOGLE_CREDENTIALS_JSON must be set")]
    NoCredentials,
}

// ---------------------------------------------------------------------------
// Variable source
// ---------------------------------------------------------------------------

/// Trimmed lookups over a variable source; blank values count as unset.
struct Vars<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Vars<'_> {
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T>(&self, var: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(var) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}

// ---------------------------------------------------------------------------
// SheetsConfig
// ---------------------------------------------------------------------------

/// Spreadsheet target and Google credentials.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub credentials_path: Option<PathBuf>,
    pub credentials_json: Option<String>,
    /// Per-request ceiling for every outbound call.
    pub request_timeout: Duration,
}

impl SheetsConfig {
    fn load(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let config = Self {
            spreadsheet_id: vars.required("SPREADSHEET_ID")?,
            credentials_path: vars.get("GOOGLE_CREDENTIALS_PATH").map(PathBuf::from),
            credentials_json: vars.get("GOOGLE_CREDENTIALS_JSON"),
            request_timeout: Duration::from_secs(
                vars.parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            ),
        };
        if config.credentials_path.is_none() && config.credentials_json.is_none() {
            return Err(ConfigError::NoCredentials);
        }
        if config.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// WorkerConfig
// ---------------------------------------------------------------------------

/// Configuration of the weekly provisioning run.
#[derive(Clone)]
pub struct WorkerConfig {
    pub sheets: SheetsConfig,
    pub torn_api_key: String,
    pub torn_base_url: String,
    pub prefix: String,
    pub anchor: Weekday,
    pub keep_weeks: usize,
    pub capacity_rows: u32,
    pub history_delay: Duration,
    /// `None` disables notification regardless of `notify_enabled`.
    pub webhook_url: Option<String>,
    pub notify_enabled: bool,
}

impl std::fmt::Debug for WorkerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerConfig")
            .field("sheets", &self.sheets)
            .field("torn_base_url", &self.torn_base_url)
            .field("prefix", &self.prefix)
            .field("anchor", &self.anchor)
            .field("keep_weeks", &self.keep_weeks)
            .field("capacity_rows", &self.capacity_rows)
            .field("notify", &self.notify())
            .finish_non_exhaustive()
    }
}

impl WorkerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default                          |
    /// |---------------------------|----------------------------------|
    /// | `TORN_API_KEY`            | required                         |
    /// | `SPREADSHEET_ID`          | required                         |
    /// | `GOOGLE_CREDENTIALS_PATH` | one of path / json required      |
    /// | `GOOGLE_CREDENTIALS_JSON` | one of path / json required      |
    /// | `TORN_API_BASE_URL`       | `https://api.torn.com`           |
    /// | `SHEET_NAME_PREFIX`       | `Torn Wars Data`                 |
    /// | `ANCHOR_WEEKDAY`          | `tue`                            |
    /// | `KEEP_WEEKS`              | `8`                              |
    /// | `TABLE_CAPACITY_ROWS`     | `1000`                           |
    /// | `HISTORY_DELAY_MS`        | `200`                            |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                             |
    /// | `DISCORD_WEBHOOK_URL`     | unset (no notification)          |
    /// | `NOTIFY_ENABLED`          | `true` when a webhook is set     |
    ///
    /// `LOG_FORMAT` is read separately by [`telemetry`](crate::telemetry).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars { lookup: &lookup };

        let torn_api_key = vars.required("TORN_API_KEY")?;
        let sheets = SheetsConfig::load(&vars)?;

        let anchor = match vars.get("ANCHOR_WEEKDAY") {
            Some(raw) => calendar::parse_weekday(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "ANCHOR_WEEKDAY",
                reason: format!("'{raw}' is not a weekday"),
            })?,
            None => DEFAULT_ANCHOR_WEEKDAY,
        };

        let webhook_url = vars.get("DISCORD_WEBHOOK_URL");
        let notify_enabled = match vars.get("NOTIFY_ENABLED") {
            Some(raw) => parse_bool("NOTIFY_ENABLED", &raw)?,
            None => webhook_url.is_some(),
        };

        let capacity_rows = vars.parse_or("TABLE_CAPACITY_ROWS", DEFAULT_CAPACITY_ROWS)?;
        if capacity_rows < DATA_START_ROW {
            return Err(ConfigError::Invalid {
                var: "TABLE_CAPACITY_ROWS",
                reason: format!("must be at least {DATA_START_ROW}"),
            });
        }

        Ok(Self {
            sheets,
            torn_api_key,
            torn_base_url: vars
                .get("TORN_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            prefix: vars
                .get("SHEET_NAME_PREFIX")
                .unwrap_or_else(|| DEFAULT_PREFIX.into()),
            anchor,
            keep_weeks: vars.parse_or("KEEP_WEEKS", DEFAULT_KEEP)?,
            capacity_rows,
            history_delay: Duration::from_millis(
                vars.parse_or("HISTORY_DELAY_MS", DEFAULT_HISTORY_DELAY_MS)?,
            ),
            webhook_url,
            notify_enabled,
        })
    }

    /// Notification needs both the switch and a destination.
    pub fn notify(&self) -> bool {
        self.notify_enabled && self.webhook_url.is_some()
    }

    pub fn provisioner_settings(&self) -> ProvisionerSettings {
        ProvisionerSettings {
            prefix: self.prefix.clone(),
            anchor: self.anchor,
            keep: self.keep_weeks,
            capacity_rows: self.capacity_rows,
            history_delay: self.history_delay,
            notify: self.notify(),
        }
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Configuration of the table export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub sheets: SheetsConfig,
    /// Table to export.
    pub sheet: String,
    pub output: PathBuf,
}

impl ExportConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default                          |
    /// |---------------------------|----------------------------------|
    /// | `SPREADSHEET_ID`          | required                         |
    /// | `GOOGLE_CREDENTIALS_PATH` | one of path / json required      |
    /// | `GOOGLE_CREDENTIALS_JSON` | one of path / json required      |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                             |
    /// | `EXPORT_SHEET_NAME`       | `Random Wars Sample`             |
    /// | `EXPORT_OUTPUT`           | `Data/random_wars_sample.json`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars { lookup: &lookup };
        Ok(Self {
            sheets: SheetsConfig::load(&vars)?,
            sheet: vars
                .get("EXPORT_SHEET_NAME")
                .unwrap_or_else(|| DEFAULT_EXPORT_TABLE.into()),
            output: vars
                .get("EXPORT_OUTPUT")
                .map_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH), PathBuf::from),
        })
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("'{raw}' is not a boolean"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<WorkerConfig, ConfigError> {
        let env = env(pairs);
        WorkerConfig::from_lookup(|key| env.get(key).cloned())
    }

    fn load_export(pairs: &[(&str, &str)]) -> Result<ExportConfig, ConfigError> {
        let env = env(pairs);
        ExportConfig::from_lookup(|key| env.get(key).cloned())
    }

    const BASE: &[(&str, &str)] = &[
        ("TORN_API_KEY", "abc123"),
        ("SPREADSHEET_ID", "sheet-123"),
        ("GOOGLE_CREDENTIALS_PATH", "/secrets/sa.json"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut pairs = BASE.to_vec();
        pairs.extend_from_slice(extra);
        pairs
    }

    // -----------------------------------------------------------------------
    // WorkerConfig
    // -----------------------------------------------------------------------

    #[test]
    fn defaults_apply() {
        let cfg = load(BASE).unwrap();
        assert_eq!(cfg.torn_base_url, "https://api.torn.com");
        assert_eq!(cfg.prefix, "Torn Wars Data");
        assert_eq!(cfg.anchor, Weekday::Tue);
        assert_eq!(cfg.keep_weeks, 8);
        assert_eq!(cfg.capacity_rows, 1000);
        assert_eq!(cfg.history_delay, Duration::from_millis(200));
        assert_eq!(cfg.sheets.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.sheets.spreadsheet_id, "sheet-123");
        assert!(!cfg.notify());
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = load(&[("SPREADSHEET_ID", "x"), ("GOOGLE_CREDENTIALS_JSON", "{}")]).unwrap_err();
        assert_matches!(err, ConfigError::Missing("TORN_API_KEY"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let err = load(&[
            ("TORN_API_KEY", "abc"),
            ("SPREADSHEET_ID", "  "),
            ("GOOGLE_CREDENTIALS_JSON", "{}"),
        ])
        .unwrap_err();
        assert_matches!(err, ConfigError::Missing("SPREADSHEET_ID"));
    }

    #[test]
    fn credentials_are_required() {
        let err = load(&[("TORN_API_KEY", "abc"), ("SPREADSHEET_ID", "x")]).unwrap_err();
        assert_matches!(err, ConfigError::NoCredentials);
    }

    #[test]
    fn webhook_enables_notification_by_default() {
        let cfg = load(&with(&[("DISCORD_WEBHOOK_URL", "https://discord.test/hook")])).unwrap();
        assert!(cfg.notify());
        assert!(cfg.provisioner_settings().notify);
    }

    #[test]
    fn notify_switch_overrides_webhook() {
        let cfg = load(&with(&[
            ("DISCORD_WEBHOOK_URL", "https://discord.test/hook"),
            ("NOTIFY_ENABLED", "false"),
        ]))
        .unwrap();
        assert!(!cfg.notify());
    }

    #[test]
    fn notify_without_webhook_stays_off() {
        let cfg = load(&with(&[("NOTIFY_ENABLED", "true")])).unwrap();
        assert!(!cfg.notify());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = load(&with(&[
            ("ANCHOR_WEEKDAY", "Friday"),
            ("KEEP_WEEKS", "3"),
            ("TABLE_CAPACITY_ROWS", "250"),
            ("HISTORY_DELAY_MS", "0"),
            ("SHEET_NAME_PREFIX", "Ledger"),
        ]))
        .unwrap();
        let settings = cfg.provisioner_settings();
        assert_eq!(settings.anchor, Weekday::Fri);
        assert_eq!(settings.keep, 3);
        assert_eq!(settings.capacity_rows, 250);
        assert_eq!(settings.history_delay, Duration::ZERO);
        assert_eq!(settings.prefix, "Ledger");
    }

    #[test]
    fn bad_number_names_the_variable() {
        let err = load(&with(&[("KEEP_WEEKS", "eight")])).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "KEEP_WEEKS", .. });
    }

    #[test]
    fn bad_weekday_is_rejected() {
        let err = load(&with(&[("ANCHOR_WEEKDAY", "someday")])).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "ANCHOR_WEEKDAY", .. });
    }

    #[test]
    fn capacity_must_hold_preamble() {
        let err = load(&with(&[("TABLE_CAPACITY_ROWS", "3")])).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "TABLE_CAPACITY_ROWS", .. });
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = load(&with(&[("REQUEST_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "REQUEST_TIMEOUT_SECS", .. });
    }

    #[test]
    fn debug_output_hides_api_key() {
        let cfg = load(BASE).unwrap();
        assert!(!format!("{cfg:?}").contains("abc123"));
    }

    // -----------------------------------------------------------------------
    // ExportConfig
    // -----------------------------------------------------------------------

    #[test]
    fn export_loads_without_torn_key() {
        let cfg = load_export(&[
            ("SPREADSHEET_ID", "sheet-123"),
            ("GOOGLE_CREDENTIALS_JSON", "{}"),
        ])
        .unwrap();
        assert_eq!(cfg.sheets.spreadsheet_id, "sheet-123");
        assert_eq!(cfg.sheets.credentials_json.as_deref(), Some("{}"));
        assert_eq!(cfg.sheet, "Random Wars Sample");
        assert_eq!(cfg.output, PathBuf::from("Data/random_wars_sample.json"));
    }

    #[test]
    fn export_overrides_are_parsed() {
        let cfg = load_export(&[
            ("SPREADSHEET_ID", "sheet-123"),
            ("GOOGLE_CREDENTIALS_PATH", "/secrets/sa.json"),
            ("EXPORT_SHEET_NAME", "Torn Wars Data - 2024-01-02"),
            ("EXPORT_OUTPUT", "out/week.json"),
        ])
        .unwrap();
        assert_eq!(cfg.sheet, "Torn Wars Data - 2024-01-02");
        assert_eq!(cfg.output, PathBuf::from("out/week.json"));
    }

    #[test]
    fn export_still_needs_spreadsheet_and_credentials() {
        assert_matches!(
            load_export(&[("GOOGLE_CREDENTIALS_JSON", "{}")]).unwrap_err(),
            ConfigError::Missing("SPREADSHEET_ID")
        );
        assert_matches!(
            load_export(&[("SPREADSHEET_ID", "sheet-123")]).unwrap_err(),
            ConfigError::NoCredentials
        );
    }
}
