pub mod args;

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use fancy_regex::Regex;

use crate::types::PersonalAccessToken;

const ERROR_MESSAGE_INVALID_AGE_WINDOW: &str =
    "--max-age-days has to be greater than --min-age-days.";
const ERROR_MESSAGE_AGE_OUT_OF_RANGE: &str = "age in days is out of range:";

/// Main configuration for artifact-sweep.
///
/// Built from [`CLIArgs`](args::CLIArgs) through `TryFrom`, which performs all
/// validation that can happen before contacting Azure DevOps.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub tracing_config: Option<TracingConfig>,
    pub command: Command,
}

/// The operation selected on the command line.
#[derive(Debug, Clone)]
pub enum Command {
    Scan(ScanConfig),
    Delete(DeleteConfig),
}

/// Organization URL and optional token. When the token is absent it is
/// prompted for right before connecting.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub url: String,
    pub pat: Option<PersonalAccessToken>,
}

/// Settings of the `scan` command.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub project: String,
    pub definition_id: u32,
    pub filter_config: FilterConfig,
    pub age_window: AgeWindow,
    pub out_csv: PathBuf,
}

/// Settings of the `delete` command.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    pub in_csv: PathBuf,
    pub dry_run: bool,
}

/// Tracing (logging) configuration.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    pub tracing_level: log::Level,
    pub json_tracing: bool,
    pub http_tracing: bool,
    pub disable_color_tracing: bool,
}

/// Patterns applied to container items.
///
/// `path_regex` is tested against the full item path, `filename_regex`
/// against its last segment. Both must match when both are set.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub path_regex: Option<Regex>,
    pub filename_regex: Option<Regex>,
}

impl FilterConfig {
    pub fn has_any_pattern(&self) -> bool {
        self.path_regex.is_some() || self.filename_regex.is_some()
    }
}

/// Queue time bounds of the builds to scan. An absent bound is open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeWindow {
    pub min_time: Option<DateTime<Utc>>,
    pub max_time: Option<DateTime<Utc>>,
}

impl AgeWindow {
    /// Resolve build ages in days into absolute bounds relative to `now`.
    ///
    /// The larger age produces the earlier bound: `min_time` comes from
    /// `max_age_days` and `max_time` from `min_age_days`.
    pub fn from_age_days(
        min_age_days: Option<u32>,
        max_age_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<Self, String> {
        let min_time = max_age_days
            .map(|days| days_before(now, days))
            .transpose()?;
        let max_time = min_age_days
            .map(|days| days_before(now, days))
            .transpose()?;

        if let (Some(min_time), Some(max_time)) = (min_time, max_time) {
            if max_time <= min_time {
                return Err(ERROR_MESSAGE_INVALID_AGE_WINDOW.to_string());
            }
        }

        Ok(Self { min_time, max_time })
    }
}

fn days_before(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, String> {
    Duration::try_days(i64::from(days))
        .and_then(|age| now.checked_sub_signed(age))
        .ok_or_else(|| format!("{ERROR_MESSAGE_AGE_OUT_OF_RANGE} {days}"))
}
