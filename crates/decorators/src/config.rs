//! Tap decorator configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::tap::TapMode;

/// Environment variable selecting the tap mode (`sequential` / `parallel`).
pub const TAP_MODE_ENV: &str = "REPOKIT_TAP_MODE";

/// Environment variable toggling the warning log for swallowed tap failures.
pub const TAP_LOG_FAILURES_ENV: &str = "REPOKIT_TAP_LOG_FAILURES";

/// Construction-time settings for tap decorators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapConfig {
    pub mode: TapMode,
    /// Emit a `WARN` event for every swallowed tap failure.
    pub log_failures: bool,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            mode: TapMode::Sequential,
            log_failures: true,
        }
    }
}

impl TapConfig {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel() -> Self {
        Self {
            mode: TapMode::Parallel,
            ..Self::default()
        }
    }

    /// Read settings from the process environment.
    ///
    /// Unknown or malformed values fall back to the defaults (with a warning).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TapConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(TAP_MODE_ENV) {
            match raw.parse::<TapMode>() {
                Ok(mode) => config.mode = mode,
                Err(err) => {
                    warn!(
                        variable = TAP_MODE_ENV,
                        value = %raw,
                        error = %err,
                        "ignoring tap mode"
                    );
                }
            }
        }

        if let Some(raw) = lookup(TAP_LOG_FAILURES_ENV) {
            match parse_flag(&raw) {
                Some(enabled) => config.log_failures = enabled,
                None => {
                    warn!(
                        variable = TAP_LOG_FAILURES_ENV,
                        value = %raw,
                        "ignoring non-boolean flag"
                    );
                }
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
