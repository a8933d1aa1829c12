use std::{collections::HashMap, fs, path::Path, str::FromStr};

use anyhow::anyhow;
use serde::Serialize;
use shared::error::DispatchError;
use tracing::warn;

pub const SETTINGS_FILE: &str = "dispatch.toml";
pub const DEFAULT_POOL_CAPACITY: usize = 64;

const KEYS: [&str; 4] = [
    "pooling_enabled",
    "pool_capacity",
    "failure_policy",
    "log_filter",
];

/// What a broadcast does when an observer returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the fan-out at the first failing observer.
    #[default]
    Abort,
    /// Invoke every observer, then report the failures.
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = DispatchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            _ => Err(DispatchError::InvalidSetting {
                key: "failure_policy".into(),
                value: value.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub pooling_enabled: bool,
    pub pool_capacity: usize,
    pub failure_policy: FailurePolicy,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pooling_enabled: true,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            failure_policy: FailurePolicy::Abort,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    /// Sets one field from its textual form. Leaves the settings untouched on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), DispatchError> {
        let invalid = || DispatchError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "pooling_enabled" => self.pooling_enabled = parse_bool(value).ok_or_else(invalid)?,
            "pool_capacity" => self.pool_capacity = value.trim().parse().map_err(|_| invalid())?,
            "failure_policy" => self.failure_policy = value.parse()?,
            "log_filter" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(invalid());
                }
                self.log_filter = value.to_string();
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Reads a flat table of settings. Non-string values are taken in their TOML spelling.
pub fn read_settings_file(path: &Path) -> Result<HashMap<String, String>, DispatchError> {
    let config_error = |source: anyhow::Error| DispatchError::Config {
        path: path.display().to_string(),
        source,
    };
    let raw = fs::read_to_string(path).map_err(|e| config_error(e.into()))?;
    let table = toml::from_str::<HashMap<String, toml::Value>>(&raw).map_err(|e| config_error(e.into()))?;
    table
        .into_iter()
        .map(|(key, value)| match value {
            toml::Value::String(s) => Ok((key, s)),
            toml::Value::Integer(_) | toml::Value::Boolean(_) => Ok((key, value.to_string())),
            other => Err(config_error(anyhow!(
                "unsupported value for '{key}': {}",
                other.type_str()
            ))),
        })
        .collect()
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then `path` if it exists, then `DISPATCH_<KEY>` and `APP__<KEY>` from `env`.
///
/// Bad input is logged and skipped so startup always gets usable settings.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if path.exists() {
        match read_settings_file(path) {
            Ok(file_cfg) => {
                for (key, value) in &file_cfg {
                    if let Err(error) = settings.apply(key, value) {
                        warn!(path = %path.display(), %error, "ignoring config file entry");
                    }
                }
            }
            Err(error) => warn!(%error, "ignoring unreadable config file"),
        }
    }

    for key in KEYS {
        let upper = key.to_ascii_uppercase();
        for var in [format!("DISPATCH_{upper}"), format!("APP__{upper}")] {
            let Some(value) = env(&var) else {
                continue;
            };
            if let Err(error) = settings.apply(key, &value) {
                warn!(%var, %error, "ignoring environment override");
            }
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
