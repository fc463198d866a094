use std::str::FromStr;

use thiserror::Error;

use crate::pairing::FilterConfig;

pub const DEFAULT_CUTOFF_HOUR: u32 = 0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be an hour between 0 and 23, got `{value}`")]
    InvalidHour { key: &'static str, value: String },

    #[error("{key} must be a boolean, got `{value}`")]
    InvalidBool { key: &'static str, value: String },

    #[error("{key} must be one of {expected}, got `{value}`")]
    InvalidChoice {
        key: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} is required")]
    Missing(&'static str),
}

/// Reply language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    SimplifiedChinese,
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Self::English),
            "zh" | "zh-cn" | "zh_cn" => Ok(Self::SimplifiedChinese),
            _ => Err(()),
        }
    }
}

/// Which assignment backend to run with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Postgres { database_url: String },
}

/// Runtime settings for the wife command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WifeConfig {
    /// Local hour (0-23) at which the day's assignments expire.
    pub cutoff_hour: u32,
    pub filter: FilterConfig,
    pub locale: Locale,
    pub storage: StorageConfig,
}

impl Default for WifeConfig {
    fn default() -> Self {
        Self {
            cutoff_hour: DEFAULT_CUTOFF_HOUR,
            filter: FilterConfig::default(),
            locale: Locale::default(),
            storage: StorageConfig::Memory,
        }
    }
}

impl WifeConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup. Unset keys fall back to
    /// their defaults; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let cutoff_hour = match get("WIFE_CUTOFF_HOUR") {
            Some(raw) => parse_hour("WIFE_CUTOFF_HOUR", &raw)?,
            None => DEFAULT_CUTOFF_HOUR,
        };

        let flag = |key: &'static str| -> Result<bool, ConfigError> {
            get(key).map_or(Ok(false), |raw| parse_bool(key, &raw))
        };

        let filter = FilterConfig {
            allow_self_as_target: flag("WIFE_ALLOW_SELF_AS_TARGET")?,
            allow_reuse_of_assignee: flag("WIFE_ALLOW_REUSE_OF_ASSIGNEE")?,
            allow_bot_accounts: flag("WIFE_ALLOW_BOT_ACCOUNTS")?,
            allow_bot_self_account: flag("WIFE_ALLOW_BOT_SELF_ACCOUNT")?,
        };

        let locale = match get("WIFE_LOCALE") {
            Some(raw) => raw.parse().map_err(|()| ConfigError::InvalidChoice {
                key: "WIFE_LOCALE",
                expected: "`en`, `zh-CN`",
                value: raw,
            })?,
            None => Locale::default(),
        };

        let storage = match get("WIFE_STORAGE").as_deref().map(str::to_ascii_lowercase) {
            None => StorageConfig::Memory,
            Some(kind) if kind == "memory" => StorageConfig::Memory,
            Some(kind) if kind == "postgres" => StorageConfig::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some(kind) => {
                return Err(ConfigError::InvalidChoice {
                    key: "WIFE_STORAGE",
                    expected: "`memory`, `postgres`",
                    value: kind,
                });
            }
        };

        Ok(Self {
            cutoff_hour,
            filter,
            locale,
            storage,
        })
    }
}

fn parse_hour(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.parse::<u32>()
        .ok()
        .filter(|hour| *hour < 24)
        .ok_or_else(|| ConfigError::InvalidHour {
            key,
            value: raw.to_owned(),
        })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_owned(),
        }),
    }
}
