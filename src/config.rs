//! Configuration module
//!
//! `AppConfig` is read from a TOML file (default
//! `~/.config/parking-service/config.toml`). Every section is optional and
//! falls back to the built-in six-floor building and default tariff.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{RegisterUser, SlotGroup, Tariff, UserClass};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parking-service")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub tariff: Tariff,
    pub layout: LayoutConfig,
    pub analytics: AnalyticsConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error` (or any `EnvFilter` directive).
    pub level: String,
    /// `text` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Groups in id order; ids are assigned sequentially from 1.
    pub floors: Vec<SlotGroup>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            floors: SlotGroup::default_layout(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Local offset from UTC used for hour-of-day buckets and displayed times.
    pub utc_offset_minutes: i32,
}

impl AnalyticsConfig {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "utc_offset_minutes {} is out of range",
                    self.utc_offset_minutes
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoUser {
    pub plate: String,
    pub name: String,
    pub class: UserClass,
    pub billing_id: String,
}

impl From<&DemoUser> for RegisterUser {
    fn from(user: &DemoUser) -> Self {
        RegisterUser::new(&user.plate, &user.name, user.class, &user.billing_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Register `users` at startup.
    pub seed_users: bool,
    pub users: Vec<DemoUser>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let user = |plate: &str, name: &str, class, billing_id: &str| DemoUser {
            plate: plate.to_string(),
            name: name.to_string(),
            class,
            billing_id: billing_id.to_string(),
        };
        Self {
            seed_users: true,
            users: vec![
                user("MH01AA1111", "Bhuban W.", UserClass::Resident, "Apt 5B"),
                user("MH02BB2222", "Mayur N.", UserClass::Hotel, "Room 301"),
                user("MH03CC3333", "Aditya S.", UserClass::Staff, "Building Staff"),
            ],
        }
    }
}

impl AppConfig {
    /// Load and validate the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tariff
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.layout.floors.iter().all(|g| g.slots == 0) {
            return Err(ConfigError::Invalid(
                "layout must contain at least one slot".to_string(),
            ));
        }
        self.analytics.offset()?;
        Ok(())
    }
}
