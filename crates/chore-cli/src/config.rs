//! Layered configuration for the `chores` binary.
//!
//! Sources, highest priority first:
//! 1. `--store` on the command line (applied by the caller)
//! 2. Environment variables with the `CHORES_` prefix (`CHORES_STORE_PATH`, `CHORES_TIMEZONE`)
//! 3. `./chores.toml` in the working directory
//! 4. `<config dir>/chores/config.toml`
//! 5. Built-in defaults

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChoresConfig {
    /// JSON file holding chores and categories.
    pub store_path: PathBuf,
    /// IANA zone deciding which calendar date is "today". `None` uses the
    /// system's local date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for ChoresConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            timezone: None,
        }
    }
}

impl ChoresConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config: Self = Self::figment()
            .extract()
            .context("failed to load configuration")?;
        config.timezone()?;
        Ok(config)
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from("chores.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("CHORES_").only(&["store_path", "timezone"]))
    }

    /// The configured zone, validated.
    pub fn timezone(&self) -> anyhow::Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>().map_err(|_| {
                    anyhow::anyhow!("invalid configuration value for 'timezone': '{name}'")
                })
            })
            .transpose()
    }

    /// Today's wall-clock date in the configured zone.
    pub fn today(&self) -> anyhow::Result<NaiveDate> {
        Ok(match self.timezone()? {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        })
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("chores").join("config.toml"))
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chores")
        .join("tasks.json")
}
