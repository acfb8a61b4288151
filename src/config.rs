//! Startup configuration.

use crate::error::ConfigError;
use crate::store::{StoreConfig, DEFAULT_STATS_FILE};
use crate::types::{ChannelId, RoleId};
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const ADMIN_ROLE_ID_VAR: &str = "ADMIN_ROLE_ID";
pub const LOG_CHANNEL_ID_VAR: &str = "LOG_CHANNEL_ID";
pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
pub const STATS_FILE_VAR: &str = "GEM_STATS_FILE";

/// Process configuration, read once at startup and passed by reference.
#[derive(Clone)]
pub struct Config {
    /// Members holding this role may run admin commands.
    pub admin_role_id: RoleId,
    /// Channel receiving audit entries.
    pub log_channel_id: ChannelId,
    /// Platform access token.
    pub token: String,
    /// Ledger file.
    pub stats_path: PathBuf,
}

impl Config {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnv {
                    key: key.to_string(),
                })
        };

        Ok(Self {
            admin_role_id: RoleId(parse_id(ADMIN_ROLE_ID_VAR, require(ADMIN_ROLE_ID_VAR)?)?),
            log_channel_id: ChannelId(parse_id(LOG_CHANNEL_ID_VAR, require(LOG_CHANNEL_ID_VAR)?)?),
            token: require(TOKEN_VAR)?,
            stats_path: lookup(STATS_FILE_VAR)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATS_FILE)),
        })
    }

    /// Store configuration for the ledger file.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::at(self.stats_path.clone())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("admin_role_id", &self.admin_role_id)
            .field("log_channel_id", &self.log_channel_id)
            .field("token", &"<redacted>")
            .field("stats_path", &self.stats_path)
            .finish()
    }
}

fn parse_id(key: &str, value: String) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value,
    })
}
