//! Error types for the gem ledger.

use crate::types::{ChannelId, UserId};
use thiserror::Error;

/// Main error type for ledger and command operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid amount format: {0:?}")]
    InvalidFormat(String),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Insufficient balance for {user}: requested {requested}, available {available}")]
    InsufficientBalance {
        user: UserId,
        requested: i64,
        available: i64,
    },

    #[error("Adding {delta} to {user}'s total of {current} exceeds the largest supported amount")]
    TotalOverflow {
        user: UserId,
        delta: i64,
        current: i64,
    },

    #[error("Admin capability required")]
    Unauthorized,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Ledger is locked by another process")]
    Locked,

    #[error("Audit channel unavailable: {0}")]
    ChannelUnavailable(ChannelId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether this error reflects an operational failure rather than bad input.
    pub fn is_operational(&self) -> bool {
        matches!(self, Error::StorageUnavailable(_) | Error::Locked)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::StorageUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::StorageUnavailable(e.to_string())
    }
}

/// Startup configuration errors. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {key}")]
    MissingEnv { key: String },

    #[error("invalid value for environment variable {key}: {value:?}")]
    InvalidEnv { key: String, value: String },
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;
