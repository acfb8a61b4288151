//! # Gem Ledger
//!
//! Tracks how many gems each user has given away, adjusted by admins through
//! slash commands and persisted to a flat JSON file.
//!
//! ## Core Concepts
//!
//! - **Amounts**: human shorthand (`10k`, `2.5m`, `1,000`) parsed to integers,
//!   and integers rendered with thousands separators
//! - **Ledger**: a whole-file JSON mapping of user id to `gems_given`, adjusted
//!   atomically under a single-writer lock
//! - **Commands**: `stats`, `log`, `removestats`, `adminstats`, each ending in
//!   a private reply and, for adjustments, an audit entry
//! - **Audit feed**: per-channel delivery of audit entries
//!
//! ## Example
//!
//! ```ignore
//! use gem_ledger::{AmountArg, AuditFeed, Command, CommandHandlers, Config, LedgerStore};
//!
//! let config = Config::from_env()?;
//! let store = LedgerStore::open(config.store_config())?;
//! let feed = AuditFeed::new();
//! let handlers = CommandHandlers::new(&config, &store);
//!
//! let reply = handlers.dispatch(
//!     &admin,
//!     Command::Log { user: &donor, amount: AmountArg::from("10k") },
//!     &responder,
//!     &feed,
//! );
//! ```

pub mod amount;
pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

// Re-exports
pub use amount::{format_number, parse_amount, AmountArg};
pub use audit::{
    AdjustmentKind, AuditEntry, AuditFeed, AuditFeedConfig, AuditHandle, AuditSink, SubscriberId,
};
pub use commands::{Command, CommandHandlers, Outcome, Rejection, Reply, Responder};
pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use store::{LedgerSnapshot, LedgerStore, StoreConfig, DEFAULT_STATS_FILE};
pub use types::*;
