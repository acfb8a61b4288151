//! Audit notifications for administrative ledger adjustments.
//!
//! Every successful `log` or `removestats` produces an [`AuditEntry`] that is
//! sent to the configured log channel through an [`AuditSink`]. Delivery is
//! best effort: a missing channel is skipped, never an error for the command.
//!
//! [`AuditFeed`] is the in-process sink. Hosts subscribe per channel and drain
//! entries from a bounded queue:
//!
//! ```ignore
//! let feed = AuditFeed::new();
//! let handle = feed.subscribe(config.log_channel_id, AuditFeedConfig::default());
//!
//! while let Ok(entry) = handle.try_recv() {
//!     post_to_channel(&entry);
//! }
//! ```

mod feed;
mod types;

pub use feed::AuditFeed;
pub use types::{AdjustmentKind, AuditEntry, AuditFeedConfig, AuditHandle, AuditSink, SubscriberId};
