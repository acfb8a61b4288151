//! Audit entry and sink types.

use crate::amount::format_number;
use crate::error::Result;
use crate::types::{ChannelId, UserRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Footer shown on every audit entry.
pub const AUDIT_FOOTER: &str = "Gem Tracking System";

/// Direction of an administrative adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Logged,
    Removed,
}

impl AdjustmentKind {
    /// Title of the audit entry in the log channel.
    pub fn audit_title(self) -> &'static str {
        match self {
            AdjustmentKind::Logged => "💎 Gem Donation Logged",
            AdjustmentKind::Removed => "💎 Gems Removed",
        }
    }
}

/// Record of one committed adjustment, sent to the log channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub kind: AdjustmentKind,
    /// User whose total changed.
    pub target: UserRef,
    /// Positive amount added or removed.
    pub amount: i64,
    /// Target's total after the adjustment.
    pub new_total: i64,
    /// Admin who ran the command.
    pub admin: UserRef,
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (target_label, amount_label) = match self.kind {
            AdjustmentKind::Logged => ("Donor", "Amount"),
            AdjustmentKind::Removed => ("User", "Amount Removed"),
        };
        writeln!(f, "{}", self.kind.audit_title())?;
        writeln!(f, "{}: {}", target_label, self.target.name)?;
        writeln!(f, "{}: {} 💎", amount_label, format_number(self.amount))?;
        writeln!(f, "Total Donated: {} 💎", format_number(self.new_total))?;
        writeln!(f, "Admin: {}", self.admin.name)?;
        write!(f, "{}", AUDIT_FOOTER)
    }
}

/// Destination for audit entries.
pub trait AuditSink {
    /// Deliver `entry` to `channel`. Fails with `ChannelUnavailable` if the
    /// channel cannot be reached; callers skip such failures.
    fn notify(&self, channel: ChannelId, entry: &AuditEntry) -> Result<()>;
}

/// Configuration for an audit feed subscription.
#[derive(Clone, Debug)]
pub struct AuditFeedConfig {
    /// Max buffered entries before the subscriber is dropped.
    /// Default: 256
    pub buffer_size: usize,
}

impl Default for AuditFeedConfig {
    fn default() -> Self {
        Self { buffer_size: 256 }
    }
}

/// Unique identifier for a feed subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Handle to receive audit entries for one channel.
pub struct AuditHandle {
    pub id: SubscriberId,
    pub channel: ChannelId,
    /// Channel to receive entries.
    pub receiver: crossbeam_channel::Receiver<AuditEntry>,
}

impl AuditHandle {
    /// Receive the next entry (blocking).
    pub fn recv(&self) -> std::result::Result<AuditEntry, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an entry (non-blocking).
    pub fn try_recv(&self) -> std::result::Result<AuditEntry, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> std::result::Result<AuditEntry, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything currently queued.
    pub fn drain(&self) -> Vec<AuditEntry> {
        self.receiver.try_iter().collect()
    }
}
