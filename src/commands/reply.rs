//! Replies returned to the invoking user.

use crate::amount::format_number;
use crate::audit::AdjustmentKind;
use crate::error::Error;
use crate::types::{UserId, UserRef};
use serde::Serialize;
use std::fmt;

/// Why a command was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Unauthorized,
    InvalidFormat,
    /// `removestats` variant of `InvalidFormat`, with its own examples.
    InvalidRemovalFormat,
    InvalidAmount,
    InsufficientBalance,
    TotalOverflow,
    StorageUnavailable,
}

impl Rejection {
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Unauthorized => Rejection::Unauthorized,
            Error::InvalidFormat(_) => Rejection::InvalidFormat,
            Error::InvalidAmount(_) => Rejection::InvalidAmount,
            Error::InsufficientBalance { .. } => Rejection::InsufficientBalance,
            Error::TotalOverflow { .. } => Rejection::TotalOverflow,
            Error::StorageUnavailable(_)
            | Error::Locked
            | Error::ChannelUnavailable(_)
            | Error::Config(_) => Rejection::StorageUnavailable,
        }
    }

    /// User-facing message.
    pub fn message(self) -> &'static str {
        match self {
            Rejection::Unauthorized => "❌ You need admin permissions to use this command.",
            Rejection::InvalidFormat => {
                "❌ Invalid amount format. Use numbers or suffixes like k, m, b (e.g., 10k, 5m, 1b)."
            }
            Rejection::InvalidRemovalFormat => {
                "❌ Invalid amount format. Use numbers or suffixes like k, m, b (e.g., 5m, 1b)."
            }
            Rejection::InvalidAmount => "❌ Amount must be a positive number.",
            Rejection::InsufficientBalance => "❌ Cannot remove more gems than the user has.",
            Rejection::TotalOverflow => "❌ That amount would push the user's total past the largest supported value.",
            Rejection::StorageUnavailable => {
                "❌ Gem stats are unavailable right now. Please try again later."
            }
        }
    }
}

/// Reply payload for the invoking user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    /// `stats`: the caller's own total.
    OwnStats { user: UserRef, total: i64 },

    /// `adminstats`: another user's total.
    AdminStats {
        target: UserRef,
        total: i64,
        requested_by: UserRef,
    },

    /// `log` / `removestats` confirmation.
    Adjusted {
        kind: AdjustmentKind,
        target: UserRef,
        amount: i64,
        new_total: i64,
        admin: UserRef,
    },

    Rejected { rejection: Rejection },
}

impl Reply {
    pub fn rejected(rejection: Rejection) -> Self {
        Reply::Rejected { rejection }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Reply::Rejected { .. })
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Reply::Rejected { rejection } => Some(*rejection),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Reply::OwnStats { .. } => "💎 Your Gem Stats",
            Reply::AdminStats { .. } => "💎 Admin Gem Stats",
            Reply::Adjusted {
                kind: AdjustmentKind::Logged,
                ..
            } => "✅ Gems Logged Successfully",
            Reply::Adjusted {
                kind: AdjustmentKind::Removed,
                ..
            } => "✅ Gems Removed Successfully",
            Reply::Rejected { .. } => "❌ Rejected",
        }
    }

    /// Avatar shown next to the reply, if any.
    pub fn thumbnail(&self) -> Option<&str> {
        match self {
            Reply::OwnStats { user, .. } => user.avatar_url.as_deref(),
            Reply::AdminStats { target, .. } => target.avatar_url.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::OwnStats { total, .. } => {
                writeln!(f, "{}", self.title())?;
                writeln!(f, "Total Gems Given: {} 💎", format_number(*total))?;
                write!(f, "Keep up the good work!")
            }
            Reply::AdminStats {
                target,
                total,
                requested_by,
            } => {
                writeln!(f, "{}", self.title())?;
                writeln!(f, "**{}**'s donation history", target.name)?;
                writeln!(f, "Total Gems Given: {} 💎", format_number(*total))?;
                write!(f, "Requested by {}", requested_by.name)
            }
            Reply::Adjusted {
                kind,
                target,
                amount,
                new_total,
                admin,
            } => {
                let (amount_label, footer) = match kind {
                    AdjustmentKind::Logged => ("Amount Added", "Logged by"),
                    AdjustmentKind::Removed => ("Amount Removed", "Updated by"),
                };
                writeln!(f, "{}", self.title())?;
                writeln!(f, "User: {}", target.name)?;
                writeln!(f, "{}: {} 💎", amount_label, format_number(*amount))?;
                writeln!(f, "New Total: {} 💎", format_number(*new_total))?;
                write!(f, "{} {}", footer, admin.name)
            }
            Reply::Rejected { rejection } => f.write_str(rejection.message()),
        }
    }
}

/// Response channel back to the invoking user.
pub trait Responder {
    fn respond(&self, actor: &UserId, reply: &Reply, private: bool);
}
