//! Core types for the gem ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-assigned user identifier.
///
/// Stored as a string so that ledger keys match the persisted JSON object keys
/// exactly. Numeric platform ids convert via `From<u64>`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        UserId(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId(id)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform role identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub u64);

impl fmt::Debug for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoleId({})", self.0)
    }
}

/// Platform channel identifier (audit log target).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelId({})", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-user ledger entry, as persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub gems_given: i64,

    /// Fields written by other tools, kept across rewrites.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LedgerEntry {
    pub fn new(gems_given: i64) -> Self {
        Self {
            gems_given,
            ..Default::default()
        }
    }
}

/// The narrow view of a platform user that command handlers consume.
pub trait Member {
    fn id(&self) -> UserId;

    fn display_name(&self) -> &str;

    fn avatar_url(&self) -> Option<&str>;

    /// Role membership predicate. Users outside a guild have no roles.
    fn has_role(&self, role: RoleId) -> bool;
}

/// Owned identity snapshot of a [`Member`], carried in replies and audit entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl UserRef {
    pub fn of(member: &dyn Member) -> Self {
        Self {
            id: member.id(),
            name: member.display_name().to_string(),
            avatar_url: member.avatar_url().map(str::to_string),
        }
    }
}

/// Simple owned [`Member`] implementation for hosts that already resolved the
/// user's roles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    pub id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub roles: Vec<RoleId>,
}

impl MemberInfo {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: RoleId) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

impl Member for MemberInfo {
    fn id(&self) -> UserId {
        self.id.clone()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }
}
