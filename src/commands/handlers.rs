//! Command handlers.

use crate::amount::AmountArg;
use crate::audit::{AdjustmentKind, AuditEntry, AuditSink};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::LedgerStore;
use crate::types::{Member, UserRef};
use tracing::{debug, error, warn};

use super::reply::{Rejection, Reply, Responder};

/// A parsed slash command invocation.
pub enum Command<'m> {
    /// `/stats`
    Stats,
    /// `/log user amount`
    Log {
        user: &'m dyn Member,
        amount: AmountArg,
    },
    /// `/removestats user amount`
    RemoveStats {
        user: &'m dyn Member,
        amount: AmountArg,
    },
    /// `/adminstats user`
    AdminStats { user: &'m dyn Member },
}

impl Command<'_> {
    /// Slash command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Stats => "stats",
            Command::Log { .. } => "log",
            Command::RemoveStats { .. } => "removestats",
            Command::AdminStats { .. } => "adminstats",
        }
    }
}

/// Result of a handled command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Private reply for the invoking user.
    pub reply: Reply,
    /// Entry for the audit log channel, on committed adjustments only.
    pub audit: Option<AuditEntry>,
}

impl Outcome {
    fn reply(reply: Reply) -> Self {
        Self { reply, audit: None }
    }
}

/// Runs gem commands against a ledger store.
pub struct CommandHandlers<'a> {
    config: &'a Config,
    store: &'a LedgerStore,
}

impl<'a> CommandHandlers<'a> {
    pub fn new(config: &'a Config, store: &'a LedgerStore) -> Self {
        Self { config, store }
    }

    pub fn is_admin(&self, actor: &dyn Member) -> bool {
        actor.has_role(self.config.admin_role_id)
    }

    /// Run `command`, send the reply privately to `actor`, and forward any
    /// audit entry to the log channel. Audit delivery failures are skipped.
    pub fn dispatch(
        &self,
        actor: &dyn Member,
        command: Command<'_>,
        responder: &dyn Responder,
        sink: &dyn AuditSink,
    ) -> Reply {
        let outcome = self.run(actor, command);

        responder.respond(&actor.id(), &outcome.reply, true);

        if let Some(entry) = &outcome.audit {
            if let Err(e) = sink.notify(self.config.log_channel_id, entry) {
                debug!(error = %e, "skipped audit notification");
            }
        }

        outcome.reply
    }

    /// Run `command` without delivering anything.
    pub fn run(&self, actor: &dyn Member, command: Command<'_>) -> Outcome {
        let name = command.name();
        let result = match command {
            Command::Stats => self.query_own_stats(actor),
            Command::Log { user, amount } => self.record_donation(actor, user, &amount),
            Command::RemoveStats { user, amount } => self.remove_donation(actor, user, &amount),
            Command::AdminStats { user } => self.query_other_stats(actor, user),
        };

        result.unwrap_or_else(|e| reject(name, actor, e))
    }

    /// `/log`: add `amount` to `target`'s total.
    pub fn record_donation(
        &self,
        actor: &dyn Member,
        target: &dyn Member,
        amount: &AmountArg,
    ) -> Result<Outcome> {
        self.adjust(AdjustmentKind::Logged, actor, target, amount)
    }

    /// `/removestats`: subtract `amount` from `target`'s total.
    ///
    /// The balance check happens inside the store's atomic adjust.
    pub fn remove_donation(
        &self,
        actor: &dyn Member,
        target: &dyn Member,
        amount: &AmountArg,
    ) -> Result<Outcome> {
        self.adjust(AdjustmentKind::Removed, actor, target, amount)
    }

    /// `/stats`: the caller's own total.
    pub fn query_own_stats(&self, actor: &dyn Member) -> Result<Outcome> {
        let entry = self.store.get(&actor.id())?;
        Ok(Outcome::reply(Reply::OwnStats {
            user: UserRef::of(actor),
            total: entry.gems_given,
        }))
    }

    /// `/adminstats`: another user's total.
    pub fn query_other_stats(&self, actor: &dyn Member, target: &dyn Member) -> Result<Outcome> {
        self.authorize(actor)?;
        let entry = self.store.get(&target.id())?;
        Ok(Outcome::reply(Reply::AdminStats {
            target: UserRef::of(target),
            total: entry.gems_given,
            requested_by: UserRef::of(actor),
        }))
    }

    fn authorize(&self, actor: &dyn Member) -> Result<()> {
        if self.is_admin(actor) {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    fn adjust(
        &self,
        kind: AdjustmentKind,
        actor: &dyn Member,
        target: &dyn Member,
        amount: &AmountArg,
    ) -> Result<Outcome> {
        self.authorize(actor)?;

        let amount = amount.resolve()?;
        if amount <= 0 {
            return Err(Error::InvalidAmount(amount));
        }

        let delta = match kind {
            AdjustmentKind::Logged => amount,
            AdjustmentKind::Removed => -amount,
        };
        let new_total = self.store.adjust(&target.id(), delta)?;

        let target = UserRef::of(target);
        let admin = UserRef::of(actor);

        Ok(Outcome {
            reply: Reply::Adjusted {
                kind,
                target: target.clone(),
                amount,
                new_total,
                admin: admin.clone(),
            },
            audit: Some(AuditEntry {
                kind,
                target,
                amount,
                new_total,
                admin,
            }),
        })
    }
}

fn reject(command: &str, actor: &dyn Member, e: Error) -> Outcome {
    let actor = actor.id();
    match &e {
        e if e.is_operational() => {
            error!(command, actor = %actor, error = %e, "command failed");
        }
        Error::InsufficientBalance { .. } | Error::TotalOverflow { .. } => {
            warn!(command, actor = %actor, error = %e, "command rejected");
        }
        _ => {
            debug!(command, actor = %actor, error = %e, "command rejected");
        }
    }
    let rejection = match Rejection::from_error(&e) {
        Rejection::InvalidFormat if command == "removestats" => Rejection::InvalidRemovalFormat,
        rejection => rejection,
    };
    Outcome::reply(Reply::rejected(rejection))
}
