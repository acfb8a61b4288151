//! Slash command orchestration.
//!
//! Each command follows the same path: authorize, parse the amount, validate
//! it, adjust the ledger, format the reply, and notify the audit sink. Every
//! failure along the way ends as a [`Reply::Rejected`]; nothing escapes to the
//! platform's event dispatch.

mod handlers;
mod reply;

pub use handlers::{Command, CommandHandlers, Outcome};
pub use reply::{Rejection, Reply, Responder};
