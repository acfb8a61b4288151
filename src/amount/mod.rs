//! Human-friendly gem amounts.
//!
//! Admins type amounts the way they speak them: `10k`, `2.5m`, `1,000`,
//! `1b`. This module turns those into integers and renders integers back with
//! thousands separators for replies.

mod format;
mod parse;

pub use format::format_number;
pub use parse::{parse_amount, AmountArg};
