//! In-process audit feed keyed by channel.

use crate::error::{Error, Result};
use crate::types::ChannelId;
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{AuditEntry, AuditFeedConfig, AuditHandle, AuditSink, SubscriberId};

/// Internal subscriber state.
struct Subscriber {
    channel: ChannelId,
    sender: Sender<AuditEntry>,
}

impl Subscriber {
    /// Returns false if the queue is full or the receiver is gone.
    fn try_send(&self, entry: AuditEntry) -> bool {
        self.sender.try_send(entry).is_ok()
    }
}

/// Broadcasts audit entries to subscribers of the target channel.
pub struct AuditFeed {
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    next_id: AtomicU64,
}

impl AuditFeed {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to entries sent to `channel`.
    pub fn subscribe(&self, channel: ChannelId, config: AuditFeedConfig) -> AuditHandle {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        self.subscribers
            .write()
            .insert(id, Subscriber { channel, sender });

        AuditHandle {
            id,
            channel,
            receiver,
        }
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().remove(&id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Deliver to every subscriber of `channel`. Drops subscribers that fail to
    /// receive. Returns the number of successful deliveries.
    fn broadcast(&self, channel: ChannelId, entry: &AuditEntry) -> usize {
        let mut delivered = 0;
        let mut to_remove = Vec::new();

        {
            let subs = self.subscribers.read();
            for (id, sub) in subs.iter().filter(|(_, s)| s.channel == channel) {
                if sub.try_send(entry.clone()) {
                    delivered += 1;
                } else {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscribers.write();
            for id in to_remove {
                subs.remove(&id);
                debug!(subscriber = id.0, channel = channel.0, "dropped audit subscriber");
            }
        }

        delivered
    }
}

impl Default for AuditFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSink for AuditFeed {
    fn notify(&self, channel: ChannelId, entry: &AuditEntry) -> Result<()> {
        if self.broadcast(channel, entry) == 0 {
            return Err(Error::ChannelUnavailable(channel));
        }
        Ok(())
    }
}
