//! Fanout of `notify.message` to matching subscribers.

use crate::bencode::{length_prefix_size, DictProducer};
use crate::subscriptions::Subscription;
use crate::transport::{Destination, NOTIFY_COMMAND};
use crate::types::{Message, Timestamp, ACCOUNT_KEY_SIZE};
use tracing::trace;

use super::Monitor;

/// Worst-case encoded size of the metadata-only notification for a hash of
/// `hash_len` bytes.
///
/// Keys are written in order: `@` account, `h` hash, `n` namespace,
/// `t` timestamp, `z` expiry, then `~` data when requested.
const fn metadata_size(hash_len: usize) -> usize {
    2 // d...e
    + 3 + length_prefix_size(ACCOUNT_KEY_SIZE) + ACCOUNT_KEY_SIZE // 1:@ 33:...
    + 3 + length_prefix_size(hash_len) + hash_len // 1:h 43:...
    + 3 * (3 + MAX_INT_FIELD) // 1:n 1:t 1:z
}

/// `i-9223372036854775808e`
const MAX_INT_FIELD: usize = 22;

fn data_field_size(len: usize) -> usize {
    3 + length_prefix_size(len) + len
}

/// Number of notifications sent, by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NotifySummary {
    pub metadata_only: usize,
    pub with_data: usize,
}

impl NotifySummary {
    pub fn total(&self) -> usize {
        self.metadata_only + self.with_data
    }
}

fn destinations(sub: &Subscription) -> impl Iterator<Item = Destination> {
    sub.push_channel
        .map(Destination::Push)
        .into_iter()
        .chain(sub.stream_channel.map(Destination::Stream))
}

fn write_metadata(d: &mut DictProducer, msg: &Message) {
    d.append_bytes("@", msg.account.as_bytes());
    d.append_str("h", msg.hash.as_str());
    d.append_int("n", i64::from(msg.namespace.0));
    d.append_int("t", msg.timestamp.as_millis());
    d.append_int("z", msg.expiry.as_millis());
}

impl Monitor {
    /// Notify every live subscription watching `msg`'s account and namespace.
    pub fn send_notifies(&self, msg: &Message) -> NotifySummary {
        self.send_notifies_at(msg, Timestamp::now())
    }

    /// Like [`send_notifies`](Self::send_notifies) with an explicit clock.
    ///
    /// Subscriptions whose expiry is before `now` are skipped. The registry
    /// read lock is released before anything is encoded or sent.
    pub fn send_notifies_at(&self, msg: &Message, now: Timestamp) -> NotifySummary {
        let mut relay_to = Vec::new();
        let mut relay_to_with_data = Vec::new();
        {
            let registry = self.registry.read();
            for sub in registry.find_all(&msg.account) {
                if sub.is_live(now) && sub.watches(msg.namespace) {
                    let group = if sub.want_data {
                        &mut relay_to_with_data
                    } else {
                        &mut relay_to
                    };
                    group.extend(destinations(sub));
                }
            }
        }

        if relay_to.is_empty() && relay_to_with_data.is_empty() {
            return NotifySummary::default();
        }

        let data = msg.data.as_deref().unwrap_or_default();
        let metadata = metadata_size(msg.hash.as_str().len());
        let capacity = if relay_to_with_data.is_empty() {
            metadata
        } else {
            metadata + data_field_size(data.len())
        };
        let mut d = DictProducer::with_capacity(capacity);
        write_metadata(&mut d, msg);

        for dest in &relay_to {
            self.transport.send(dest, NOTIFY_COMMAND, d.view());
        }

        if !relay_to_with_data.is_empty() {
            d.append_bytes("~", data);
            for dest in &relay_to_with_data {
                self.transport.send(dest, NOTIFY_COMMAND, d.view());
            }
        }

        trace!(
            account = %msg.account,
            namespace = %msg.namespace,
            metadata_only = relay_to.len(),
            with_data = relay_to_with_data.len(),
            "sent message notifications"
        );

        NotifySummary {
            metadata_only: relay_to.len(),
            with_data: relay_to_with_data.len(),
        }
    }
}
