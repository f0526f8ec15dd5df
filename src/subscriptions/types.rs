//! Subscription records and the descriptors that create them.

use crate::types::{AccountKey, Channels, NamespaceId, PushChannel, StreamChannel, Timestamp};

/// A parsed `monitor.messages` element: what one account wants to watch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub account: AccountKey,
    /// Sorted ascending, no duplicates.
    pub namespaces: Vec<NamespaceId>,
    pub want_data: bool,
}

/// One registered interest of one channel in one account.
///
/// Records for the same account are told apart by their channel tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    /// Sorted ascending, no duplicates. Only ever grows on renewal.
    pub namespaces: Vec<NamespaceId>,
    /// Once true, stays true.
    pub want_data: bool,
    /// Set at most once.
    pub push_channel: Option<PushChannel>,
    /// Set at most once.
    pub stream_channel: Option<StreamChannel>,
    pub expiry: Timestamp,
}

impl Subscription {
    pub fn new(request: SubscriptionRequest, channels: &Channels, expiry: Timestamp) -> Self {
        Self {
            namespaces: request.namespaces,
            want_data: request.want_data,
            push_channel: channels.push,
            stream_channel: channels.stream,
            expiry,
        }
    }

    /// Whether this record belongs to the connection identified by `channels`.
    pub fn matches_channels(&self, channels: &Channels) -> bool {
        let push = matches!((channels.push, self.push_channel), (Some(a), Some(b)) if a == b);
        let stream =
            matches!((channels.stream, self.stream_channel), (Some(a), Some(b)) if a == b);
        push || stream
    }

    /// Fill in channel tokens this record does not have yet.
    pub fn backfill_channels(&mut self, channels: &Channels) {
        if self.push_channel.is_none() {
            self.push_channel = channels.push;
        }
        if self.stream_channel.is_none() {
            self.stream_channel = channels.stream;
        }
    }

    pub fn is_live(&self, now: Timestamp) -> bool {
        self.expiry >= now
    }

    pub fn watches(&self, namespace: NamespaceId) -> bool {
        self.namespaces.binary_search(&namespace).is_ok()
    }
}
