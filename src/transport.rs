//! Seam to the transport layer that delivers notifications.

use crate::types::{PushChannel, StreamChannel};

/// Command name of outbound notifications.
pub const NOTIFY_COMMAND: &str = "notify.message";

/// Where a notification goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    Push(PushChannel),
    Stream(StreamChannel),
}

/// Delivers encoded commands over either channel kind.
///
/// `send` is never invoked while a registry lock is held.
pub trait Transport: Send + Sync {
    fn send(&self, destination: &Destination, command: &str, payload: &[u8]);
}
