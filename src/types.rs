//! Core types shared by the registry, dispatcher and notifier.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Width of a prefixed account public key (1 type byte + 32 key bytes).
pub const ACCOUNT_KEY_SIZE: usize = 33;

/// Namespace of a message within an account.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NamespaceId(pub i16);

impl fmt::Debug for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ns({})", self.0)
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i16> for NamespaceId {
    fn from(v: i16) -> Self {
        NamespaceId(v)
    }
}

/// Prefixed public key of the account a subscription watches.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountKey(pub [u8; ACCOUNT_KEY_SIZE]);

impl AccountKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl TryFrom<&[u8]> for AccountKey {
    type Error = usize;

    /// Fails with the offending length when `bytes` is not exactly 33 bytes.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; ACCOUNT_KEY_SIZE] = bytes.try_into().map_err(|_| bytes.len())?;
        Ok(AccountKey(arr))
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountKey({}...)", &self.to_hex()[..10])
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Encoded content hash of a stored message.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MessageHash(pub String);

impl MessageHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MessageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "MessageHash({}...)", prefix)
    }
}

/// Milliseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_millis() as i64)
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    pub fn saturating_add(self, d: Duration) -> Self {
        let ms = i64::try_from(d.as_millis()).unwrap_or(i64::MAX);
        Timestamp(self.0.saturating_add(ms))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// Connection identifier of the legacy push transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PushChannel(pub u64);

/// Handle of a stream on the modern transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamChannel(pub u64);

/// The channel tokens of the connection a request arrived on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Channels {
    pub push: Option<PushChannel>,
    pub stream: Option<StreamChannel>,
}

impl Channels {
    pub fn push(id: u64) -> Self {
        Self {
            push: Some(PushChannel(id)),
            stream: None,
        }
    }

    pub fn stream(id: u64) -> Self {
        Self {
            push: None,
            stream: Some(StreamChannel(id)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.push.is_none() && self.stream.is_none()
    }
}

/// A freshly stored message, handed to the notifier once.
#[derive(Clone, Debug)]
pub struct Message {
    pub account: AccountKey,
    pub hash: MessageHash,
    pub namespace: NamespaceId,
    /// Creation time.
    pub timestamp: Timestamp,
    pub expiry: Timestamp,
    /// Raw payload, if the storage layer kept it around.
    pub data: Option<Vec<u8>>,
}
