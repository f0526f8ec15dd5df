//! Multi-map from account key to subscription records.

use crate::types::{AccountKey, Channels, Timestamp};
use std::collections::HashMap;

use super::types::Subscription;

/// All monitor subscriptions, grouped by account.
///
/// Each account holds a handful of records at most (one per connected
/// channel), so matching within a group is a linear scan. The registry is not
/// synchronized; `Monitor` keeps it behind a reader/writer lock.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    by_account: HashMap<AccountKey, Vec<Subscription>>,
    len: usize,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record for `account`, in no particular order.
    pub fn find_all(&self, account: &AccountKey) -> impl Iterator<Item = &Subscription> + '_ {
        self.by_account.get(account).into_iter().flatten()
    }

    /// The first record for `account` owned by one of the given channels.
    pub fn find_matching(
        &mut self,
        account: &AccountKey,
        channels: &Channels,
    ) -> Option<&mut Subscription> {
        self.by_account
            .get_mut(account)?
            .iter_mut()
            .find(|sub| sub.matches_channels(channels))
    }

    /// Append a record. Callers check [`find_matching`](Self::find_matching) first.
    pub fn insert(&mut self, account: AccountKey, subscription: Subscription) {
        self.by_account.entry(account).or_default().push(subscription);
        self.len += 1;
    }

    /// Drop records that expired before `now`, and any account left empty.
    /// Returns the number of records removed.
    pub fn retain_live(&mut self, now: Timestamp) -> usize {
        let before = self.len;
        self.by_account.retain(|_, subs| {
            subs.retain(|sub| sub.is_live(now));
            !subs.is_empty()
        });
        self.len = self.by_account.values().map(Vec::len).sum();
        before - self.len
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn account_count(&self) -> usize {
        self.by_account.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::SubscriptionRequest;
    use crate::types::{NamespaceId, PushChannel, StreamChannel, ACCOUNT_KEY_SIZE};

    fn account(b: u8) -> AccountKey {
        AccountKey([b; ACCOUNT_KEY_SIZE])
    }

    fn make_sub(acct: AccountKey, channels: Channels, expiry: i64) -> Subscription {
        let request = SubscriptionRequest {
            account: acct,
            namespaces: vec![NamespaceId(0)],
            want_data: false,
        };
        Subscription::new(request, &channels, Timestamp(expiry))
    }

    #[test]
    fn test_find_all_groups_by_account() {
        let mut reg = SubscriptionRegistry::new();
        reg.insert(account(1), make_sub(account(1), Channels::push(1), 10));
        reg.insert(account(1), make_sub(account(1), Channels::stream(2), 10));
        reg.insert(account(2), make_sub(account(2), Channels::push(1), 10));

        assert_eq!(reg.find_all(&account(1)).count(), 2);
        assert_eq!(reg.find_all(&account(2)).count(), 1);
        assert_eq!(reg.find_all(&account(3)).count(), 0);
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.account_count(), 2);
    }

    #[test]
    fn test_find_matching_by_channel_identity() {
        let mut reg = SubscriptionRegistry::new();
        reg.insert(account(1), make_sub(account(1), Channels::push(1), 10));
        reg.insert(account(1), make_sub(account(1), Channels::stream(7), 20));

        let found = reg.find_matching(&account(1), &Channels::stream(7)).unwrap();
        assert_eq!(found.stream_channel, Some(StreamChannel(7)));
        assert_eq!(found.expiry, Timestamp(20));

        let found = reg.find_matching(&account(1), &Channels::push(1)).unwrap();
        assert_eq!(found.push_channel, Some(PushChannel(1)));

        assert!(reg.find_matching(&account(1), &Channels::push(2)).is_none());
        assert!(reg.find_matching(&account(2), &Channels::push(1)).is_none());
    }

    #[test]
    fn test_find_matching_allows_in_place_mutation() {
        let mut reg = SubscriptionRegistry::new();
        reg.insert(account(1), make_sub(account(1), Channels::push(1), 10));

        if let Some(sub) = reg.find_matching(&account(1), &Channels::push(1)) {
            sub.want_data = true;
        }
        assert!(reg.find_all(&account(1)).all(|s| s.want_data));
    }

    #[test]
    fn test_retain_live() {
        let mut reg = SubscriptionRegistry::new();
        reg.insert(account(1), make_sub(account(1), Channels::push(1), 5));
        reg.insert(account(1), make_sub(account(1), Channels::push(2), 50));
        reg.insert(account(2), make_sub(account(2), Channels::push(1), 5));

        assert_eq!(reg.retain_live(Timestamp(10)), 2);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.account_count(), 1);
        assert_eq!(reg.find_all(&account(2)).count(), 0);
    }
}
