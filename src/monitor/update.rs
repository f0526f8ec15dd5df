//! Insert-or-renew of subscription batches.

use crate::subscriptions::{merge_namespaces, Subscription, SubscriptionRequest};
use crate::types::{Channels, Timestamp};
use tracing::{debug, warn};

use super::Monitor;

/// What one batch did to the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub created: usize,
    pub renewed: usize,
}

impl Monitor {
    /// Apply a batch of subscription requests on behalf of the connection
    /// identified by `channels`.
    pub fn update_monitors(
        &self,
        subs: Vec<SubscriptionRequest>,
        channels: &Channels,
    ) -> UpdateSummary {
        self.update_monitors_at(subs, channels, Timestamp::now())
    }

    /// Like [`update_monitors`](Self::update_monitors) with an explicit clock.
    ///
    /// A renewal unions the namespace sets, extends the expiry, ORs in
    /// `want_data` and fills in channel tokens the record lacks. The batch is
    /// applied under a single write lock.
    pub fn update_monitors_at(
        &self,
        subs: Vec<SubscriptionRequest>,
        channels: &Channels,
        now: Timestamp,
    ) -> UpdateSummary {
        let mut summary = UpdateSummary::default();
        if channels.is_empty() {
            // Such records never match for renewal; the sweep reclaims them.
            warn!(
                count = subs.len(),
                "registering monitor subscriptions for a connection without channels"
            );
        }

        let expiry = now.saturating_add(self.config.subscription_ttl);
        let mut registry = self.registry.write();
        for request in subs {
            match registry.find_matching(&request.account, channels) {
                Some(existing) => {
                    existing.namespaces = merge_namespaces(
                        std::mem::take(&mut existing.namespaces),
                        request.namespaces,
                    );
                    existing.expiry = expiry;
                    existing.want_data |= request.want_data;
                    existing.backfill_channels(channels);
                    debug!(
                        account = %request.account,
                        namespaces = ?existing.namespaces,
                        "monitor.messages subscription renewed"
                    );
                    summary.renewed += 1;
                }
                None => {
                    debug!(
                        account = %request.account,
                        namespaces = ?request.namespaces,
                        "monitor.messages new subscription"
                    );
                    let account = request.account;
                    registry.insert(account, Subscription::new(request, channels, expiry));
                    summary.created += 1;
                }
            }
        }
        summary
    }
}
