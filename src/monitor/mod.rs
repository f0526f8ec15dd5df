//! The monitor service: subscription updates, request dispatch and fanout.
//!
//! All state lives in one [`SubscriptionRegistry`] behind a reader/writer
//! lock. Request handling takes the write side once per batch; notification
//! fanout takes the read side only long enough to pick destinations, then
//! encodes and sends with no lock held.

mod dispatch;
mod notify;
mod sweep;
mod update;

pub use dispatch::{error_reply, MONITOR_COMMAND};
pub use notify::NotifySummary;
pub use sweep::ExpirySweeper;
pub use update::UpdateSummary;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::parser::{BasicSubscriptionParser, SubscriptionParser};
use crate::subscriptions::{Subscription, SubscriptionRegistry};
use crate::transport::Transport;
use crate::types::AccountKey;
use parking_lot::RwLock;
use std::sync::Arc;

/// Registry of monitor subscriptions plus the collaborators needed to fill
/// and notify it.
pub struct Monitor {
    config: MonitorConfig,
    registry: RwLock<SubscriptionRegistry>,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn SubscriptionParser>,
}

impl Monitor {
    /// Create a monitor that parses requests with [`BasicSubscriptionParser`].
    pub fn new(config: MonitorConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_parser(config, transport, Arc::new(BasicSubscriptionParser))
    }

    pub fn with_parser(
        config: MonitorConfig,
        transport: Arc<dyn Transport>,
        parser: Arc<dyn SubscriptionParser>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: RwLock::new(SubscriptionRegistry::new()),
            transport,
            parser,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Number of stored subscriptions, expired ones included.
    pub fn subscription_count(&self) -> usize {
        self.registry.read().len()
    }

    pub fn account_count(&self) -> usize {
        self.registry.read().account_count()
    }

    /// Copy of every stored subscription for `account`.
    pub fn subscriptions_for(&self, account: &AccountKey) -> Vec<Subscription> {
        self.registry.read().find_all(account).cloned().collect()
    }
}
