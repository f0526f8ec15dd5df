//! # Swarm Monitor
//!
//! Subscription and notification fanout for a message storage server.
//!
//! ## Core Concepts
//!
//! - **Subscriptions**: a channel's interest in new messages for one account,
//!   restricted to a sorted set of namespaces
//! - **Registry**: account-keyed multi-map behind a reader/writer lock
//! - **Dispatch**: `monitor.messages` requests, a dict or a list of dicts,
//!   applied all-or-nothing
//! - **Fanout**: `notify.message` encoded once per stored message and sent to
//!   every matching channel, with or without the payload
//!
//! ## Example
//!
//! ```ignore
//! use swarm_monitor::{Channels, Monitor, MonitorConfig};
//!
//! let monitor = Monitor::new(MonitorConfig::default(), transport)?;
//!
//! // A connection subscribes
//! let reply = monitor.handle_monitor_messages(&[request], &Channels::push(conn_id));
//!
//! // Storage accepted a message
//! monitor.send_notifies(&message);
//! ```

pub mod bencode;
pub mod config;
pub mod error;
pub mod monitor;
pub mod parser;
pub mod subscriptions;
pub mod transport;
pub mod types;

// Re-exports
pub use bencode::{BencodeError, DictConsumer, DictProducer, ListConsumer, ListProducer};
pub use config::MonitorConfig;
pub use error::{MonitorError, MonitorResponse, Result};
pub use monitor::{
    error_reply, ExpirySweeper, Monitor, NotifySummary, UpdateSummary, MONITOR_COMMAND,
};
pub use parser::{BasicSubscriptionParser, SubscriptionParser};
pub use subscriptions::{merge_namespaces, Subscription, SubscriptionRegistry, SubscriptionRequest};
pub use transport::{Destination, Transport, NOTIFY_COMMAND};
pub use types::*;
