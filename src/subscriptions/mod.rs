//! Monitor subscription records and their storage.
//!
//! - [`merge_namespaces`]: allocation-avoiding union of sorted namespace sets
//! - [`Subscription`]: one channel's interest in one account
//! - [`SubscriptionRegistry`]: account-keyed multi-map of subscriptions
//!
//! # Example
//!
//! ```ignore
//! let mut registry = SubscriptionRegistry::new();
//! registry.insert(request.account, Subscription::new(request, &channels, expiry));
//!
//! if let Some(sub) = registry.find_matching(&account, &channels) {
//!     sub.namespaces = merge_namespaces(std::mem::take(&mut sub.namespaces), more);
//! }
//! ```

mod merge;
mod registry;
mod types;

pub use merge::{is_sorted_unique, merge_namespaces};
pub use registry::SubscriptionRegistry;
pub use types::{Subscription, SubscriptionRequest};
