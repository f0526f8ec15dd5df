//! Per-element parsing of `monitor.messages` requests.

use crate::bencode::{DictConsumer, DictProducer};
use crate::error::{MonitorResponse, Result};
use crate::subscriptions::{is_sorted_unique, SubscriptionRequest};
use crate::types::{AccountKey, NamespaceId};

/// Turns one request dict into an optional subscription descriptor.
///
/// The parser writes the element's reply into `out`. Returning `Ok(None)` is a
/// per-element rejection that still lets the rest of the batch through;
/// returning `Err` aborts the whole batch.
pub trait SubscriptionParser: Send + Sync {
    fn parse(
        &self,
        input: DictConsumer<'_>,
        out: &mut DictProducer,
    ) -> Result<Option<SubscriptionRequest>>;
}

/// Parser for the unsigned request format.
///
/// Keys (in bencode order):
/// - `d`: optional integer, non-zero to receive message payloads
/// - `n`: non-empty, strictly ascending list of namespace integers
/// - `p`: 33-byte prefixed account key
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicSubscriptionParser;

fn reject(
    out: &mut DictProducer,
    code: MonitorResponse,
    message: &str,
) -> Result<Option<SubscriptionRequest>> {
    out.append_int("errcode", code.code());
    out.append_str("error", message);
    Ok(None)
}

impl SubscriptionParser for BasicSubscriptionParser {
    fn parse(
        &self,
        mut input: DictConsumer<'_>,
        out: &mut DictProducer,
    ) -> Result<Option<SubscriptionRequest>> {
        let want_data = input.skip_until("d")? && input.consume_int()? != 0;

        let mut namespaces = Vec::new();
        let mut namespaces_in_range = true;
        if input.skip_until("n")? {
            let mut list = input.consume_list()?;
            while !list.is_finished() {
                match i16::try_from(list.consume_int()?) {
                    Ok(n) => namespaces.push(NamespaceId(n)),
                    Err(_) => namespaces_in_range = false,
                }
            }
        }

        let account = if input.skip_until("p")? {
            Some(input.consume_bytes()?)
        } else {
            None
        };

        let Some(account) = account.and_then(|p| AccountKey::try_from(p).ok()) else {
            return reject(out, MonitorResponse::BadPubkey, "Invalid or missing pubkey");
        };
        if namespaces.is_empty() || !namespaces_in_range || !is_sorted_unique(&namespaces) {
            return reject(
                out,
                MonitorResponse::BadNamespace,
                "Invalid namespace list: expected a sorted, non-empty list of 16-bit integers",
            );
        }

        out.append_int("success", 1);
        Ok(Some(SubscriptionRequest {
            account,
            namespaces,
            want_data,
        }))
    }
}
