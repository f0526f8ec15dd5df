//! Envelope validation and batch dispatch of `monitor.messages`.

use crate::bencode::{check_complete, DictConsumer, DictProducer, ListConsumer, ListProducer};
use crate::error::{MonitorResponse, Result};
use crate::subscriptions::SubscriptionRequest;
use crate::types::{Channels, Timestamp};
use tracing::warn;

use super::Monitor;

/// Command name of inbound subscription requests.
pub const MONITOR_COMMAND: &str = "monitor.messages";

const ENVELOPE_ERROR: &str =
    "Invalid arguments: monitor.messages takes a single bencoded dict or list parameter";

const PARSE_ERROR: &str = "Invalid arguments: Failed to parse monitor.messages data value";

/// Encode `{"errcode": code, "error": message}`.
pub fn error_reply(code: MonitorResponse, message: &str) -> Vec<u8> {
    let mut d = DictProducer::new();
    d.append_int("errcode", code.code());
    d.append_str("error", message);
    d.into_bytes()
}

/// Cheap shape check done before any parsing: a dict or list that is at
/// least two bytes long and ends with a terminator.
fn valid_envelope(value: &[u8]) -> bool {
    value.len() >= 2 && matches!(value[0], b'd' | b'l') && value[value.len() - 1] == b'e'
}

impl Monitor {
    /// Handle one `monitor.messages` request and return the reply to send.
    ///
    /// `args` are the request's wire arguments; exactly one is accepted. The
    /// returned bytes are always a single bencoded value: either the error
    /// dict or the per-element replies in the shape of the request.
    pub fn handle_monitor_messages(&self, args: &[&[u8]], channels: &Channels) -> Vec<u8> {
        self.handle_monitor_messages_at(args, channels, Timestamp::now())
    }

    /// Like [`handle_monitor_messages`](Self::handle_monitor_messages) with an
    /// explicit clock.
    pub fn handle_monitor_messages_at(
        &self,
        args: &[&[u8]],
        channels: &Channels,
        now: Timestamp,
    ) -> Vec<u8> {
        let value = match args {
            [value] if valid_envelope(value) => *value,
            _ => {
                warn!(args = args.len(), "rejecting malformed monitor.messages envelope");
                return error_reply(MonitorResponse::BadArgs, ENVELOPE_ERROR);
            }
        };

        let (reply, subs) = match self.parse_request(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "failed to parse monitor.messages request");
                return error_reply(MonitorResponse::BadArgs, PARSE_ERROR);
            }
        };

        if !subs.is_empty() {
            self.update_monitors_at(subs, channels, now);
        }
        reply
    }

    /// Parse every element; any failure discards the whole batch.
    fn parse_request(&self, value: &[u8]) -> Result<(Vec<u8>, Vec<SubscriptionRequest>)> {
        check_complete(value)?;
        let mut subs = Vec::new();
        if value[0] == b'd' {
            let mut out = DictProducer::new();
            subs.extend(self.parser.parse(DictConsumer::new(value)?, &mut out)?);
            return Ok((out.into_bytes(), subs));
        }

        let mut out = ListProducer::new();
        let mut list = ListConsumer::new(value)?;
        while !list.is_finished() {
            let mut element = DictProducer::new();
            subs.extend(self.parser.parse(list.consume_dict()?, &mut element)?);
            out.append_encoded(element.view());
        }
        Ok((out.into_bytes(), subs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::transport::{Destination, Transport};
    use std::sync::Arc;

    struct NullTransport;

    impl Transport for NullTransport {
        fn send(&self, _: &Destination, _: &str, _: &[u8]) {}
    }

    fn monitor() -> Monitor {
        Monitor::new(MonitorConfig::default(), Arc::new(NullTransport)).unwrap()
    }

    #[test]
    fn test_valid_envelope() {
        assert!(valid_envelope(b"de"));
        assert!(valid_envelope(b"le"));
        assert!(!valid_envelope(b"d"));
        assert!(!valid_envelope(b"i5e"));
        assert!(!valid_envelope(b"d1:a"));
        assert!(!valid_envelope(b""));
    }

    #[test]
    fn test_error_reply_shape() {
        let reply = error_reply(MonitorResponse::BadArgs, "nope");
        assert_eq!(reply, b"d7:errcodei1e5:error4:nopee");
    }

    #[test]
    fn test_wrong_arg_count() {
        let m = monitor();
        let expected = error_reply(MonitorResponse::BadArgs, ENVELOPE_ERROR);
        assert_eq!(m.handle_monitor_messages(&[], &Channels::push(1)), expected);
        assert_eq!(
            m.handle_monitor_messages(&[&b"de"[..], &b"de"[..]], &Channels::push(1)),
            expected
        );
    }

    #[test]
    fn test_empty_list_is_empty_reply() {
        let m = monitor();
        assert_eq!(m.handle_monitor_messages(&[&b"le"[..]], &Channels::push(1)), b"le");
        assert_eq!(m.subscription_count(), 0);
    }

    #[test]
    fn test_list_element_not_a_dict() {
        let m = monitor();
        let reply = m.handle_monitor_messages(&[&b"li1ee"[..]], &Channels::push(1));
        assert_eq!(reply, error_reply(MonitorResponse::BadArgs, PARSE_ERROR));
    }
}
