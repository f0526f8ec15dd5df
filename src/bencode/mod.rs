//! Minimal bencode codec used on the monitor wire.
//!
//! Producers write straight into a single growable buffer that always holds
//! a complete, terminated value, so a dict can be viewed, sent, extended with
//! more keys and sent again without re-encoding the prefix. Consumers walk a
//! borrowed buffer without copying; nested values are bounds-checked as they
//! are consumed.
//!
//! Dict keys must be appended in ascending byte order; the producer does not
//! sort them.

mod consumer;
mod producer;

pub use consumer::{check_complete, DictConsumer, ListConsumer};
pub use producer::{DictProducer, ListProducer};

use thiserror::Error;

/// Maximum nesting accepted by the consumers.
pub const MAX_DEPTH: usize = 64;

/// Errors raised while decoding bencoded input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BencodeError {
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEnd(usize),

    #[error("expected {expected} at offset {offset}, found byte 0x{found:02x}")]
    UnexpectedByte {
        expected: &'static str,
        found: u8,
        offset: usize,
    },

    #[error("invalid integer at offset {0}")]
    InvalidInteger(usize),

    #[error("invalid string length at offset {0}")]
    InvalidLength(usize),

    #[error("nesting exceeds the maximum depth")]
    TooDeep,

    #[error("trailing data after offset {0}")]
    TrailingData(usize),
}

/// Bytes needed to encode `len` as a decimal string-length prefix plus `:`.
pub const fn length_prefix_size(len: usize) -> usize {
    let mut digits = 1;
    let mut n = len / 10;
    while n > 0 {
        digits += 1;
        n /= 10;
    }
    digits + 1
}
