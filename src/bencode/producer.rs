//! Bencode producers writing into one contiguous buffer.

use std::io::Write;

fn write_bytes(buf: &mut Vec<u8>, value: &[u8]) {
    // Writes into a Vec cannot fail.
    let _ = write!(buf, "{}:", value.len());
    buf.extend_from_slice(value);
}

fn write_int(buf: &mut Vec<u8>, value: i64) {
    let _ = write!(buf, "i{}e", value);
}

/// Builds a bencoded dict. The buffer is always a complete `d...e` value.
#[derive(Clone, Debug)]
pub struct DictProducer {
    buf: Vec<u8>,
}

impl DictProducer {
    pub fn new() -> Self {
        Self::with_capacity(2)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity.max(2));
        buf.extend_from_slice(b"de");
        Self { buf }
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.len() == 2
    }

    /// The encoded dict as written so far.
    pub fn view(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn append_key(&mut self, key: &str) {
        // Drop the terminator; every append writes it back.
        self.buf.pop();
        write_bytes(&mut self.buf, key.as_bytes());
    }

    pub fn append_bytes(&mut self, key: &str, value: &[u8]) {
        self.append_key(key);
        write_bytes(&mut self.buf, value);
        self.buf.push(b'e');
    }

    pub fn append_str(&mut self, key: &str, value: &str) {
        self.append_bytes(key, value.as_bytes());
    }

    pub fn append_int(&mut self, key: &str, value: i64) {
        self.append_key(key);
        write_int(&mut self.buf, value);
        self.buf.push(b'e');
    }

    pub fn append_int_list<I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        self.append_key(key);
        self.buf.push(b'l');
        for v in values {
            write_int(&mut self.buf, v.into());
        }
        self.buf.extend_from_slice(b"ee");
    }
}

impl Default for DictProducer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a bencoded list. The buffer is always a complete `l...e` value.
#[derive(Clone, Debug)]
pub struct ListProducer {
    buf: Vec<u8>,
}

impl ListProducer {
    pub fn new() -> Self {
        Self {
            buf: b"le".to_vec(),
        }
    }

    pub fn view(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn append_int(&mut self, value: i64) {
        self.buf.pop();
        write_int(&mut self.buf, value);
        self.buf.push(b'e');
    }

    pub fn append_bytes(&mut self, value: &[u8]) {
        self.buf.pop();
        write_bytes(&mut self.buf, value);
        self.buf.push(b'e');
    }

    /// Append an already-encoded value, e.g. a finished [`DictProducer`].
    pub fn append_encoded(&mut self, encoded: &[u8]) {
        self.buf.pop();
        self.buf.extend_from_slice(encoded);
        self.buf.push(b'e');
    }
}

impl Default for ListProducer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dict() {
        let d = DictProducer::new();
        assert_eq!(d.view(), b"de");
        assert!(d.is_empty());
    }

    #[test]
    fn test_dict_encoding() {
        let mut d = DictProducer::new();
        d.append_int("errcode", 1);
        d.append_str("error", "bad");
        assert_eq!(d.view(), b"d7:errcodei1e5:error3:bade");
    }

    #[test]
    fn test_extend_after_view() {
        let mut d = DictProducer::new();
        d.append_int("n", 0);
        let first = d.view().to_vec();
        d.append_bytes("~", b"xy");
        assert_eq!(first, b"d1:ni0ee");
        assert_eq!(d.view(), b"d1:ni0e1:~2:xye");
    }

    #[test]
    fn test_capacity_prevents_growth() {
        let mut d = DictProducer::with_capacity(64);
        let cap = d.capacity();
        d.append_bytes("a", &[0u8; 40]);
        assert_eq!(d.capacity(), cap);
    }

    #[test]
    fn test_list_of_dicts() {
        let mut l = ListProducer::new();
        let mut a = DictProducer::new();
        a.append_int("success", 1);
        l.append_encoded(a.view());
        l.append_encoded(DictProducer::new().view());
        l.append_int(-3);
        l.append_bytes(b"ok");
        assert_eq!(l.into_bytes(), b"ld7:successi1eedei-3e2:oke");
    }

    #[test]
    fn test_int_list() {
        let mut d = DictProducer::new();
        d.append_int_list("n", [1i16, -2, 30]);
        assert_eq!(d.view(), b"d1:nli1ei-2ei30eee");
    }
}
