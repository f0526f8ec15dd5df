//! Zero-copy bencode consumers.

use super::{BencodeError, MAX_DEPTH};

type Result<T> = std::result::Result<T, BencodeError>;

fn byte_at(data: &[u8], pos: usize) -> Result<u8> {
    data.get(pos).copied().ok_or(BencodeError::UnexpectedEnd(pos))
}

/// Parse `<len>:<bytes>` starting at `pos`; returns the bytes and the next offset.
fn parse_string(data: &[u8], pos: usize) -> Result<(&[u8], usize)> {
    let mut i = pos;
    let mut len: usize = 0;
    loop {
        let b = byte_at(data, i)?;
        match b {
            b'0'..=b'9' => {
                if i > pos && data[pos] == b'0' {
                    return Err(BencodeError::InvalidLength(pos));
                }
                len = len
                    .checked_mul(10)
                    .and_then(|l| l.checked_add((b - b'0') as usize))
                    .ok_or(BencodeError::InvalidLength(pos))?;
                i += 1;
            }
            b':' if i > pos => break,
            _ => {
                return Err(BencodeError::UnexpectedByte {
                    expected: "string",
                    found: b,
                    offset: i,
                })
            }
        }
    }
    let start = i + 1;
    let end = start
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or(BencodeError::UnexpectedEnd(data.len()))?;
    Ok((&data[start..end], end))
}

/// Parse `i<digits>e` starting at `pos`; returns the value and the next offset.
fn parse_int(data: &[u8], pos: usize) -> Result<(i64, usize)> {
    let b = byte_at(data, pos)?;
    if b != b'i' {
        return Err(BencodeError::UnexpectedByte {
            expected: "integer",
            found: b,
            offset: pos,
        });
    }
    let digits_start = pos + 1;
    let end = data[digits_start..]
        .iter()
        .position(|&c| c == b'e')
        .map(|p| digits_start + p)
        .ok_or(BencodeError::UnexpectedEnd(data.len()))?;
    let text = &data[digits_start..end];
    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, text),
    };
    let canonical = !digits.is_empty()
        && digits.iter().all(u8::is_ascii_digit)
        && !(digits.len() > 1 && digits[0] == b'0')
        && !(negative && digits == b"0");
    if !canonical {
        return Err(BencodeError::InvalidInteger(pos));
    }
    let value = std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(BencodeError::InvalidInteger(pos))?;
    Ok((value, end + 1))
}

/// Skip one complete value starting at `pos`; returns the offset just past it.
fn skip_value(data: &[u8], pos: usize, depth: usize) -> Result<usize> {
    if depth > MAX_DEPTH {
        return Err(BencodeError::TooDeep);
    }
    match byte_at(data, pos)? {
        b'i' => parse_int(data, pos).map(|(_, next)| next),
        b'0'..=b'9' => parse_string(data, pos).map(|(_, next)| next),
        b'l' => {
            let mut i = pos + 1;
            while byte_at(data, i)? != b'e' {
                i = skip_value(data, i, depth + 1)?;
            }
            Ok(i + 1)
        }
        b'd' => {
            let mut i = pos + 1;
            while byte_at(data, i)? != b'e' {
                let (_, after_key) = parse_string(data, i)?;
                i = skip_value(data, after_key, depth + 1)?;
            }
            Ok(i + 1)
        }
        found => Err(BencodeError::UnexpectedByte {
            expected: "value",
            found,
            offset: pos,
        }),
    }
}

/// Check that `data` is exactly one complete value with nothing after it.
pub fn check_complete(data: &[u8]) -> Result<()> {
    let end = skip_value(data, 0, 1)?;
    if end != data.len() {
        return Err(BencodeError::TrailingData(end));
    }
    Ok(())
}

/// Shared read position over one dict or list body.
#[derive(Clone, Debug)]
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn open(data: &'a [u8], marker: u8, expected: &'static str) -> Result<Self> {
        let b = byte_at(data, 0)?;
        if b != marker {
            return Err(BencodeError::UnexpectedByte {
                expected,
                found: b,
                offset: 0,
            });
        }
        Ok(Self { data, pos: 1 })
    }

    /// Only a terminator ends the body; running off the end does not, so the
    /// next consume reports `UnexpectedEnd`.
    fn is_finished(&self) -> bool {
        self.data.get(self.pos) == Some(&b'e')
    }

    fn consume_bytes(&mut self) -> Result<&'a [u8]> {
        let (s, next) = parse_string(self.data, self.pos)?;
        self.pos = next;
        Ok(s)
    }

    fn consume_int(&mut self) -> Result<i64> {
        let (v, next) = parse_int(self.data, self.pos)?;
        self.pos = next;
        Ok(v)
    }

    fn consume_raw(&mut self, marker: u8, expected: &'static str) -> Result<&'a [u8]> {
        let found = byte_at(self.data, self.pos)?;
        if found != marker {
            return Err(BencodeError::UnexpectedByte {
                expected,
                found,
                offset: self.pos,
            });
        }
        let start = self.pos;
        let end = skip_value(self.data, start, 1)?;
        self.pos = end;
        Ok(&self.data[start..end])
    }

    fn skip_value(&mut self) -> Result<()> {
        self.pos = skip_value(self.data, self.pos, 1)?;
        Ok(())
    }
}

/// Reads a bencoded dict one key at a time, in encoded order.
#[derive(Clone, Debug)]
pub struct DictConsumer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> DictConsumer<'a> {
    /// Begin reading `data`, which must start with a dict marker.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Ok(Self {
            cursor: Cursor::open(data, b'd', "dict")?,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    /// Peek at the next key without consuming it.
    pub fn key(&self) -> Result<Option<&'a [u8]>> {
        if self.is_finished() {
            return Ok(None);
        }
        parse_string(self.cursor.data, self.cursor.pos).map(|(k, _)| Some(k))
    }

    /// Advance to `key`, skipping smaller keys and their values.
    ///
    /// Returns `true` with the cursor on the key's value, or `false` (leaving
    /// the cursor on the first larger key) if the dict does not contain it.
    pub fn skip_until(&mut self, key: &str) -> Result<bool> {
        let target = key.as_bytes();
        while let Some(k) = self.key()? {
            if k > target {
                return Ok(false);
            }
            self.cursor.consume_bytes()?;
            if k == target {
                return Ok(true);
            }
            self.cursor.skip_value()?;
        }
        Ok(false)
    }

    pub fn consume_bytes(&mut self) -> Result<&'a [u8]> {
        self.cursor.consume_bytes()
    }

    pub fn consume_int(&mut self) -> Result<i64> {
        self.cursor.consume_int()
    }

    pub fn consume_list(&mut self) -> Result<ListConsumer<'a>> {
        let raw = self.cursor.consume_raw(b'l', "list")?;
        ListConsumer::new(raw)
    }

    pub fn consume_dict(&mut self) -> Result<DictConsumer<'a>> {
        let raw = self.cursor.consume_raw(b'd', "dict")?;
        DictConsumer::new(raw)
    }

    pub fn skip_value(&mut self) -> Result<()> {
        self.cursor.skip_value()
    }
}

/// Reads a bencoded list element by element.
#[derive(Clone, Debug)]
pub struct ListConsumer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> ListConsumer<'a> {
    /// Begin reading `data`, which must start with a list marker.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Ok(Self {
            cursor: Cursor::open(data, b'l', "list")?,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    pub fn consume_bytes(&mut self) -> Result<&'a [u8]> {
        self.cursor.consume_bytes()
    }

    pub fn consume_int(&mut self) -> Result<i64> {
        self.cursor.consume_int()
    }

    pub fn consume_list(&mut self) -> Result<ListConsumer<'a>> {
        let raw = self.cursor.consume_raw(b'l', "list")?;
        ListConsumer::new(raw)
    }

    pub fn consume_dict(&mut self) -> Result<DictConsumer<'a>> {
        let raw = self.cursor.consume_raw(b'd', "dict")?;
        DictConsumer::new(raw)
    }

    pub fn skip_value(&mut self) -> Result<()> {
        self.cursor.skip_value()
    }
}
