//! UTF-8 text box.

use std::cmp::Ordering;
use std::fmt;

use bytes::{Buf, BufMut};

use super::{ABSENT, PRESENT, ValueKind, ValueOption, compare_nullable, ensure_stream, presence_at};
use crate::error::ValueError;
use crate::order::{self, varint};
use crate::text;

/// A nullable UTF-8 string backed by a reusable byte buffer.
///
/// An empty string and a null are distinct: [`reset`](Self::reset) leaves a
/// present, zero-length value, [`clear`](ValueOption::clear) leaves a null.
#[derive(Debug, Clone, Default)]
pub struct StringBox {
    present: bool,
    bytes: Vec<u8>,
}

impl StringBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(value: &str) -> Self {
        let mut b = Self::new();
        b.set(value);
        b
    }

    pub fn as_text(&self) -> Result<&str, ValueError> {
        let bytes = self.as_bytes()?;
        std::str::from_utf8(bytes).map_err(ValueError::malformed)
    }

    pub fn as_bytes(&self) -> Result<&[u8], ValueError> {
        if self.present {
            Ok(&self.bytes)
        } else {
            Err(ValueError::EmptyValue)
        }
    }

    pub fn set(&mut self, value: &str) -> &mut Self {
        self.bytes.clear();
        self.bytes.extend_from_slice(value.as_bytes());
        self.present = true;
        self
    }

    /// Sets the value from bytes that must be valid UTF-8.
    pub fn set_bytes(&mut self, value: &[u8]) -> Result<&mut Self, ValueError> {
        std::str::from_utf8(value).map_err(ValueError::malformed)?;
        self.bytes.clear();
        self.bytes.extend_from_slice(value);
        self.present = true;
        Ok(self)
    }

    /// Byte length of the value; 0 when null.
    pub fn len(&self) -> usize {
        if self.present { self.bytes.len() } else { 0 }
    }

    /// Returns `true` for a present, zero-length value.
    pub fn is_empty(&self) -> bool {
        self.present && self.bytes.is_empty()
    }

    /// Makes the box a present empty string.
    pub fn reset(&mut self) -> &mut Self {
        self.bytes.clear();
        self.present = true;
        self
    }

    pub fn append(&mut self, value: &str) -> Result<&mut Self, ValueError> {
        if !self.present {
            return Err(ValueError::EmptyValue);
        }
        self.bytes.extend_from_slice(value.as_bytes());
        Ok(self)
    }

    pub fn contains(&self, needle: &str) -> Result<bool, ValueError> {
        Ok(text::contains(self.as_bytes()?, needle.as_bytes()))
    }

    pub fn starts_with(&self, prefix: &str) -> Result<bool, ValueError> {
        Ok(text::starts_with(self.as_bytes()?, prefix.as_bytes()))
    }

    pub fn ends_with(&self, suffix: &str) -> Result<bool, ValueError> {
        Ok(text::ends_with(self.as_bytes()?, suffix.as_bytes()))
    }

    pub fn codepoint_count(&self) -> Result<usize, ValueError> {
        text::codepoint_count(self.as_bytes()?)
    }

    /// Removes leading and trailing ASCII whitespace in place. A null stays null.
    pub fn trim(&mut self) -> &mut Self {
        if self.present {
            let range = text::trim_ascii_whitespace(&self.bytes);
            let len = range.len();
            self.bytes.copy_within(range, 0);
            self.bytes.truncate(len);
        }
        self
    }

    fn fill(&mut self, len: usize) -> &mut [u8] {
        self.bytes.clear();
        self.bytes.resize(len, 0);
        self.present = true;
        &mut self.bytes
    }
}

fn check_utf8(bytes: &[u8]) -> Result<(), ValueError> {
    std::str::from_utf8(bytes)
        .map(|_| ())
        .map_err(ValueError::malformed)
}

/// Returns `(content offset, content length)` of the raw form at `offset`, or
/// `None` for a null.
fn raw_content(buf: &[u8], offset: usize) -> Result<Option<(usize, usize)>, ValueError> {
    if !presence_at(buf, offset)? {
        return Ok(None);
    }
    let (len, read) = varint::decode_varint(buf, offset + 1)?;
    let len = usize::try_from(len)
        .map_err(|_| ValueError::Malformed(format!("string length out of range: {len}")))?;
    let start = offset + 1 + read;
    order::ensure_remaining(buf, start, len)?;
    Ok(Some((start, len)))
}

impl ValueOption for StringBox {
    const KIND: ValueKind = ValueKind::String;

    fn is_null(&self) -> bool {
        !self.present
    }

    fn clear(&mut self) {
        self.present = false;
    }

    fn copy_from(&mut self, other: &Self) {
        self.bytes.clear();
        self.bytes.extend_from_slice(&other.bytes);
        self.present = other.present;
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_nullable(self.as_bytes().ok(), other.as_bytes().ok(), |a, b| {
            a.cmp(b)
        })
    }

    fn write_stream(&self, buf: &mut impl BufMut) {
        if self.present {
            varint::put_varint(buf, self.bytes.len() as u64 + 1);
            buf.put_slice(&self.bytes);
        } else {
            varint::put_varint(buf, 0);
        }
    }

    fn read_stream(&mut self, buf: &mut impl Buf) -> Result<(), ValueError> {
        let Some(len) = varint::get_varint(buf)?.checked_sub(1) else {
            self.clear();
            return Ok(());
        };
        let len = usize::try_from(len)
            .map_err(|_| ValueError::Malformed(format!("string length out of range: {len}")))?;
        ensure_stream(buf, len)?;
        buf.copy_to_slice(self.fill(len));
        if let Err(e) = check_utf8(&self.bytes) {
            self.clear();
            return Err(e);
        }
        Ok(())
    }

    fn size_in_bytes(&self) -> usize {
        if self.present {
            1 + varint::varint_len(self.bytes.len() as u64) + self.bytes.len()
        } else {
            1
        }
    }

    fn emit(&self, buf: &mut Vec<u8>) {
        if self.present {
            buf.put_u8(PRESENT);
            varint::put_varint(buf, self.bytes.len() as u64);
            buf.put_slice(&self.bytes);
        } else {
            buf.put_u8(ABSENT);
        }
    }

    fn restore(&mut self, buf: &[u8], offset: usize) -> Result<usize, ValueError> {
        match raw_content(buf, offset)? {
            None => {
                self.clear();
                Ok(1)
            }
            Some((start, len)) => {
                let content = &buf[start..start + len];
                check_utf8(content)?;
                self.bytes.clear();
                self.bytes.extend_from_slice(content);
                self.present = true;
                Ok(start + len - offset)
            }
        }
    }

    fn raw_length(buf: &[u8], offset: usize) -> Result<usize, ValueError> {
        Ok(match raw_content(buf, offset)? {
            None => 1,
            Some((start, len)) => start + len - offset,
        })
    }

    fn compare_bytes(
        a: &[u8],
        a_offset: usize,
        b: &[u8],
        b_offset: usize,
    ) -> Result<Ordering, ValueError> {
        let left = raw_content(a, a_offset)?;
        let right = raw_content(b, b_offset)?;
        Ok(compare_nullable(left, right, |(sa, la), (sb, lb)| {
            a[sa..sa + la].cmp(&b[sb..sb + lb])
        }))
    }
}

impl PartialEq for StringBox {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for StringBox {}

impl PartialOrd for StringBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StringBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<&str> for StringBox {
    fn from(value: &str) -> Self {
        Self::of(value)
    }
}

impl fmt::Display for StringBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Ok(text) => f.write_str(text),
            Err(_) => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(b: &StringBox) -> Vec<u8> {
        let mut buf = Vec::new();
        b.emit(&mut buf);
        assert_eq!(buf.len(), b.size_in_bytes());
        buf
    }

    #[test]
    fn null_and_empty_are_distinct() {
        let mut b = StringBox::new();
        assert!(b.is_null());
        assert!(!b.is_empty());
        assert_eq!(b.as_text(), Err(ValueError::EmptyValue));
        b.reset();
        assert!(b.is_present());
        assert!(b.is_empty());
        assert_eq!(b.as_text(), Ok(""));
        assert_ne!(b, StringBox::new());
    }

    #[test]
    fn raw_and_stream_layouts() {
        assert_eq!(raw(&StringBox::new()), vec![0x00]);
        assert_eq!(raw(&StringBox::of("")), vec![0x01, 0x00]);
        assert_eq!(raw(&StringBox::of("ab")), vec![0x01, 0x02, b'a', b'b']);

        let mut buf = Vec::new();
        StringBox::new().write_stream(&mut buf);
        StringBox::of("").write_stream(&mut buf);
        StringBox::of("ab").write_stream(&mut buf);
        assert_eq!(buf, vec![0x00, 0x01, 0x03, b'a', b'b']);

        let mut cursor = &buf[..];
        let mut b = StringBox::of("stale");
        b.read_stream(&mut cursor).unwrap();
        assert!(b.is_null());
        b.read_stream(&mut cursor).unwrap();
        assert!(b.is_empty());
        b.read_stream(&mut cursor).unwrap();
        assert_eq!(b.as_text(), Ok("ab"));
        assert!(cursor.is_empty());
    }

    #[test]
    fn long_values_use_wider_length() {
        let text = "x".repeat(300);
        let b = StringBox::of(&text);
        let buf = raw(&b);
        assert_eq!(&buf[..3], &[0x01, 0xF1, 0x3C]);
        let mut restored = StringBox::new();
        assert_eq!(restored.restore(&buf, 0), Ok(buf.len()));
        assert_eq!(restored.as_text(), Ok(text.as_str()));
    }

    #[test]
    fn search_helpers() {
        let b = StringBox::of("hello world");
        assert_eq!(b.contains("lo w"), Ok(true));
        assert_eq!(b.contains(""), Ok(true));
        assert_eq!(b.contains("xyz"), Ok(false));
        assert_eq!(b.starts_with("hell"), Ok(true));
        assert_eq!(b.ends_with("world"), Ok(true));
        assert_eq!(b.ends_with("hello"), Ok(false));
        assert_eq!(StringBox::new().contains(""), Err(ValueError::EmptyValue));
        assert_eq!(StringBox::new().starts_with("a"), Err(ValueError::EmptyValue));
    }

    #[test]
    fn trim_in_place() {
        let mut b = StringBox::of(" a ");
        b.trim();
        assert_eq!(b.as_text(), Ok("a"));
        b.trim();
        assert_eq!(b.as_text(), Ok("a"));

        let mut b = StringBox::of("\t\r\n x y \n");
        assert_eq!(b.trim().as_text(), Ok("x y"));
        let mut b = StringBox::of("   ");
        assert!(b.trim().is_empty());
        let mut null = StringBox::new();
        assert!(null.trim().is_null());
    }

    #[test]
    fn append_and_codepoints() {
        let mut b = StringBox::of("é");
        b.append("日本").unwrap();
        assert_eq!(b.as_text(), Ok("é日本"));
        assert_eq!(b.len(), 8);
        assert_eq!(b.codepoint_count(), Ok(3));
        assert_eq!(StringBox::new().append("x").unwrap_err(), ValueError::EmptyValue);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut b = StringBox::new();
        assert!(b.set_bytes(&[0xC3]).unwrap_err().is_malformed());
        assert!(b.is_null());
        assert!(b.restore(&[0x01, 0x01, 0xFF], 0).is_err());
        let mut cursor: &[u8] = &[0x02, 0xFF];
        assert!(b.read_stream(&mut cursor).is_err());
        assert!(b.is_null());
    }

    #[test]
    fn truncated_raw_form() {
        assert!(StringBox::raw_length(&[0x01, 0x05, b'a'], 0).is_err());
        assert!(StringBox::compare_bytes(&[0x01, 0x05], 0, &[0x00], 0).is_err());
        let mut cursor: &[u8] = &[0x06, b'a'];
        assert!(StringBox::new().read_stream(&mut cursor).is_err());
    }

    #[test]
    fn raw_order_is_bytewise_with_null_first() {
        let values = ["", "a", "ab", "b", "é"];
        let null = raw(&StringBox::new());
        for pair in values.windows(2) {
            let (a, b) = (raw(&StringBox::of(pair[0])), raw(&StringBox::of(pair[1])));
            assert_eq!(StringBox::compare_bytes(&a, 0, &b, 0), Ok(Ordering::Less), "{pair:?}");
            assert_eq!(StringBox::compare_bytes(&null, 0, &a, 0), Ok(Ordering::Less));
        }
    }

    proptest! {
        #[test]
        fn raw_compare_agrees(a in proptest::option::of(".*"), b in proptest::option::of(".*")) {
            let a = a.map(|s| StringBox::of(&s)).unwrap_or_default();
            let b = b.map(|s| StringBox::of(&s)).unwrap_or_default();
            prop_assert_eq!(StringBox::compare_bytes(&raw(&a), 0, &raw(&b), 0).unwrap(), a.compare(&b));
        }

        #[test]
        fn stream_round_trip(s in ".*") {
            let value = StringBox::of(&s);
            let mut buf = Vec::new();
            value.write_stream(&mut buf);
            let mut restored = StringBox::new();
            restored.read_stream(&mut &buf[..]).unwrap();
            prop_assert_eq!(restored, value);
        }
    }
}
