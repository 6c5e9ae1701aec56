//! Nullable value boxes.
//!
//! A box is created once per field slot and mutated in place for every
//! record. Each box has two binary forms:
//!
//! - **stream form**, written to a [`BufMut`] and read from a [`Buf`];
//!   self-delimiting;
//! - **raw form**, appended to a `Vec<u8>` and restored from a slice at an
//!   offset. Raw forms of the same kind order like their values, and
//!   [`ValueOption::compare_bytes`] compares two of them without building
//!   boxes. Null sorts first.

mod decimal;
mod fixed;
mod kind;
mod string;
mod temporal;

pub use decimal::{DecimalBox, DecimalRef, Sign};
pub use fixed::{
    BooleanBox, ByteBox, DoubleBox, FixedBox, FixedValue, FloatBox, IntBox, LongBox, ShortBox,
};
pub use kind::{AnyValue, ValueKind, compare_record_bytes};
pub use string::StringBox;
pub use temporal::{Date, DateBox, DateTime, DateTimeBox};

use std::cmp::Ordering;

use bytes::{Buf, BufMut};

use crate::error::ValueError;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Presence byte of a null raw or stream form.
pub(crate) const ABSENT: u8 = 0;
/// Presence byte of a non-null raw or stream form.
pub(crate) const PRESENT: u8 = 1;

/// Common contract of every value box.
pub trait ValueOption: Default {
    const KIND: ValueKind;

    fn is_null(&self) -> bool;

    fn is_present(&self) -> bool {
        !self.is_null()
    }

    /// Marks the box as holding no value. Storage is kept for reuse.
    fn clear(&mut self);

    /// Copies the state of `other` into this box, reusing storage.
    fn copy_from(&mut self, other: &Self);

    /// Orders null first, then by value.
    fn compare(&self, other: &Self) -> Ordering;

    fn write_stream(&self, buf: &mut impl BufMut);

    fn read_stream(&mut self, buf: &mut impl Buf) -> Result<(), ValueError>;

    /// Length of the raw form [`emit`](Self::emit) would append.
    fn size_in_bytes(&self) -> usize;

    /// Appends the raw form.
    fn emit(&self, buf: &mut Vec<u8>);

    /// Restores from the raw form at `offset`, returning the bytes consumed.
    fn restore(&mut self, buf: &[u8], offset: usize) -> Result<usize, ValueError>;

    /// Length of the raw form stored at `offset`.
    fn raw_length(buf: &[u8], offset: usize) -> Result<usize, ValueError>;

    /// Compares two raw forms in place.
    fn compare_bytes(
        a: &[u8],
        a_offset: usize,
        b: &[u8],
        b_offset: usize,
    ) -> Result<Ordering, ValueError>;
}

/// Reads and validates a presence byte from a stream.
pub(crate) fn get_presence(buf: &mut impl Buf) -> Result<bool, ValueError> {
    if !buf.has_remaining() {
        return Err(ValueError::malformed("unexpected end of data"));
    }
    match buf.get_u8() {
        ABSENT => Ok(false),
        PRESENT => Ok(true),
        other => Err(ValueError::Malformed(format!(
            "invalid presence byte: 0x{other:02X}"
        ))),
    }
}

/// Reads and validates a presence byte from a raw form.
pub(crate) fn presence_at(buf: &[u8], offset: usize) -> Result<bool, ValueError> {
    match crate::order::read_u8(buf, offset)? {
        ABSENT => Ok(false),
        PRESENT => Ok(true),
        other => Err(ValueError::Malformed(format!(
            "invalid presence byte 0x{other:02X} at offset {offset}"
        ))),
    }
}

pub(crate) fn ensure_stream(buf: &impl Buf, needed: usize) -> Result<(), ValueError> {
    if buf.remaining() < needed {
        Err(ValueError::Malformed(format!(
            "need {needed} bytes but only {} remaining",
            buf.remaining()
        )))
    } else {
        Ok(())
    }
}

/// Orders two optional values null first.
pub(crate) fn compare_nullable<T>(
    a: Option<T>,
    b: Option<T>,
    compare: impl FnOnce(T, T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare(a, b),
    }
}
