//! Fixed-width boxes: boolean, integers and floating point.

use std::cmp::Ordering;
use std::fmt;

use bytes::{Buf, BufMut};

use super::sealed::Sealed;
use super::{
    ABSENT, PRESENT, ValueKind, ValueOption, compare_nullable, ensure_stream, get_presence,
    presence_at,
};
use crate::error::ValueError;
use crate::order;

/// A scalar payload of a [`FixedBox`].
///
/// The raw payload is exactly [`WIDTH`](Self::WIDTH) bytes after the presence
/// byte; the stream payload has the same width in plain big-endian.
pub trait FixedValue: Copy + Default + fmt::Debug + fmt::Display + Sealed {
    const KIND: ValueKind;
    const WIDTH: usize;

    fn compare_values(&self, other: &Self) -> Ordering;

    fn put_stream(self, buf: &mut impl BufMut);

    /// Reads the payload; the caller has checked that `WIDTH` bytes remain.
    fn get_stream(buf: &mut impl Buf) -> Self;

    fn put_raw(self, buf: &mut impl BufMut);

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError>;

    /// Compares two raw payloads. Defaults to unsigned big-endian order.
    fn compare_raw(
        a: &[u8],
        a_offset: usize,
        b: &[u8],
        b_offset: usize,
    ) -> Result<Ordering, ValueError> {
        order::compare_ranges(a, a_offset, Self::WIDTH, b, b_offset, Self::WIDTH)
    }
}

impl Sealed for i8 {}
impl Sealed for i16 {}
impl Sealed for i32 {}
impl Sealed for i64 {}
impl Sealed for f32 {}
impl Sealed for f64 {}

// Byte and short keep their two's-complement bytes in the raw form, so the
// raw comparison reads them back as signed values.

impl FixedValue for i8 {
    const KIND: ValueKind = ValueKind::Byte;
    const WIDTH: usize = 1;

    fn compare_values(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn put_stream(self, buf: &mut impl BufMut) {
        buf.put_i8(self);
    }

    fn get_stream(buf: &mut impl Buf) -> Self {
        buf.get_i8()
    }

    fn put_raw(self, buf: &mut impl BufMut) {
        buf.put_i8(self);
    }

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError> {
        order::read_i8(buf, offset)
    }

    fn compare_raw(
        a: &[u8],
        a_offset: usize,
        b: &[u8],
        b_offset: usize,
    ) -> Result<Ordering, ValueError> {
        Ok(order::read_i8(a, a_offset)?.cmp(&order::read_i8(b, b_offset)?))
    }
}

impl FixedValue for i16 {
    const KIND: ValueKind = ValueKind::Short;
    const WIDTH: usize = 2;

    fn compare_values(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn put_stream(self, buf: &mut impl BufMut) {
        buf.put_i16(self);
    }

    fn get_stream(buf: &mut impl Buf) -> Self {
        buf.get_i16()
    }

    fn put_raw(self, buf: &mut impl BufMut) {
        buf.put_i16(self);
    }

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError> {
        order::read_i16(buf, offset)
    }

    fn compare_raw(
        a: &[u8],
        a_offset: usize,
        b: &[u8],
        b_offset: usize,
    ) -> Result<Ordering, ValueError> {
        Ok(order::read_i16(a, a_offset)?.cmp(&order::read_i16(b, b_offset)?))
    }
}

impl FixedValue for i32 {
    const KIND: ValueKind = ValueKind::Int;
    const WIDTH: usize = 4;

    fn compare_values(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn put_stream(self, buf: &mut impl BufMut) {
        buf.put_i32(self);
    }

    fn get_stream(buf: &mut impl Buf) -> Self {
        buf.get_i32()
    }

    fn put_raw(self, buf: &mut impl BufMut) {
        buf.put_u32(order::bias_i32(self));
    }

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError> {
        order::read_u32(buf, offset).map(order::unbias_i32)
    }
}

impl FixedValue for i64 {
    const KIND: ValueKind = ValueKind::Long;
    const WIDTH: usize = 8;

    fn compare_values(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn put_stream(self, buf: &mut impl BufMut) {
        buf.put_i64(self);
    }

    fn get_stream(buf: &mut impl Buf) -> Self {
        buf.get_i64()
    }

    fn put_raw(self, buf: &mut impl BufMut) {
        buf.put_u64(order::bias_i64(self));
    }

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError> {
        order::read_u64(buf, offset).map(order::unbias_i64)
    }
}

// Floats order by IEEE total order, which is exactly the order of the
// sign-flipped bit patterns: -NaN < -inf < ... < -0.0 < 0.0 < ... < inf < NaN.

impl FixedValue for f32 {
    const KIND: ValueKind = ValueKind::Float;
    const WIDTH: usize = 4;

    fn compare_values(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn put_stream(self, buf: &mut impl BufMut) {
        buf.put_f32(self);
    }

    fn get_stream(buf: &mut impl Buf) -> Self {
        buf.get_f32()
    }

    fn put_raw(self, buf: &mut impl BufMut) {
        buf.put_u32(order::sortable_f32(self));
    }

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError> {
        order::read_u32(buf, offset).map(order::unsortable_f32)
    }
}

impl FixedValue for f64 {
    const KIND: ValueKind = ValueKind::Double;
    const WIDTH: usize = 8;

    fn compare_values(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn put_stream(self, buf: &mut impl BufMut) {
        buf.put_f64(self);
    }

    fn get_stream(buf: &mut impl Buf) -> Self {
        buf.get_f64()
    }

    fn put_raw(self, buf: &mut impl BufMut) {
        buf.put_u64(order::sortable_f64(self));
    }

    fn get_raw(buf: &[u8], offset: usize) -> Result<Self, ValueError> {
        order::read_u64(buf, offset).map(order::unsortable_f64)
    }
}

/// A nullable box around a fixed-width scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBox<T: FixedValue> {
    present: bool,
    value: T,
}

pub type ByteBox = FixedBox<i8>;
pub type ShortBox = FixedBox<i16>;
pub type IntBox = FixedBox<i32>;
pub type LongBox = FixedBox<i64>;
pub type FloatBox = FixedBox<f32>;
pub type DoubleBox = FixedBox<f64>;

impl<T: FixedValue> FixedBox<T> {
    /// Creates an empty box.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(value: T) -> Self {
        Self {
            present: true,
            value,
        }
    }

    /// Returns the held value, or `EmptyValue` if the box is null.
    pub fn get(&self) -> Result<T, ValueError> {
        if self.present {
            Ok(self.value)
        } else {
            Err(ValueError::EmptyValue)
        }
    }

    /// Returns the held value, or `default` if the box is null.
    pub fn or(&self, default: T) -> T {
        if self.present { self.value } else { default }
    }

    pub fn as_option(&self) -> Option<T> {
        self.present.then_some(self.value)
    }

    pub fn set(&mut self, value: T) -> &mut Self {
        self.present = true;
        self.value = value;
        self
    }

    pub fn set_option(&mut self, value: Option<T>) -> &mut Self {
        match value {
            Some(v) => self.set(v),
            None => {
                self.present = false;
                self
            }
        }
    }
}

macro_rules! impl_add {
    ($($ty:ty => |$a:ident, $b:ident| $sum:expr),* $(,)?) => {$(
        impl FixedBox<$ty> {
            /// Adds `delta` to the held value.
            pub fn add(&mut self, delta: $ty) -> Result<&mut Self, ValueError> {
                let $a = self.get()?;
                let $b = delta;
                Ok(self.set($sum))
            }
        }
    )*};
}

// Integer overflow wraps, matching two's-complement record arithmetic.
impl_add!(
    i8 => |a, b| a.wrapping_add(b),
    i16 => |a, b| a.wrapping_add(b),
    i32 => |a, b| a.wrapping_add(b),
    i64 => |a, b| a.wrapping_add(b),
    f32 => |a, b| a + b,
    f64 => |a, b| a + b,
);

impl<T: FixedValue> ValueOption for FixedBox<T> {
    const KIND: ValueKind = T::KIND;

    fn is_null(&self) -> bool {
        !self.present
    }

    fn clear(&mut self) {
        self.present = false;
    }

    fn copy_from(&mut self, other: &Self) {
        *self = *other;
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_nullable(self.as_option(), other.as_option(), |a, b| {
            a.compare_values(&b)
        })
    }

    fn write_stream(&self, buf: &mut impl BufMut) {
        if self.present {
            buf.put_u8(PRESENT);
            self.value.put_stream(buf);
        } else {
            buf.put_u8(ABSENT);
        }
    }

    fn read_stream(&mut self, buf: &mut impl Buf) -> Result<(), ValueError> {
        if get_presence(buf)? {
            ensure_stream(buf, T::WIDTH)?;
            self.set(T::get_stream(buf));
        } else {
            self.clear();
        }
        Ok(())
    }

    fn size_in_bytes(&self) -> usize {
        if self.present { 1 + T::WIDTH } else { 1 }
    }

    fn emit(&self, buf: &mut Vec<u8>) {
        if self.present {
            buf.put_u8(PRESENT);
            self.value.put_raw(buf);
        } else {
            buf.put_u8(ABSENT);
        }
    }

    fn restore(&mut self, buf: &[u8], offset: usize) -> Result<usize, ValueError> {
        if presence_at(buf, offset)? {
            let value = T::get_raw(buf, offset + 1)?;
            self.set(value);
            Ok(1 + T::WIDTH)
        } else {
            self.clear();
            Ok(1)
        }
    }

    fn raw_length(buf: &[u8], offset: usize) -> Result<usize, ValueError> {
        if presence_at(buf, offset)? {
            order::ensure_remaining(buf, offset + 1, T::WIDTH)?;
            Ok(1 + T::WIDTH)
        } else {
            Ok(1)
        }
    }

    fn compare_bytes(
        a: &[u8],
        a_offset: usize,
        b: &[u8],
        b_offset: usize,
    ) -> Result<Ordering, ValueError> {
        match (presence_at(a, a_offset)?, presence_at(b, b_offset)?) {
            (false, false) => Ok(Ordering::Equal),
            (false, true) => Ok(Ordering::Less),
            (true, false) => Ok(Ordering::Greater),
            (true, true) => T::compare_raw(a, a_offset + 1, b, b_offset + 1),
        }
    }
}

impl<T: FixedValue> PartialEq for FixedBox<T> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl<T: FixedValue> Eq for FixedBox<T> {}

impl<T: FixedValue> PartialOrd for FixedBox<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: FixedValue> Ord for FixedBox<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<T: FixedValue> From<T> for FixedBox<T> {
    fn from(value: T) -> Self {
        Self::of(value)
    }
}

impl<T: FixedValue> From<Option<T>> for FixedBox<T> {
    fn from(value: Option<T>) -> Self {
        let mut b = Self::new();
        b.set_option(value);
        b
    }
}

impl<T: FixedValue> fmt::Display for FixedBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_option() {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "null"),
        }
    }
}

// -- Boolean --

const BOOLEAN_NULL: u8 = 0xFF;
const BOOLEAN_FALSE: u8 = 0x00;
const BOOLEAN_TRUE: u8 = 0x01;

/// A nullable boolean. Both forms are a single byte: -1 null, 0 false, 1 true.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanBox {
    present: bool,
    value: bool,
}

impl BooleanBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(value: bool) -> Self {
        Self {
            present: true,
            value,
        }
    }

    pub fn get(&self) -> Result<bool, ValueError> {
        if self.present {
            Ok(self.value)
        } else {
            Err(ValueError::EmptyValue)
        }
    }

    pub fn or(&self, default: bool) -> bool {
        if self.present { self.value } else { default }
    }

    pub fn as_option(&self) -> Option<bool> {
        self.present.then_some(self.value)
    }

    pub fn set(&mut self, value: bool) -> &mut Self {
        self.present = true;
        self.value = value;
        self
    }

    fn encoded(&self) -> u8 {
        match self.as_option() {
            None => BOOLEAN_NULL,
            Some(false) => BOOLEAN_FALSE,
            Some(true) => BOOLEAN_TRUE,
        }
    }

    fn decode(&mut self, byte: u8) -> Result<(), ValueError> {
        match byte {
            BOOLEAN_NULL => self.clear(),
            BOOLEAN_FALSE => {
                self.set(false);
            }
            BOOLEAN_TRUE => {
                self.set(true);
            }
            other => {
                return Err(ValueError::Malformed(format!(
                    "invalid boolean byte: 0x{other:02X}"
                )));
            }
        }
        Ok(())
    }
}

fn boolean_rank(buf: &[u8], offset: usize) -> Result<i8, ValueError> {
    match order::read_u8(buf, offset)? {
        b @ (BOOLEAN_NULL | BOOLEAN_FALSE | BOOLEAN_TRUE) => Ok(b as i8),
        other => Err(ValueError::Malformed(format!(
            "invalid boolean byte 0x{other:02X} at offset {offset}"
        ))),
    }
}

impl ValueOption for BooleanBox {
    const KIND: ValueKind = ValueKind::Boolean;

    fn is_null(&self) -> bool {
        !self.present
    }

    fn clear(&mut self) {
        self.present = false;
    }

    fn copy_from(&mut self, other: &Self) {
        *self = *other;
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_nullable(self.as_option(), other.as_option(), |a, b| a.cmp(&b))
    }

    fn write_stream(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.encoded());
    }

    fn read_stream(&mut self, buf: &mut impl Buf) -> Result<(), ValueError> {
        ensure_stream(buf, 1)?;
        self.decode(buf.get_u8())
    }

    fn size_in_bytes(&self) -> usize {
        1
    }

    fn emit(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.encoded());
    }

    fn restore(&mut self, buf: &[u8], offset: usize) -> Result<usize, ValueError> {
        self.decode(order::read_u8(buf, offset)?)?;
        Ok(1)
    }

    fn raw_length(buf: &[u8], offset: usize) -> Result<usize, ValueError> {
        boolean_rank(buf, offset).map(|_| 1)
    }

    fn compare_bytes(
        a: &[u8],
        a_offset: usize,
        b: &[u8],
        b_offset: usize,
    ) -> Result<Ordering, ValueError> {
        Ok(boolean_rank(a, a_offset)?.cmp(&boolean_rank(b, b_offset)?))
    }
}

impl PartialEq for BooleanBox {
    fn eq(&self, other: &Self) -> bool {
        self.as_option() == other.as_option()
    }
}

impl Eq for BooleanBox {}

impl PartialOrd for BooleanBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BooleanBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<bool> for BooleanBox {
    fn from(value: bool) -> Self {
        Self::of(value)
    }
}

impl fmt::Display for BooleanBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_option() {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "null"),
        }
    }
}
