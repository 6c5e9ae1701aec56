//! Arbitrary-precision decimal box.
//!
//! A decimal is `sign × magnitude × 10^(-scale)`, where the magnitude is an
//! unsigned big-endian byte string with no leading zero bytes. Zero has an
//! empty magnitude and is always [`Sign::Plus`].
//!
//! Stream and raw forms share one layout:
//!
//! ```text
//! head      u8       bit 0 = present, bit 1 = plus; a null is only 0x00
//! scale     varint   zig-zag mapped
//! length    varint   magnitude length in bytes
//! magnitude [u8]     big-endian
//! ```
//!
//! Comparison at equal scale works on the bytes directly. Different scales
//! fall back to an exact comparison through `num-bigint`.
//!
//! Decoders normalize what they read: leading zero bytes are dropped and a
//! zero magnitude is stored as [`Sign::Plus`]. The raw comparator applies the
//! same rules without copying.

use std::cmp::Ordering;
use std::fmt;

use bytes::{Buf, BufMut};
use num_bigint::{BigInt, BigUint};

use super::{ValueKind, ValueOption, compare_nullable, ensure_stream};
use crate::error::ValueError;
use crate::order::{self, varint};

const HEAD_ABSENT: u8 = 0x00;
const HEAD_MINUS: u8 = 0x01;
const HEAD_PLUS: u8 = 0x03;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    Minus,
    #[default]
    Plus,
}

/// A borrowed view of a present decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalRef<'a> {
    pub sign: Sign,
    pub scale: i32,
    pub magnitude: &'a [u8],
}

impl DecimalRef<'_> {
    pub fn is_zero(&self) -> bool {
        strip_leading_zeros(self.magnitude).is_empty()
    }

    pub fn to_big(&self) -> (BigInt, i32) {
        let sign = match self.sign {
            Sign::Minus => num_bigint::Sign::Minus,
            Sign::Plus => num_bigint::Sign::Plus,
        };
        (BigInt::from_bytes_be(sign, self.magnitude), self.scale)
    }
}

impl fmt::Display for DecimalRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            f.write_str("0")?;
            if self.scale > 0 {
                f.write_str(".")?;
                for _ in 0..self.scale {
                    f.write_str("0")?;
                }
            }
            return Ok(());
        }
        if self.sign == Sign::Minus {
            f.write_str("-")?;
        }
        let digits = BigUint::from_bytes_be(self.magnitude).to_string();
        if self.scale <= 0 {
            f.write_str(&digits)?;
            for _ in 0..self.scale.unsigned_abs() {
                f.write_str("0")?;
            }
            return Ok(());
        }
        let scale = self.scale.unsigned_abs() as usize;
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{int}.{frac}")
        } else {
            f.write_str("0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        }
    }
}

/// A nullable decimal backed by a reusable magnitude buffer.
#[derive(Debug, Clone, Default)]
pub struct DecimalBox {
    present: bool,
    sign: Sign,
    scale: i32,
    magnitude: Vec<u8>,
}

impl DecimalBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Result<DecimalRef<'_>, ValueError> {
        self.view().ok_or(ValueError::EmptyValue)
    }

    fn view(&self) -> Option<DecimalRef<'_>> {
        self.present.then_some(DecimalRef {
            sign: self.sign,
            scale: self.scale,
            magnitude: &self.magnitude,
        })
    }

    /// Sets the value, dropping leading zero bytes of `magnitude`.
    pub fn set(&mut self, sign: Sign, scale: i32, magnitude: &[u8]) -> &mut Self {
        let magnitude = strip_leading_zeros(magnitude);
        self.magnitude.clear();
        self.magnitude.extend_from_slice(magnitude);
        self.finish(sign, scale)
    }

    pub fn set_big(&mut self, value: &BigInt, scale: i32) -> &mut Self {
        let (sign, bytes) = value.to_bytes_be();
        let sign = match sign {
            num_bigint::Sign::Minus => Sign::Minus,
            _ => Sign::Plus,
        };
        self.set(sign, scale, &bytes)
    }

    /// Returns the unscaled value and the scale.
    pub fn to_big(&self) -> Result<(BigInt, i32), ValueError> {
        self.get().map(|d| d.to_big())
    }

    /// Adds `other` exactly, at the larger of the two scales.
    pub fn add(&mut self, other: &DecimalBox) -> Result<&mut Self, ValueError> {
        let (a, a_scale) = self.to_big()?;
        let (b, b_scale) = other.to_big()?;
        let scale = a_scale.max(b_scale);
        let sum = rescale(a, a_scale, scale) + rescale(b, b_scale, scale);
        Ok(self.set_big(&sum, scale))
    }

    pub fn parse_text(&mut self, text: &str) -> Result<(), ValueError> {
        crate::text::parse_decimal(text, self)
    }

    /// Builds the magnitude from decimal digit values in the box's own buffer.
    pub(crate) fn set_from_digits(
        &mut self,
        negative: bool,
        scale: i32,
        digits: impl IntoIterator<Item = u8>,
    ) -> &mut Self {
        self.magnitude.clear();
        for digit in digits {
            mul_add(&mut self.magnitude, 10, digit);
        }
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        self.finish(sign, scale)
    }

    fn finish(&mut self, sign: Sign, scale: i32) -> &mut Self {
        self.present = true;
        self.scale = scale;
        self.sign = if self.magnitude.is_empty() {
            Sign::Plus
        } else {
            sign
        };
        self
    }

    fn put(&self, buf: &mut impl BufMut) {
        match self.view() {
            None => buf.put_u8(HEAD_ABSENT),
            Some(d) => {
                buf.put_u8(match d.sign {
                    Sign::Minus => HEAD_MINUS,
                    Sign::Plus => HEAD_PLUS,
                });
                varint::put_varint(buf, varint::zigzag(i64::from(d.scale)));
                varint::put_varint(buf, d.magnitude.len() as u64);
                buf.put_slice(d.magnitude);
            }
        }
    }
}

/// Multiplies a big-endian magnitude by `factor` and adds `addend` in place.
fn mul_add(magnitude: &mut Vec<u8>, factor: u8, addend: u8) {
    let mut carry = u32::from(addend);
    for byte in magnitude.iter_mut().rev() {
        let v = u32::from(*byte) * u32::from(factor) + carry;
        *byte = (v & 0xFF) as u8;
        carry = v >> 8;
    }
    while carry != 0 {
        magnitude.insert(0, (carry & 0xFF) as u8);
        carry >>= 8;
    }
}

fn rescale(value: BigInt, from: i32, to: i32) -> BigInt {
    let shift = (i64::from(to) - i64::from(from)) as usize;
    value * num_traits::pow(BigInt::from(10u32), shift)
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn compare_decimals(a: DecimalRef<'_>, b: DecimalRef<'_>) -> Ordering {
    // A foreign minus zero still equals zero.
    let (a_sign, b_sign) = (effective_sign(&a), effective_sign(&b));
    match a_sign.cmp(&b_sign) {
        Ordering::Equal => {}
        other => return other,
    }
    let order = if a.scale == b.scale {
        compare_magnitudes(a.magnitude, b.magnitude)
    } else {
        compare_scaled(a.magnitude, a.scale, b.magnitude, b.scale)
    };
    match a_sign {
        Sign::Plus => order,
        Sign::Minus => order.reverse(),
    }
}

fn effective_sign(d: &DecimalRef<'_>) -> Sign {
    if d.is_zero() { Sign::Plus } else { d.sign }
}

/// Unsigned comparison of two big-endian magnitudes of any length.
fn compare_magnitudes(a: &[u8], b: &[u8]) -> Ordering {
    let (a, b) = (strip_leading_zeros(a), strip_leading_zeros(b));
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compares `a × 10^(-a_scale)` with `b × 10^(-b_scale)` exactly.
fn compare_scaled(a: &[u8], a_scale: i32, b: &[u8], b_scale: i32) -> Ordering {
    let (a, b) = (strip_leading_zeros(a), strip_leading_zeros(b));
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    let a = BigUint::from_bytes_be(a);
    let b = BigUint::from_bytes_be(b);
    let diff = i64::from(a_scale) - i64::from(b_scale);
    if diff > 0 {
        compare_shifted(&a, &b, diff.unsigned_abs())
    } else {
        compare_shifted(&b, &a, diff.unsigned_abs()).reverse()
    }
}

/// Compares `plain` with `shifted × 10^exp`, where `shifted` is non-zero.
fn compare_shifted(plain: &BigUint, shifted: &BigUint, exp: u64) -> Ordering {
    // 10^exp > 2^(3 * exp), which already exceeds any `plain` of fewer bits.
    if exp.saturating_mul(3) >= plain.bits() {
        return Ordering::Less;
    }
    let factor = num_traits::pow(BigUint::from(10u32), exp as usize);
    plain.cmp(&(shifted * factor))
}

/// A raw decimal parsed in place.
struct RawDecimal<'a> {
    value: Option<DecimalRef<'a>>,
    len: usize,
}

fn decode_scale(zigzag: u64) -> Result<i32, ValueError> {
    i32::try_from(varint::unzigzag(zigzag))
        .map_err(|_| ValueError::Malformed(format!("decimal scale out of range: {zigzag}")))
}

fn decode_length(len: u64) -> Result<usize, ValueError> {
    usize::try_from(len)
        .map_err(|_| ValueError::Malformed(format!("decimal length out of range: {len}")))
}

fn decode_head(head: u8) -> Result<Option<Sign>, ValueError> {
    match head {
        HEAD_ABSENT => Ok(None),
        HEAD_MINUS => Ok(Some(Sign::Minus)),
        HEAD_PLUS => Ok(Some(Sign::Plus)),
        other => Err(ValueError::Malformed(format!(
            "invalid decimal head: 0x{other:02X}"
        ))),
    }
}

fn parse_raw(buf: &[u8], offset: usize) -> Result<RawDecimal<'_>, ValueError> {
    let Some(sign) = decode_head(order::read_u8(buf, offset)?)? else {
        return Ok(RawDecimal {
            value: None,
            len: 1,
        });
    };
    let mut pos = offset + 1;
    let (scale, read) = varint::decode_varint(buf, pos)?;
    pos += read;
    let scale = decode_scale(scale)?;
    let (len, read) = varint::decode_varint(buf, pos)?;
    pos += read;
    let len = decode_length(len)?;
    let magnitude = order::slice_at(buf, pos, len)?;
    Ok(RawDecimal {
        value: Some(DecimalRef {
            sign,
            scale,
            magnitude,
        }),
        len: pos + len - offset,
    })
}

impl ValueOption for DecimalBox {
    const KIND: ValueKind = ValueKind::Decimal;

    fn is_null(&self) -> bool {
        !self.present
    }

    fn clear(&mut self) {
        self.present = false;
    }

    fn copy_from(&mut self, other: &Self) {
        self.present = other.present;
        self.sign = other.sign;
        self.scale = other.scale;
        self.magnitude.clear();
        self.magnitude.extend_from_slice(&other.magnitude);
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_nullable(self.view(), other.view(), compare_decimals)
    }

    fn write_stream(&self, buf: &mut impl BufMut) {
        self.put(buf);
    }

    fn read_stream(&mut self, buf: &mut impl Buf) -> Result<(), ValueError> {
        ensure_stream(buf, 1)?;
        let Some(sign) = decode_head(buf.get_u8())? else {
            self.clear();
            return Ok(());
        };
        let scale = decode_scale(varint::get_varint(buf)?)?;
        let len = decode_length(varint::get_varint(buf)?)?;
        ensure_stream(buf, len)?;
        self.magnitude.clear();
        self.magnitude.resize(len, 0);
        buf.copy_to_slice(&mut self.magnitude);
        let zeros = self.magnitude.len() - strip_leading_zeros(&self.magnitude).len();
        self.magnitude.drain(..zeros);
        self.finish(sign, scale);
        Ok(())
    }

    fn size_in_bytes(&self) -> usize {
        match self.view() {
            None => 1,
            Some(d) => {
                1 + varint::varint_len(varint::zigzag(i64::from(d.scale)))
                    + varint::varint_len(d.magnitude.len() as u64)
                    + d.magnitude.len()
            }
        }
    }

    fn emit(&self, buf: &mut Vec<u8>) {
        self.put(buf);
    }

    fn restore(&mut self, buf: &[u8], offset: usize) -> Result<usize, ValueError> {
        let raw = parse_raw(buf, offset)?;
        match raw.value {
            None => self.clear(),
            Some(d) => {
                self.set(d.sign, d.scale, d.magnitude);
            }
        }
        Ok(raw.len)
    }

    fn raw_length(buf: &[u8], offset: usize) -> Result<usize, ValueError> {
        parse_raw(buf, offset).map(|raw| raw.len)
    }

    fn compare_bytes(
        a: &[u8],
        a_offset: usize,
        b: &[u8],
        b_offset: usize,
    ) -> Result<Ordering, ValueError> {
        let a = parse_raw(a, a_offset)?;
        let b = parse_raw(b, b_offset)?;
        Ok(compare_nullable(a.value, b.value, compare_decimals))
    }
}

impl PartialEq for DecimalBox {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for DecimalBox {}

impl PartialOrd for DecimalBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl fmt::Display for DecimalBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.view() {
            Some(d) => fmt::Display::fmt(&d, f),
            None => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(unscaled: i64, scale: i32) -> DecimalBox {
        let mut b = DecimalBox::new();
        b.set_big(&BigInt::from(unscaled), scale);
        b
    }

    fn raw(b: &DecimalBox) -> Vec<u8> {
        let mut buf = Vec::new();
        b.emit(&mut buf);
        assert_eq!(buf.len(), b.size_in_bytes());
        buf
    }

    fn raw_compare(a: &DecimalBox, b: &DecimalBox) -> Ordering {
        DecimalBox::compare_bytes(&raw(a), 0, &raw(b), 0).unwrap()
    }

    #[test]
    fn set_normalizes_magnitude() {
        let mut b = DecimalBox::new();
        b.set(Sign::Minus, 2, &[0x00, 0x00, 0x01, 0x02]);
        let d = b.get().unwrap();
        assert_eq!((d.sign, d.scale, d.magnitude), (Sign::Minus, 2, &[0x01u8, 0x02][..]));

        b.set(Sign::Minus, 3, &[0x00, 0x00]);
        let d = b.get().unwrap();
        assert_eq!((d.sign, d.magnitude.len()), (Sign::Plus, 0));
        assert!(d.is_zero());
    }

    #[test]
    fn empty_box_fails_reads() {
        let b = DecimalBox::new();
        assert_eq!(b.get(), Err(ValueError::EmptyValue));
        assert_eq!(b.to_big(), Err(ValueError::EmptyValue));
        assert_eq!(b.to_string(), "null");
        assert_eq!(raw(&b), vec![0x00]);
    }

    #[test]
    fn raw_layout() {
        let mut b = DecimalBox::new();
        b.set(Sign::Plus, 2, &[0x01, 0x02]);
        assert_eq!(raw(&b), vec![0x03, 0x04, 0x02, 0x01, 0x02]);
        b.set(Sign::Minus, -1, &[0x07]);
        assert_eq!(raw(&b), vec![0x01, 0x01, 0x01, 0x07]);
        b.set(Sign::Plus, 0, &[]);
        assert_eq!(raw(&b), vec![0x03, 0x00, 0x00]);
    }

    #[test]
    fn trailing_zeros_compare_equal() {
        let a = dec(100, 2);
        let b = dec(10, 1);
        assert_eq!(a.compare(&b), Ordering::Equal);
        assert_eq!(raw_compare(&a, &b), Ordering::Equal);
        assert_eq!(a, b);
    }

    #[test]
    fn differing_scales_compare_by_value() {
        let two = dec(2, 0);
        let ten = dec(100, 1);
        assert_eq!(two.compare(&ten), Ordering::Less);
        assert_eq!(raw_compare(&two, &ten), Ordering::Less);

        assert_eq!(dec(-2, 0).compare(&dec(-100, 1)), Ordering::Greater);
        assert_eq!(dec(1, -3).compare(&dec(999, 0)), Ordering::Greater);
        assert_eq!(dec(1, 400).compare(&dec(1, 0)), Ordering::Less);
        assert_eq!(dec(0, 5).compare(&dec(0, -5)), Ordering::Equal);
        assert_eq!(dec(0, 5).compare(&dec(-1, 9)), Ordering::Greater);
    }

    #[test]
    fn sign_and_null_order() {
        let null = DecimalBox::new();
        let neg = dec(-5, 0);
        let zero = dec(0, 0);
        let pos = dec(5, 0);
        assert_eq!(raw_compare(&null, &neg), Ordering::Less);
        assert_eq!(raw_compare(&neg, &zero), Ordering::Less);
        assert_eq!(raw_compare(&zero, &pos), Ordering::Less);
        assert_eq!(raw_compare(&null, &DecimalBox::new()), Ordering::Equal);
        assert_eq!(dec(-500, 0).compare(&neg), Ordering::Less);
    }

    #[test]
    fn leading_zero_bytes_in_foreign_raw_form() {
        // head plus, scale 0, length 2, magnitude 00 05
        let foreign = [0x03, 0x00, 0x02, 0x00, 0x05];
        let five = raw(&dec(5, 0));
        assert_eq!(DecimalBox::compare_bytes(&foreign, 0, &five, 0), Ok(Ordering::Equal));
        let six = raw(&dec(6, 0));
        assert_eq!(DecimalBox::compare_bytes(&foreign, 0, &six, 0), Ok(Ordering::Less));
    }

    #[test]
    fn decoding_normalizes_foreign_forms() {
        let minus_zero = [0x01, 0x00, 0x00];
        let plus_zero = [0x03, 0x00, 0x00];
        assert_eq!(
            DecimalBox::compare_bytes(&minus_zero, 0, &plus_zero, 0),
            Ok(Ordering::Equal)
        );
        assert_eq!(
            DecimalBox::compare_bytes(&minus_zero, 0, &raw(&dec(-1, 0)), 0),
            Ok(Ordering::Greater)
        );

        let mut b = DecimalBox::new();
        assert_eq!(b.restore(&minus_zero, 0), Ok(3));
        assert_eq!(b.get().unwrap().sign, Sign::Plus);
        assert_eq!(raw(&b), plus_zero);

        b.read_stream(&mut &[0x01, 0x00, 0x02, 0x00, 0x00][..]).unwrap();
        let d = b.get().unwrap();
        assert_eq!((d.sign, d.magnitude.len()), (Sign::Plus, 0));

        let padded = [0x03, 0x00, 0x02, 0x00, 0x05];
        assert_eq!(b.restore(&padded, 0), Ok(5));
        assert_eq!(raw(&b), vec![0x03, 0x00, 0x01, 0x05]);

        b.read_stream(&mut &padded[..]).unwrap();
        let mut out = Vec::new();
        b.write_stream(&mut out);
        assert_eq!(out, vec![0x03, 0x00, 0x01, 0x05]);
    }

    #[test]
    fn stream_restore_shrinks_reused_buffer() {
        let mut target = DecimalBox::new();
        target.set(Sign::Plus, 0, &[0xFF; 8]);

        let mut buf = Vec::new();
        dec(-3, 1).write_stream(&mut buf);
        let mut cursor = &buf[..];
        target.read_stream(&mut cursor).unwrap();
        assert!(cursor.is_empty());
        assert_eq!(target.get().unwrap().magnitude, &[0x03]);
        assert_eq!(target.to_string(), "-0.3");

        let mut buf = Vec::new();
        DecimalBox::new().write_stream(&mut buf);
        target.read_stream(&mut &buf[..]).unwrap();
        assert!(target.is_null());
    }

    #[test]
    fn raw_restore_at_offset() {
        let value = dec(123_456_789, 4);
        let mut buf = vec![0xAB, 0xCD];
        value.emit(&mut buf);
        let mut restored = dec(9, 9);
        let read = restored.restore(&buf, 2).unwrap();
        assert_eq!(read, buf.len() - 2);
        assert_eq!(DecimalBox::raw_length(&buf, 2), Ok(read));
        assert_eq!(restored, value);
        assert_eq!(restored.to_string(), "12345.6789");
    }

    #[test]
    fn malformed_input() {
        let mut b = DecimalBox::new();
        assert!(b.restore(&[0x02], 0).unwrap_err().is_malformed());
        assert!(b.restore(&[0x03, 0x00, 0x03, 0x01], 0).is_err());
        assert!(b.restore(&[0x03, 0xFC], 0).is_err());
        assert!(DecimalBox::raw_length(&[], 0).is_err());

        let mut huge_scale = vec![0x03];
        varint::put_varint(&mut huge_scale, varint::zigzag(i64::from(i32::MAX) + 1));
        huge_scale.push(0x00);
        assert!(b.restore(&huge_scale, 0).is_err());

        let mut cursor: &[u8] = &[0x03, 0x00, 0x05, 0x01];
        assert!(b.read_stream(&mut cursor).is_err());
    }

    #[test]
    fn display_plain_notation() {
        assert_eq!(dec(100, 2).to_string(), "1.00");
        assert_eq!(dec(-5, 2).to_string(), "-0.05");
        assert_eq!(dec(3, -2).to_string(), "300");
        assert_eq!(dec(0, 2).to_string(), "0.00");
        assert_eq!(dec(0, -2).to_string(), "0");
        assert_eq!(dec(-42, 0).to_string(), "-42");
        assert_eq!(dec(1234, 2).to_string(), "12.34");
    }

    #[test]
    fn add_aligns_scales() {
        let mut a = dec(15, 1);
        a.add(&dec(225, 2)).unwrap();
        assert_eq!(a.to_big().unwrap(), (BigInt::from(375), 2));

        let mut b = dec(1, 0);
        b.add(&dec(-1, 0)).unwrap();
        assert_eq!(b.get().unwrap().sign, Sign::Plus);
        assert!(b.get().unwrap().is_zero());

        let mut empty = DecimalBox::new();
        assert_eq!(empty.add(&dec(1, 0)).unwrap_err(), ValueError::EmptyValue);
        assert_eq!(a.add(&DecimalBox::new()).unwrap_err(), ValueError::EmptyValue);
    }

    #[test]
    fn digits_build_minimal_magnitude() {
        let mut b = DecimalBox::new();
        b.set_from_digits(false, 0, [0, 0, 2, 5, 6]);
        assert_eq!(b.get().unwrap().magnitude, &[0x01, 0x00]);
        b.set_from_digits(true, 1, [0, 0]);
        let d = b.get().unwrap();
        assert_eq!((d.sign, d.magnitude.len(), d.scale), (Sign::Plus, 0, 1));
    }

    #[test]
    fn copy_from_reuses_storage() {
        let mut target = dec(i64::MAX, 0);
        target.copy_from(&dec(7, 3));
        assert_eq!(target, dec(7, 3));
        target.copy_from(&DecimalBox::new());
        assert!(target.is_null());
    }

    proptest! {
        #[test]
        fn compare_matches_exact_value(
            a in any::<i32>(), sa in 0i32..8,
            b in any::<i32>(), sb in 0i32..8,
        ) {
            let common = sa.max(sb);
            let left = i128::from(a) * 10i128.pow((common - sa) as u32);
            let right = i128::from(b) * 10i128.pow((common - sb) as u32);
            let (da, db) = (dec(i64::from(a), sa), dec(i64::from(b), sb));
            prop_assert_eq!(da.compare(&db), left.cmp(&right));
            prop_assert_eq!(raw_compare(&da, &db), left.cmp(&right));
        }

        #[test]
        fn stream_round_trip(v in any::<i64>(), scale in any::<i32>()) {
            let value = dec(v, scale);
            let mut buf = Vec::new();
            value.write_stream(&mut buf);
            prop_assert_eq!(buf.len(), value.size_in_bytes());
            let mut restored = DecimalBox::new();
            restored.read_stream(&mut &buf[..]).unwrap();
            prop_assert_eq!(restored.to_big().unwrap(), value.to_big().unwrap());
        }

        #[test]
        fn raw_round_trip(
            value in proptest::option::of((
                prop_oneof![Just(0i64), any::<i64>()],
                any::<i32>(),
            )),
        ) {
            let value = match value {
                Some((v, scale)) => dec(v, scale),
                None => DecimalBox::new(),
            };
            let mut buf = vec![0xEE];
            value.emit(&mut buf);
            let mut restored = dec(-77, 3);
            prop_assert_eq!(restored.restore(&buf, 1).unwrap(), buf.len() - 1);
            prop_assert_eq!(restored.is_null(), value.is_null());
            prop_assert_eq!(restored.to_big().ok(), value.to_big().ok());
            prop_assert_eq!(raw(&restored), buf[1..].to_vec());
        }
    }
}
