//! Big-endian helpers shared by every raw codec.
//!
//! Raw forms are written into caller-owned buffers and read back at a caller
//! supplied offset. Readers never panic on short input; they report
//! [`ValueError::Malformed`] instead.
//!
//! Order-preserving transforms live here too:
//!
//! - signed integers are **biased** (sign bit flipped) so that unsigned
//!   big-endian comparison matches signed order;
//! - floats use the **sign-flip transform**: positive values get the sign bit
//!   flipped, negative values get every bit flipped.

pub mod varint;

use std::cmp::Ordering;

use crate::error::ValueError;

const F32_SIGN: u32 = 1 << 31;
const F64_SIGN: u64 = 1 << 63;

/// Fails unless `needed` bytes are available at `offset`.
pub fn ensure_remaining(buf: &[u8], offset: usize, needed: usize) -> Result<(), ValueError> {
    let remaining = buf.len().saturating_sub(offset);
    if offset > buf.len() || remaining < needed {
        Err(ValueError::Malformed(format!(
            "need {needed} bytes at offset {offset} but only {remaining} remaining"
        )))
    } else {
        Ok(())
    }
}

/// Borrows `len` bytes at `offset`.
pub fn slice_at(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], ValueError> {
    ensure_remaining(buf, offset, len)?;
    Ok(&buf[offset..offset + len])
}

fn array_at<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], ValueError> {
    let mut out = [0u8; N];
    out.copy_from_slice(slice_at(buf, offset, N)?);
    Ok(out)
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8, ValueError> {
    ensure_remaining(buf, offset, 1)?;
    Ok(buf[offset])
}

pub fn read_i8(buf: &[u8], offset: usize) -> Result<i8, ValueError> {
    read_u8(buf, offset).map(|b| b as i8)
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16, ValueError> {
    array_at(buf, offset).map(u16::from_be_bytes)
}

pub fn read_i16(buf: &[u8], offset: usize) -> Result<i16, ValueError> {
    array_at(buf, offset).map(i16::from_be_bytes)
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32, ValueError> {
    array_at(buf, offset).map(u32::from_be_bytes)
}

pub fn read_u64(buf: &[u8], offset: usize) -> Result<u64, ValueError> {
    array_at(buf, offset).map(u64::from_be_bytes)
}

/// Overwrites four bytes at `offset` with `value` in big-endian order.
pub fn write_u32_at(buf: &mut [u8], offset: usize, value: u32) -> Result<(), ValueError> {
    ensure_remaining(buf, offset, 4)?;
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    Ok(())
}

/// Overwrites eight bytes at `offset` with `value` in big-endian order.
pub fn write_u64_at(buf: &mut [u8], offset: usize, value: u64) -> Result<(), ValueError> {
    ensure_remaining(buf, offset, 8)?;
    buf[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
    Ok(())
}

/// Unsigned lexicographic comparison of two byte ranges.
///
/// A proper prefix sorts before the longer range.
pub fn compare_ranges(
    a: &[u8],
    a_off: usize,
    a_len: usize,
    b: &[u8],
    b_off: usize,
    b_len: usize,
) -> Result<Ordering, ValueError> {
    let left = slice_at(a, a_off, a_len)?;
    let right = slice_at(b, b_off, b_len)?;
    Ok(left.cmp(right))
}

pub const fn bias_i32(value: i32) -> u32 {
    (value as u32) ^ F32_SIGN
}

pub const fn unbias_i32(raw: u32) -> i32 {
    (raw ^ F32_SIGN) as i32
}

pub const fn bias_i64(value: i64) -> u64 {
    (value as u64) ^ F64_SIGN
}

pub const fn unbias_i64(raw: u64) -> i64 {
    (raw ^ F64_SIGN) as i64
}

pub fn sortable_f32(value: f32) -> u32 {
    let bits = value.to_bits();
    if bits & F32_SIGN != 0 {
        !bits
    } else {
        bits ^ F32_SIGN
    }
}

pub fn unsortable_f32(raw: u32) -> f32 {
    if raw & F32_SIGN != 0 {
        f32::from_bits(raw ^ F32_SIGN)
    } else {
        f32::from_bits(!raw)
    }
}

pub fn sortable_f64(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & F64_SIGN != 0 {
        !bits
    } else {
        bits ^ F64_SIGN
    }
}

pub fn unsortable_f64(raw: u64) -> f64 {
    if raw & F64_SIGN != 0 {
        f64::from_bits(raw ^ F64_SIGN)
    } else {
        f64::from_bits(!raw)
    }
}
