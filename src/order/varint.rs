//! Variable-length integers for lengths and decimal scales.
//!
//! The leading byte tells how many bytes follow:
//!
//! | Value range            | Bytes | Format                            |
//! |------------------------|-------|-----------------------------------|
//! | 0 - 240                | 1     | `[value]`                         |
//! | 241 - 2287             | 2     | `[241 + (v-240)>>8, (v-240)&FF]`  |
//! | 2288 - 67823           | 3     | `[249, (v-2288)>>8, (v-2288)&FF]` |
//! | 67824 - 16777215       | 4     | `[250, v>>16, v>>8, v]`           |
//! | 16777216 - 4294967295  | 5     | `[251, v>>24, v>>16, v>>8, v]`    |
//! | 4294967296 - u64::MAX  | 9     | `[255, 8-byte big-endian]`        |
//!
//! Markers 252-254 are invalid. Signed values are zig-zag mapped first so
//! small magnitudes of either sign stay short.

use bytes::{Buf, BufMut};

use crate::error::ValueError;

pub fn varint_len(value: u64) -> usize {
    if value <= 240 {
        1
    } else if value <= 2287 {
        2
    } else if value <= 67823 {
        3
    } else if value <= 0xFF_FFFF {
        4
    } else if value <= 0xFFFF_FFFF {
        5
    } else {
        9
    }
}

pub fn put_varint(buf: &mut impl BufMut, value: u64) {
    if value <= 240 {
        buf.put_u8(value as u8);
    } else if value <= 2287 {
        let v = value - 240;
        buf.put_u8(((v >> 8) + 241) as u8);
        buf.put_u8((v & 0xFF) as u8);
    } else if value <= 67823 {
        let v = value - 2288;
        buf.put_u8(249);
        buf.put_u16(v as u16);
    } else if value <= 0xFF_FFFF {
        buf.put_u8(250);
        buf.put_uint(value, 3);
    } else if value <= 0xFFFF_FFFF {
        buf.put_u8(251);
        buf.put_u32(value as u32);
    } else {
        buf.put_u8(255);
        buf.put_u64(value);
    }
}

/// Number of bytes that follow a marker, or `None` for a reserved marker.
fn trailing_len(marker: u8) -> Option<usize> {
    match marker {
        0..=240 => Some(0),
        241..=248 => Some(1),
        249 => Some(2),
        250 => Some(3),
        251 => Some(4),
        255 => Some(8),
        _ => None,
    }
}

fn assemble(marker: u8, rest: &[u8]) -> u64 {
    let tail = rest.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    match marker {
        0..=240 => u64::from(marker),
        241..=248 => 240 + ((u64::from(marker) - 241) << 8) + tail,
        249 => 2288 + tail,
        _ => tail,
    }
}

fn invalid_marker(marker: u8) -> ValueError {
    ValueError::Malformed(format!("invalid varint marker: {marker}"))
}

/// Decodes a varint at `offset`, returning `(value, bytes_read)`.
pub fn decode_varint(buf: &[u8], offset: usize) -> Result<(u64, usize), ValueError> {
    let marker = super::read_u8(buf, offset)?;
    let extra = trailing_len(marker).ok_or_else(|| invalid_marker(marker))?;
    let rest = super::slice_at(buf, offset + 1, extra)?;
    Ok((assemble(marker, rest), extra + 1))
}

/// Reads a varint from a stream source.
pub fn get_varint(buf: &mut impl Buf) -> Result<u64, ValueError> {
    if !buf.has_remaining() {
        return Err(ValueError::malformed("unexpected end of data"));
    }
    let marker = buf.get_u8();
    let extra = trailing_len(marker).ok_or_else(|| invalid_marker(marker))?;
    if buf.remaining() < extra {
        return Err(ValueError::Malformed(format!(
            "truncated {}-byte varint",
            extra + 1
        )));
    }
    let mut rest = [0u8; 8];
    buf.copy_to_slice(&mut rest[..extra]);
    Ok(assemble(marker, &rest[..extra]))
}

pub const fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub const fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        put_varint(&mut buf, value);
        buf
    }

    #[test]
    fn marker_boundaries() {
        assert_eq!(encode(240), vec![240]);
        assert_eq!(encode(241), vec![241, 1]);
        assert_eq!(encode(2287), vec![248, 255]);
        assert_eq!(encode(2288), vec![249, 0, 0]);
        assert_eq!(encode(67823), vec![249, 0xFF, 0xFF]);
        assert_eq!(encode(67824), vec![250, 0x01, 0x08, 0xF0]);
        assert_eq!(encode(0x100_0000), vec![251, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(encode(u64::MAX)[0], 255);
    }

    #[test]
    fn boundary_values_decode_from_slice_and_stream() {
        let values = [
            0u64,
            1,
            240,
            241,
            2287,
            2288,
            67823,
            67824,
            0xFF_FFFF,
            0x100_0000,
            0xFFFF_FFFF,
            0x1_0000_0000,
            u64::MAX,
        ];
        for value in values {
            let mut buf = vec![0xAA];
            put_varint(&mut buf, value);
            assert_eq!(buf.len() - 1, varint_len(value), "len for {value}");

            let (decoded, read) = decode_varint(&buf, 1).unwrap();
            assert_eq!((decoded, read), (value, varint_len(value)));

            let mut cursor = &buf[1..];
            assert_eq!(get_varint(&mut cursor).unwrap(), value);
            assert!(cursor.is_empty());
        }
    }

    #[test]
    fn truncated_and_reserved_markers_fail() {
        assert!(decode_varint(&[], 0).is_err());
        assert!(decode_varint(&[241], 0).is_err());
        assert!(decode_varint(&[255, 0, 0, 0], 0).is_err());
        for marker in 252u8..=254 {
            assert!(decode_varint(&[marker, 0, 0, 0, 0], 0).is_err());
            let mut cursor: &[u8] = &[marker, 0, 0, 0, 0];
            assert!(get_varint(&mut cursor).is_err());
        }
        let mut cursor: &[u8] = &[250, 0];
        assert!(get_varint(&mut cursor).is_err());
    }

    #[test]
    fn zigzag_keeps_small_magnitudes_small() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(-1), 1);
        assert_eq!(zigzag(1), 2);
        assert_eq!(zigzag(-2), 3);
        for v in [i64::MIN, -300, -1, 0, 7, i64::MAX] {
            assert_eq!(unzigzag(zigzag(v)), v);
        }
    }
}
