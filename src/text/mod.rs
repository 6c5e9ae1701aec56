//! Byte-level text helpers and number parsing.
//!
//! The search and trim helpers work on raw UTF-8 bytes so string boxes can
//! use them without decoding. Number parsers report every failure as
//! [`ValueError::NotANumber`] carrying the input.

use std::fmt::Write;
use std::ops::Range;

use crate::error::ValueError;
use crate::value::DecimalBox;

/// Counts code points by walking UTF-8 leading bytes.
///
/// Accepts the historical 5- and 6-byte forms. Continuation bytes are not
/// inspected; a truncated sequence or a stray continuation byte in leading
/// position is an error.
pub fn codepoint_count(bytes: &[u8]) -> Result<usize, ValueError> {
    let mut count = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        let lead = bytes[pos];
        let width = match lead.leading_ones() {
            0 => 1,
            n @ 2..=6 => n as usize,
            _ => {
                return Err(ValueError::Malformed(format!(
                    "invalid UTF-8 leading byte 0x{lead:02X} at offset {pos}"
                )));
            }
        };
        if pos + width > bytes.len() {
            return Err(ValueError::Malformed(format!(
                "truncated {width}-byte UTF-8 sequence at offset {pos}"
            )));
        }
        pos += width;
        count += 1;
    }
    Ok(count)
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\r' | b' ')
}

pub fn count_leading_whitespace(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| is_whitespace(b)).count()
}

pub fn count_trailing_whitespace(bytes: &[u8]) -> usize {
    bytes.iter().rev().take_while(|&&b| is_whitespace(b)).count()
}

/// Range of `bytes` left after removing tab, LF, CR and space from both ends.
pub fn trim_ascii_whitespace(bytes: &[u8]) -> Range<usize> {
    let start = count_leading_whitespace(bytes);
    if start == bytes.len() {
        return start..start;
    }
    start..bytes.len() - count_trailing_whitespace(bytes)
}

/// Offset of the first occurrence of `needle`. An empty needle is found at 0.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}

pub fn starts_with(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.starts_with(prefix)
}

pub fn ends_with(haystack: &[u8], suffix: &[u8]) -> bool {
    haystack.ends_with(suffix)
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

// Digits accumulate as a negative number so the type minimum parses without
// overflow; positive results are negated at the end.
macro_rules! parse_integer {
    ($($(#[$doc:meta])* $name:ident -> $ty:ty;)*) => {$(
        $(#[$doc])*
        pub fn $name(text: &str) -> Result<$ty, ValueError> {
            let fail = || ValueError::not_a_number(text);
            let (negative, digits) = split_sign(text);
            if digits.is_empty() {
                return Err(fail());
            }
            let mut acc: $ty = 0;
            for b in digits.bytes() {
                if !b.is_ascii_digit() {
                    return Err(fail());
                }
                acc = acc
                    .checked_mul(10)
                    .and_then(|v| v.checked_sub((b - b'0') as $ty))
                    .ok_or_else(fail)?;
            }
            if negative {
                Ok(acc)
            } else {
                acc.checked_neg().ok_or_else(fail)
            }
        }
    )*};
}

parse_integer! {
    /// Parses an optionally signed decimal `i8`.
    parse_byte -> i8;
    /// Parses an optionally signed decimal `i16`.
    parse_short -> i16;
    /// Parses an optionally signed decimal `i32`.
    parse_int -> i32;
    /// Parses an optionally signed decimal `i64`.
    parse_long -> i64;
}

/// Parses `[+-]digits[.digits][(e|E)[+-]digits]`, `[+-]Infinity` or
/// `[+-]NaN` as an `f32`.
///
/// Either side of the point may be empty, but not both. No whitespace is
/// allowed. Out-of-range magnitudes round to infinity or zero.
pub fn parse_float(text: &str) -> Result<f32, ValueError> {
    parse_floating(text)
}

/// Parses an `f64` with the same grammar as [`parse_float`].
pub fn parse_double(text: &str) -> Result<f64, ValueError> {
    parse_floating(text)
}

fn parse_floating<F: std::str::FromStr>(text: &str) -> Result<F, ValueError> {
    let (_, unsigned) = split_sign(text);
    let named = matches!(unsigned, "Infinity" | "NaN");
    if !named && unsigned.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return Err(ValueError::not_a_number(text));
    }
    text.parse().map_err(|_| ValueError::not_a_number(text))
}

/// Parses `[+-]digits[.digits][(e|E)[+-]digits]` into `target`.
///
/// Either side of the point may be empty, but not both. The magnitude is
/// built directly in the target's buffer. On failure the target is left
/// unchanged.
pub fn parse_decimal(text: &str, target: &mut DecimalBox) -> Result<(), ValueError> {
    let fail = || ValueError::not_a_number(text);
    let (negative, rest) = split_sign(text);
    let (mantissa, exponent) = match rest.find(['e', 'E']) {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int.is_empty() && frac.is_empty() {
        return Err(fail());
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(fail());
    }
    let exponent = match exponent {
        Some(e) => parse_long(e).map_err(|_| fail())?,
        None => 0,
    };
    let scale = i64::try_from(frac.len())
        .ok()
        .and_then(|f| f.checked_sub(exponent))
        .and_then(|s| i32::try_from(s).ok())
        .ok_or_else(fail)?;
    target.set_from_digits(
        negative,
        scale,
        int.bytes().chain(frac.bytes()).map(|b| b - b'0'),
    );
    Ok(())
}

/// Quotes `text` for use in diagnostics.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    quote_to(text, &mut out);
    out
}

pub fn quote_to(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
