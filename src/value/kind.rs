//! Closed dispatch over every box kind.
//!
//! [`ValueKind`] names a kind; [`AnyValue`] holds one box of any kind. Raw
//! records are sequences of raw forms whose kinds are known only at run
//! time, so [`ValueKind::compare_bytes`] and [`compare_record_bytes`] are the
//! entry points used by external sort and merge code.

use std::cmp::Ordering;
use std::fmt;

use bytes::{Buf, BufMut};

use super::{
    BooleanBox, ByteBox, DateBox, DateTimeBox, DecimalBox, DoubleBox, FloatBox, IntBox, LongBox,
    ShortBox, StringBox, ValueOption,
};
use crate::error::ValueError;

fn mismatch(expected: ValueKind, found: ValueKind) -> ValueError {
    ValueError::TypeMismatch { expected, found }
}

macro_rules! value_kinds {
    ($($kind:ident($box:ty) $name:literal, $as_ref:ident, $as_mut:ident;)*) => {
        /// The kind of a value box.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ValueKind {
            $($kind,)*
        }

        impl ValueKind {
            pub const ALL: &'static [ValueKind] = &[$(ValueKind::$kind,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(ValueKind::$kind => $name,)*
                }
            }

            /// Creates an empty box of this kind.
            pub fn new_box(self) -> AnyValue {
                match self {
                    $(ValueKind::$kind => AnyValue::$kind(<$box>::default()),)*
                }
            }

            /// Length of a raw form of this kind stored at `offset`.
            pub fn raw_length(self, buf: &[u8], offset: usize) -> Result<usize, ValueError> {
                match self {
                    $(ValueKind::$kind => <$box as ValueOption>::raw_length(buf, offset),)*
                }
            }

            /// Compares two raw forms of this kind in place.
            pub fn compare_bytes(
                self,
                a: &[u8],
                a_offset: usize,
                b: &[u8],
                b_offset: usize,
            ) -> Result<Ordering, ValueError> {
                match self {
                    $(ValueKind::$kind => {
                        <$box as ValueOption>::compare_bytes(a, a_offset, b, b_offset)
                    })*
                }
            }
        }

        /// A box of any kind.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum AnyValue {
            $($kind($box),)*
        }

        impl AnyValue {
            pub fn kind(&self) -> ValueKind {
                match self {
                    $(AnyValue::$kind(_) => ValueKind::$kind,)*
                }
            }

            $(
                pub fn $as_ref(&self) -> Result<&$box, ValueError> {
                    match self {
                        AnyValue::$kind(b) => Ok(b),
                        other => Err(mismatch(ValueKind::$kind, other.kind())),
                    }
                }

                pub fn $as_mut(&mut self) -> Result<&mut $box, ValueError> {
                    match self {
                        AnyValue::$kind(b) => Ok(b),
                        other => Err(mismatch(ValueKind::$kind, other.kind())),
                    }
                }
            )*

            pub fn is_null(&self) -> bool {
                match self {
                    $(AnyValue::$kind(b) => b.is_null(),)*
                }
            }

            pub fn is_present(&self) -> bool {
                !self.is_null()
            }

            pub fn clear(&mut self) {
                match self {
                    $(AnyValue::$kind(b) => b.clear(),)*
                }
            }

            /// Copies `other` into this box in place. Both must be of the same kind.
            pub fn copy_from(&mut self, other: &AnyValue) -> Result<(), ValueError> {
                match (self, other) {
                    $((AnyValue::$kind(a), AnyValue::$kind(b)) => {
                        a.copy_from(b);
                        Ok(())
                    })*
                    (a, b) => Err(mismatch(a.kind(), b.kind())),
                }
            }

            /// Orders two boxes of the same kind, null first.
            pub fn compare(&self, other: &AnyValue) -> Result<Ordering, ValueError> {
                match (self, other) {
                    $((AnyValue::$kind(a), AnyValue::$kind(b)) => Ok(a.compare(b)),)*
                    (a, b) => Err(mismatch(a.kind(), b.kind())),
                }
            }

            pub fn write_stream(&self, buf: &mut impl BufMut) {
                match self {
                    $(AnyValue::$kind(b) => b.write_stream(buf),)*
                }
            }

            pub fn read_stream(&mut self, buf: &mut impl Buf) -> Result<(), ValueError> {
                let result = match self {
                    $(AnyValue::$kind(b) => b.read_stream(buf),)*
                };
                if let Err(e) = &result {
                    tracing::debug!(kind = %self.kind(), error = %e, "stream decode failed");
                }
                result
            }

            pub fn size_in_bytes(&self) -> usize {
                match self {
                    $(AnyValue::$kind(b) => b.size_in_bytes(),)*
                }
            }

            pub fn emit(&self, buf: &mut Vec<u8>) {
                match self {
                    $(AnyValue::$kind(b) => b.emit(buf),)*
                }
            }

            pub fn restore(&mut self, buf: &[u8], offset: usize) -> Result<usize, ValueError> {
                let result = match self {
                    $(AnyValue::$kind(b) => b.restore(buf, offset),)*
                };
                if let Err(e) = &result {
                    tracing::debug!(kind = %self.kind(), offset, error = %e, "raw restore failed");
                }
                result
            }
        }

        impl fmt::Display for AnyValue {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(AnyValue::$kind(b) => fmt::Display::fmt(b, f),)*
                }
            }
        }

        $(
            impl From<$box> for AnyValue {
                fn from(value: $box) -> Self {
                    AnyValue::$kind(value)
                }
            }
        )*
    };
}

value_kinds! {
    Boolean(BooleanBox) "boolean", as_boolean, as_boolean_mut;
    Byte(ByteBox) "byte", as_byte, as_byte_mut;
    Short(ShortBox) "short", as_short, as_short_mut;
    Int(IntBox) "int", as_int, as_int_mut;
    Long(LongBox) "long", as_long, as_long_mut;
    Float(FloatBox) "float", as_float, as_float_mut;
    Double(DoubleBox) "double", as_double, as_double_mut;
    Decimal(DecimalBox) "decimal", as_decimal, as_decimal_mut;
    Date(DateBox) "date", as_date, as_date_mut;
    DateTime(DateTimeBox) "datetime", as_datetime, as_datetime_mut;
    String(StringBox) "string", as_string, as_string_mut;
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compares two raw records field by field.
///
/// Each record is the concatenated raw forms of `kinds`, starting at offset
/// 0. The first unequal field decides; trailing bytes are ignored.
pub fn compare_record_bytes(
    kinds: &[ValueKind],
    a: &[u8],
    b: &[u8],
) -> Result<Ordering, ValueError> {
    let (mut a_offset, mut b_offset) = (0, 0);
    for (field, kind) in kinds.iter().enumerate() {
        let order = kind
            .compare_bytes(a, a_offset, b, b_offset)
            .and_then(|order| {
                a_offset += kind.raw_length(a, a_offset)?;
                b_offset += kind.raw_length(b, b_offset)?;
                Ok(order)
            })
            .inspect_err(|e| {
                tracing::debug!(
                    field,
                    %kind,
                    a_offset,
                    b_offset,
                    error = %e,
                    "record compare failed"
                );
            })?;
        if order != Ordering::Equal {
            return Ok(order);
        }
    }
    Ok(Ordering::Equal)
}
