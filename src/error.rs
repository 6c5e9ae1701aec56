//! Error types for value boxes and their codecs.

use crate::text::quote;
use crate::value::ValueKind;

/// Errors that can occur while reading, decoding or parsing value boxes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A box without a value was read.
    #[error("value is not present")]
    EmptyValue,

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("not a number: {}", quote(.text))]
    NotANumber { text: String },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("unknown name: {0}")]
    UnknownName(String),

    #[error("duplicate name: {0}")]
    DuplicateName(String),
}

impl ValueError {
    /// Wraps any displayable message as a decode failure.
    pub fn malformed(e: impl std::fmt::Display) -> Self {
        Self::Malformed(e.to_string())
    }

    /// Creates a parse failure carrying the offending text.
    pub fn not_a_number(text: &str) -> Self {
        Self::NotANumber {
            text: text.to_owned(),
        }
    }

    /// Returns `true` for failures caused by bad input bytes.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}
