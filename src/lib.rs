//! Valuebox — nullable value boxes with order-preserving binary forms.
//!
//! Every box holds either no value or one typed value, and is reused in
//! place from record to record. Each box type has a self-delimiting stream
//! form and a raw form whose byte-wise comparison matches value order, so
//! records can be sorted and merged without decoding.
//!
//! # Architecture
//!
//! - **`calendar`** — Proleptic Gregorian day and second counts, text layouts
//! - **`order`** — Big-endian readers, order-preserving transforms, varints
//! - **`text`** — Byte-level search and trim, number parsing
//! - **`value`** — Value boxes, the `ValueOption` contract, kind dispatch
//! - **`map`** — Named, fixed set of boxes

pub mod calendar;
pub mod error;
pub mod map;
pub mod order;
pub mod text;
pub mod value;

pub use error::ValueError;
pub use map::{ValueMap, ValueMapBuilder};
pub use value::{AnyValue, ValueKind, ValueOption};
