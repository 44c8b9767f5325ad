//! Codec module - the building blocks shared by encoder and decoder.
//!
//! - [`PrimitiveReader`] / [`PrimitiveWriter`] - big-endian scalars and
//!   `int16` length-prefixed blocks over `bytes::Buf` / `bytes::BufMut`
//! - [`InternTable`] - per-document string interning
//! - [`read_value`] / [`write_value`] - the 13 typed attribute payloads
//!
//! # Design
//!
//! Both directions go through the same three pieces and receive the intern
//! table by `&mut` reference, so one encode or decode never shares state
//! with another.

mod intern;
mod primitive;
mod typed;

pub use intern::InternTable;
pub use primitive::{PrimitiveReader, PrimitiveWriter, Utf8Policy, MAX_BLOCK_LEN};
pub use typed::{read_value, write_value};

pub(crate) use typed::{double_text, float_text};
