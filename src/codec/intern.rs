//! Per-document string interning table.
//!
//! Tag names, attribute names and `STRING_INTERNED` values are written once
//! and referenced by index afterwards:
//! ```text
//! first use:  int16 -1 │ int16 len │ bytes
//! later uses: int16 index
//! ```
//!
//! Encoder and decoder each own a table and fill it in the same depth-first
//! order, so indices agree without being stored anywhere.
//!
//! # Example
//!
//! ```
//! use abx_codec::codec::{InternTable, PrimitiveReader, PrimitiveWriter};
//!
//! let mut writer = PrimitiveWriter::new(Vec::new());
//! let mut table = InternTable::new();
//! table.write(&mut writer, "item").unwrap();
//! table.write(&mut writer, "item").unwrap();
//!
//! let bytes = writer.into_inner();
//! assert_eq!(bytes, vec![0xFF, 0xFF, 0x00, 0x04, b'i', b't', b'e', b'm', 0x00, 0x00]);
//!
//! let mut reader = PrimitiveReader::new(&bytes[..]);
//! let mut table = InternTable::new();
//! assert_eq!(table.read(&mut reader).unwrap(), "item");
//! assert_eq!(table.read(&mut reader).unwrap(), "item");
//! ```

use std::collections::HashMap;

use bytes::{Buf, BufMut};

use super::primitive::{PrimitiveReader, PrimitiveWriter};
use crate::error::{AbxError, Result};
use crate::protocol::INTERN_DEFINITION;

/// Largest index an `int16` reference can carry.
const MAX_INTERN_INDEX: usize = i16::MAX as usize;

/// Ordered, append-only string table.
#[derive(Debug, Default, Clone)]
pub struct InternTable {
    /// Strings in definition order; position = wire index.
    strings: Vec<String>,
    /// Writer-side lookup: string -> first index.
    lookup: HashMap<String, usize>,
}

impl InternTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Drop all entries. Called at the start of every document.
    pub fn clear(&mut self) {
        self.strings.clear();
        self.lookup.clear();
    }

    /// Get the string at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Get the index of a previously interned string.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.lookup.get(value).copied()
    }

    fn push(&mut self, value: String) {
        let index = self.strings.len();
        // Re-definitions keep pointing at the first index, as a writer would.
        self.lookup.entry(value.clone()).or_insert(index);
        self.strings.push(value);
    }

    /// Write a reference to `value`, defining it first if it is new.
    ///
    /// # Errors
    ///
    /// Returns [`AbxError::InternTableFull`] if a new string would get an
    /// index an `int16` cannot address, or [`AbxError::ValueTooLong`] if the
    /// string does not fit a length prefix.
    pub fn write<B: BufMut>(&mut self, writer: &mut PrimitiveWriter<B>, value: &str) -> Result<()> {
        if let Some(index) = self.index_of(value) {
            writer.write_i16(index as i16);
            return Ok(());
        }

        if self.strings.len() > MAX_INTERN_INDEX {
            return Err(AbxError::InternTableFull);
        }

        writer.write_i16(INTERN_DEFINITION);
        writer.write_string(value)?;
        self.push(value.to_owned());
        Ok(())
    }

    /// Read a reference or definition and return the string.
    ///
    /// Any negative reference means a definition follows.
    ///
    /// # Errors
    ///
    /// Returns [`AbxError::BadInternReference`] if the index is past the end
    /// of the table.
    pub fn read<B: Buf>(&mut self, reader: &mut PrimitiveReader<B>) -> Result<String> {
        let reference = reader.read_i16()?;

        if reference < 0 {
            let value = reader.read_string()?;
            self.push(value.clone());
            return Ok(value);
        }

        let index = reference as usize;
        self.get(index)
            .map(str::to_owned)
            .ok_or(AbxError::BadInternReference {
                index,
                size: self.strings.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all(values: &[&str]) -> (Vec<u8>, InternTable) {
        let mut writer = PrimitiveWriter::new(Vec::new());
        let mut table = InternTable::new();
        for value in values {
            table.write(&mut writer, value).unwrap();
        }
        (writer.into_inner(), table)
    }

    #[test]
    fn test_first_use_defines_string() {
        let (bytes, table) = write_all(&["a"]);
        assert_eq!(bytes, vec![0xFF, 0xFF, 0x00, 0x01, b'a']);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), Some("a"));
    }

    #[test]
    fn test_second_use_is_reference() {
        let (bytes, table) = write_all(&["a", "b", "a", "b"]);
        assert_eq!(
            bytes,
            vec![
                0xFF, 0xFF, 0x00, 0x01, b'a', // define "a" -> 0
                0xFF, 0xFF, 0x00, 0x01, b'b', // define "b" -> 1
                0x00, 0x00, // ref 0
                0x00, 0x01, // ref 1
            ]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of("b"), Some(1));
    }

    #[test]
    fn test_reader_rebuilds_same_indices() {
        let (bytes, written) = write_all(&["root", "child", "root", "x", "child"]);

        let mut reader = PrimitiveReader::new(&bytes[..]);
        let mut table = InternTable::new();
        let mut read = Vec::new();
        while reader.has_remaining() {
            read.push(table.read(&mut reader).unwrap());
        }

        assert_eq!(read, vec!["root", "child", "root", "x", "child"]);
        assert_eq!(table.len(), written.len());
        for i in 0..table.len() {
            assert_eq!(table.get(i), written.get(i));
        }
    }

    #[test]
    fn test_bad_reference() {
        let mut reader = PrimitiveReader::new(&[0x00, 0x03][..]);
        let mut table = InternTable::new();
        let err = table.read(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            AbxError::BadInternReference { index: 3, size: 0 }
        ));
    }

    #[test]
    fn test_any_negative_reference_is_definition() {
        let bytes = [0x80, 0x00, 0x00, 0x02, b'o', b'k'];
        let mut reader = PrimitiveReader::new(&bytes[..]);
        let mut table = InternTable::new();
        assert_eq!(table.read(&mut reader).unwrap(), "ok");
        assert_eq!(table.get(0), Some("ok"));
    }

    #[test]
    fn test_redefinition_appends() {
        // Same string defined twice: both slots exist, like the stream says.
        let bytes = [
            0xFF, 0xFF, 0x00, 0x01, b'a', 0xFF, 0xFF, 0x00, 0x01, b'a', 0x00, 0x01,
        ];
        let mut reader = PrimitiveReader::new(&bytes[..]);
        let mut table = InternTable::new();
        for _ in 0..3 {
            assert_eq!(table.read(&mut reader).unwrap(), "a");
        }
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of("a"), Some(0));
    }

    #[test]
    fn test_clear_resets_indices() {
        let (_, mut table) = write_all(&["a", "b"]);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.index_of("a"), None);
    }

    #[test]
    fn test_table_full() {
        let mut writer = PrimitiveWriter::new(Vec::new());
        let mut table = InternTable::new();
        for i in 0..=MAX_INTERN_INDEX {
            table.write(&mut writer, &i.to_string()).unwrap();
        }
        assert_eq!(table.len(), MAX_INTERN_INDEX + 1);

        // Existing strings are still referenced fine.
        table.write(&mut writer, "0").unwrap();

        let err = table.write(&mut writer, "one too many").unwrap_err();
        assert!(matches!(err, AbxError::InternTableFull));
    }
}
