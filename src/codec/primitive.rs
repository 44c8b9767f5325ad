//! Fixed-width big-endian primitives and length-prefixed blocks.
//!
//! Readers work over any [`bytes::Buf`], writers over any [`bytes::BufMut`].
//! Layout of a length-prefixed block:
//! ```text
//! ┌──────────┬────────────────────┐
//! │ Length   │ Raw bytes          │
//! │ int16 BE │ `length` bytes     │
//! └──────────┴────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use abx_codec::codec::{PrimitiveReader, PrimitiveWriter};
//! use bytes::BytesMut;
//!
//! let mut writer = PrimitiveWriter::new(BytesMut::new());
//! writer.write_i32(-42);
//! writer.write_string("hi").unwrap();
//! let bytes = writer.into_inner().freeze();
//!
//! let mut reader = PrimitiveReader::new(bytes);
//! assert_eq!(reader.read_i32().unwrap(), -42);
//! assert_eq!(reader.read_string().unwrap(), "hi");
//! assert!(!reader.has_remaining());
//! ```

use bytes::{Buf, BufMut, Bytes};

use crate::error::{AbxError, Result};

/// Largest string or block length expressible by the `int16` prefix.
pub const MAX_BLOCK_LEN: usize = i16::MAX as usize;

/// How string bytes that are not valid UTF-8 are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Utf8Policy {
    /// Replace invalid sequences with U+FFFD.
    #[default]
    Lossy,
    /// Fail with [`AbxError::InvalidUtf8`].
    Strict,
}

impl Utf8Policy {
    /// Convert raw string bytes to text according to the policy.
    pub fn to_text(self, bytes: &[u8]) -> Result<String> {
        match self {
            Utf8Policy::Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Utf8Policy::Strict => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| AbxError::InvalidUtf8),
        }
    }
}

/// Sequential big-endian reader.
///
/// Every read checks the remaining length first and fails with
/// [`AbxError::TruncatedInput`] instead of panicking.
#[derive(Debug)]
pub struct PrimitiveReader<B> {
    buf: B,
    utf8: Utf8Policy,
}

impl<B: Buf> PrimitiveReader<B> {
    /// Create a reader with the lossy UTF-8 policy.
    pub fn new(buf: B) -> Self {
        Self::with_utf8_policy(buf, Utf8Policy::default())
    }

    /// Create a reader with an explicit UTF-8 policy.
    pub fn with_utf8_policy(buf: B, utf8: Utf8Policy) -> Self {
        Self { buf, utf8 }
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Check if any bytes are left.
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.buf.has_remaining()
    }

    #[inline]
    fn ensure(&self, len: usize) -> Result<()> {
        if self.buf.remaining() < len {
            return Err(AbxError::TruncatedInput);
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Read a big-endian `int16`.
    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    /// Read a big-endian `int32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.buf.get_i32())
    }

    /// Read a big-endian `int64`.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(self.buf.get_i64())
    }

    /// Read a big-endian IEEE754 single.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(self.buf.get_f32())
    }

    /// Read a big-endian IEEE754 double.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        Ok(self.buf.get_f64())
    }

    /// Read exactly `len` raw bytes.
    pub fn read_raw(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        Ok(self.buf.copy_to_bytes(len))
    }

    /// Read an `int16` length followed by that many bytes.
    ///
    /// A negative length is a protocol violation.
    pub fn read_block(&mut self) -> Result<Bytes> {
        let len = self.read_i16()?;
        if len < 0 {
            return Err(AbxError::Protocol(format!("Negative block length {}", len)));
        }
        self.read_raw(len as usize)
    }

    /// Read a length-prefixed string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_i16()?;
        if len < 0 {
            return Err(AbxError::Protocol(format!("Negative string length {}", len)));
        }
        let raw = self.read_raw(len as usize)?;
        self.utf8.to_text(&raw)
    }

    /// Convert raw bytes to text with this reader's UTF-8 policy.
    #[inline]
    pub fn text(&self, bytes: &[u8]) -> Result<String> {
        self.utf8.to_text(bytes)
    }
}

/// Sequential big-endian writer.
#[derive(Debug, Default)]
pub struct PrimitiveWriter<B> {
    buf: B,
}

impl<B: BufMut> PrimitiveWriter<B> {
    /// Wrap a buffer.
    pub fn new(buf: B) -> Self {
        Self { buf }
    }

    /// Unwrap the buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Get a reference to the buffer.
    pub fn get_ref(&self) -> &B {
        &self.buf
    }

    /// Write a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Write a big-endian `int16`.
    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    /// Write a big-endian `int32`.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    /// Write a big-endian `int64`.
    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    /// Write a big-endian IEEE754 single.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buf.put_f32(value);
    }

    /// Write a big-endian IEEE754 double.
    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.buf.put_f64(value);
    }

    /// Write raw bytes without a length prefix.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Write an `int16` length followed by the bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AbxError::ValueTooLong`] if the block exceeds `i16::MAX` bytes.
    pub fn write_block(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_BLOCK_LEN {
            return Err(AbxError::ValueTooLong(bytes.len()));
        }
        self.write_i16(bytes.len() as i16);
        self.write_raw(bytes);
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string (length counts bytes).
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_block(value.as_bytes())
    }
}
