//! Blocking adapters over `std::io` and the filesystem.
//!
//! Readers and writers are taken by value, so the underlying source or sink
//! is closed when the call returns, on success and on error alike.
//!
//! # Example
//!
//! ```
//! use abx_codec::transport::{read_document, write_document};
//! use abx_codec::tree::Element;
//!
//! let mut sink = Vec::new();
//! write_document(&mut sink, &Element::new("root")).unwrap();
//!
//! let root = read_document(&sink[..]).unwrap();
//! assert_eq!(root.tag_name, "root");
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::decoder::{Decoder, DecoderConfig};
use crate::encoder::Encoder;
use crate::error::Result;
use crate::tree::Element;

/// Read a whole document from `reader` with the default configuration.
pub fn read_document<R: Read>(reader: R) -> Result<Element> {
    read_document_with(reader, DecoderConfig::default())
}

/// Read a whole document from `reader`.
///
/// # Errors
///
/// Returns [`AbxError::Io`](crate::AbxError::Io) if reading fails, or any
/// decode error.
pub fn read_document_with<R: Read>(mut reader: R, config: DecoderConfig) -> Result<Element> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Decoder::with_config(config).decode(&buf[..])
}

/// Encode `root` and write it to `writer`, then flush.
///
/// Nothing is written if encoding fails.
pub fn write_document<W: Write>(mut writer: W, root: &Element) -> Result<()> {
    let bytes = Encoder::new().encode(root)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a document from a file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Element> {
    let path = path.as_ref();
    tracing::debug!("Reading ABX document from {}", path.display());
    read_document(File::open(path)?)
}

/// Write a document to a file.
///
/// Missing parent directories are created and an existing file is replaced.
/// The file is left untouched if encoding fails.
pub fn write_file(path: impl AsRef<Path>, root: &Element) -> Result<()> {
    let path = path.as_ref();
    let bytes = Encoder::new().encode(root)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    tracing::debug!("Writing {} byte ABX document to {}", bytes.len(), path.display());
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    Ok(())
}
