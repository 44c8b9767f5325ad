//! Async adapters over `tokio` I/O.
//!
//! The codec itself never awaits; these functions only move bytes between an
//! async source or sink and an in-memory buffer.
//!
//! # Example
//!
//! ```ignore
//! use abx_codec::transport::{read_document_async, write_document_async};
//!
//! let file = tokio::fs::File::open("packages.xml").await?;
//! let root = read_document_async(file).await?;
//! ```

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::decoder::{Decoder, DecoderConfig};
use crate::encoder::Encoder;
use crate::error::Result;
use crate::tree::Element;

/// Read a whole document from an async reader with the default configuration.
pub async fn read_document_async<R: AsyncRead + Unpin>(reader: R) -> Result<Element> {
    read_document_async_with(reader, DecoderConfig::default()).await
}

/// Read a whole document from an async reader.
pub async fn read_document_async_with<R: AsyncRead + Unpin>(
    mut reader: R,
    config: DecoderConfig,
) -> Result<Element> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Decoder::with_config(config).decode(&buf[..])
}

/// Encode `root`, write it to an async writer and shut the writer down.
///
/// Nothing is written if encoding fails.
pub async fn write_document_async<W: AsyncWrite + Unpin>(
    mut writer: W,
    root: &Element,
) -> Result<()> {
    let bytes = Encoder::new().encode(root)?;
    writer.write_all(&bytes).await?;
    writer.shutdown().await?;
    Ok(())
}
