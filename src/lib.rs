//! # abx-codec
//!
//! Encoder and decoder for ABX, a compact binary encoding of an XML-like
//! document tree.
//!
//! An ABX document is a flat stream of typed tokens (elements, attributes,
//! text) preceded by the signature `ABX\0`. Tag and attribute names go through
//! a per-document intern table, so each distinct name is written once.
//!
//! ## Architecture
//!
//! - **Tree** ([`tree`]): the in-memory model, [`Element`] and [`Attribute`]
//! - **Codec** ([`codec`]): big-endian primitives, the intern table and the
//!   13 typed attribute encodings
//! - **Protocol** ([`protocol`]): wire constants and the token byte
//! - **Decoder / Encoder**: the token state machine and the depth-first writer
//! - **Transport** ([`transport`]): `std::io`, file and `tokio` adapters
//!
//! ## Example
//!
//! ```
//! use abx_codec::{Attribute, Element};
//!
//! let tree = Element::new("root")
//!     .with_attribute("a", Attribute::int(1))
//!     .with_child(Element::new("child"));
//!
//! let bytes = abx_codec::encode(&tree).unwrap();
//! let decoded = abx_codec::decode(&bytes).unwrap();
//!
//! assert_eq!(decoded, tree);
//! assert_eq!(decoded.to_string(), "<root a=\"1\">\n<child/>\n</root>");
//! ```

pub mod codec;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod tree;

mod decoder;
mod encoder;

use bytes::Bytes;

pub use codec::Utf8Policy;
pub use decoder::{Decoder, DecoderConfig, DEFAULT_MAX_DEPTH};
pub use encoder::Encoder;
pub use error::{AbxError, Result};
pub use protocol::DataType;
pub use tree::{Attribute, Element};

/// Decode a complete ABX document with the default configuration.
pub fn decode(bytes: &[u8]) -> Result<Element> {
    Decoder::new().decode(bytes)
}

/// Encode a document rooted at `root`.
pub fn encode(root: &Element) -> Result<Bytes> {
    Encoder::new().encode(root)
}
