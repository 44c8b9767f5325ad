//! Document encoder - writes a tree as an ABX token stream.
//!
//! The tree is walked depth-first:
//!
//! ```text
//! signature │ START_DOCUMENT
//!   START_TAG name │ ATTRIBUTE name payload … │ TEXT │ children … │ END_TAG name
//! END_DOCUMENT
//! ```
//!
//! The whole document is built in a `BytesMut` first, so a failed encode
//! never leaves partial output in the caller's sink.
//!
//! # Example
//!
//! ```
//! use abx_codec::tree::{Attribute, Element};
//! use abx_codec::{Decoder, Encoder};
//!
//! let tree = Element::new("root").with_attribute("a", Attribute::int(1));
//! let bytes = Encoder::new().encode(&tree).unwrap();
//! assert_eq!(&bytes[..4], b"ABX\0");
//!
//! let decoded = Decoder::new().decode(bytes).unwrap();
//! assert_eq!(decoded, tree);
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{write_value, InternTable, PrimitiveWriter};
use crate::error::Result;
use crate::protocol::{token_byte, DataType, TokenKind, SIGNATURE};
use crate::tree::Element;

/// Initial output buffer capacity.
const DEFAULT_CAPACITY: usize = 4 * 1024;

/// ABX document encoder.
///
/// Every call to [`Encoder::encode`] starts from an empty intern table.
#[derive(Debug, Default)]
pub struct Encoder {
    interns: InternTable,
}

impl Encoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a document rooted at `root`.
    ///
    /// # Errors
    ///
    /// - [`AbxError::InvalidTree`](crate::AbxError::InvalidTree) if any element
    ///   has both text and children (checked before anything is written), or
    ///   if a `NULL` or boolean attribute carries a value other than its own
    /// - [`AbxError::MalformedNumber`](crate::AbxError::MalformedNumber),
    ///   [`AbxError::MalformedHex`](crate::AbxError::MalformedHex),
    ///   [`AbxError::MissingValue`](crate::AbxError::MissingValue) for
    ///   attribute values that do not match their data type
    /// - [`AbxError::ValueTooLong`](crate::AbxError::ValueTooLong) for strings
    ///   longer than `i16::MAX` bytes
    pub fn encode(&mut self, root: &Element) -> Result<Bytes> {
        root.validate()?;

        self.interns.clear();
        let mut writer = PrimitiveWriter::new(BytesMut::with_capacity(DEFAULT_CAPACITY));

        writer.write_raw(&SIGNATURE);
        writer.write_u8(token_byte(TokenKind::StartDocument, DataType::Null));
        write_element(&mut writer, &mut self.interns, root)?;
        writer.write_u8(token_byte(TokenKind::EndDocument, DataType::Null));

        let bytes = writer.into_inner().freeze();
        tracing::trace!(
            "Encoded ABX document: {} bytes, {} interned strings",
            bytes.len(),
            self.interns.len()
        );
        Ok(bytes)
    }
}

fn write_element<B: BufMut>(
    writer: &mut PrimitiveWriter<B>,
    interns: &mut InternTable,
    element: &Element,
) -> Result<()> {
    writer.write_u8(token_byte(TokenKind::StartTag, DataType::StringInterned));
    interns.write(writer, &element.tag_name)?;

    for (name, attribute) in &element.attributes {
        writer.write_u8(token_byte(TokenKind::Attribute, attribute.data_type));
        interns.write(writer, name)?;
        write_value(name, attribute, writer, interns)?;
    }

    if let Some(text) = &element.text {
        writer.write_u8(token_byte(TokenKind::Text, DataType::String));
        writer.write_string(text)?;
    }

    for child in &element.children {
        write_element(writer, interns, child)?;
    }

    writer.write_u8(token_byte(TokenKind::EndTag, DataType::StringInterned));
    interns.write(writer, &element.tag_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AbxError;
    use crate::tree::Attribute;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_document_bytes() {
        let bytes = Encoder::new().encode(&Element::new("r")).unwrap();
        assert_eq!(
            &bytes[..],
            &[
                b'A', b'B', b'X', 0x00, // signature
                0x10, // START_DOCUMENT
                0x32, 0xFF, 0xFF, 0x00, 0x01, b'r', // START_TAG define "r"
                0x33, 0x00, 0x00, // END_TAG ref 0
                0x11, // END_DOCUMENT
            ][..]
        );
    }

    #[test]
    fn test_repeated_tag_is_referenced() {
        let tree = Element::new("list")
            .with_child(Element::new("item"))
            .with_child(Element::new("item"));
        let bytes = Encoder::new().encode(&tree).unwrap();

        let definitions = bytes.windows(6).filter(|w| w == b"\x00\x04item").count();
        assert_eq!(definitions, 1);
    }

    #[test]
    fn test_text_token() {
        let bytes = Encoder::new()
            .encode(&Element::new("t").with_text("hi"))
            .unwrap();
        // signature, START_DOCUMENT, START_TAG(5 + 1 byte name), then TEXT.
        assert_eq!(&bytes[11..16], &[0x24, 0x00, 0x02, b'h', b'i']);
    }

    #[test]
    fn test_attribute_name_interned_across_elements() {
        let tree = Element::new("r")
            .with_child(Element::new("c").with_attribute("id", Attribute::boolean(true)))
            .with_child(Element::new("c").with_attribute("id", Attribute::boolean(false)));
        let bytes = Encoder::new().encode(&tree).unwrap();

        let definitions = bytes.windows(4).filter(|w| w == b"\x00\x02id").count();
        assert_eq!(definitions, 1);
        // Second attribute token: BOOLEAN_FALSE | ATTRIBUTE, then ref 2 ("r"=0, "c"=1, "id"=2).
        assert!(bytes.windows(3).any(|w| w == [0xDFu8, 0x00, 0x02]));
    }

    #[test]
    fn test_invalid_tree_rejected() {
        let tree = Element::new("r").with_child(
            Element::new("mixed")
                .with_text("t")
                .with_child(Element::new("x")),
        );
        let err = Encoder::new().encode(&tree).unwrap_err();
        assert!(matches!(err, AbxError::InvalidTree(_)));
    }

    #[test]
    fn test_malformed_attribute_fails() {
        let tree = Element::new("r").with_attribute("n", Attribute::new(DataType::Int, "ten"));
        let err = Encoder::new().encode(&tree).unwrap_err();
        assert!(matches!(err, AbxError::MalformedNumber { .. }));
    }

    #[test]
    fn test_null_attribute_with_value_rejected() {
        let tree = Element::new("r").with_attribute("n", Attribute::new(DataType::Null, "x"));
        let err = Encoder::new().encode(&tree).unwrap_err();
        assert!(matches!(err, AbxError::InvalidTree(_)));
    }

    #[test]
    fn test_text_too_long() {
        let tree = Element::new("r").with_text("x".repeat(40_000));
        let err = Encoder::new().encode(&tree).unwrap_err();
        assert!(matches!(err, AbxError::ValueTooLong(40_000)));
    }

    #[test]
    fn test_encoder_reuse_resets_interns() {
        let mut encoder = Encoder::new();
        let tree = Element::new("r");
        let first = encoder.encode(&tree).unwrap();
        let second = encoder.encode(&tree).unwrap();
        assert_eq!(first, second);
    }
}
