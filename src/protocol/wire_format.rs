//! Wire format constants and token byte encoding.
//!
//! Every ABX stream starts with a 4-byte signature followed by a sequence of
//! tokens. Each token begins with a single byte:
//! ```text
//! ┌────────────────┬────────────────┐
//! │ Data type      │ Token kind     │
//! │ bits 7..4      │ bits 3..0      │
//! └────────────────┴────────────────┘
//! ```
//!
//! All multi-byte fields that follow a token byte are Big Endian.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Document signature: ASCII `ABX` followed by a NUL byte.
pub const SIGNATURE: [u8; SIGNATURE_SIZE] = *b"ABX\0";

/// Signature size in bytes.
pub const SIGNATURE_SIZE: usize = 4;

/// Mask selecting the token kind nibble.
pub const TOKEN_KIND_MASK: u8 = 0x0F;

/// Mask selecting the data type nibble.
pub const DATA_TYPE_MASK: u8 = 0xF0;

/// Interned-string reference meaning "definition follows".
pub const INTERN_DEFINITION: i16 = -1;

/// Structural token kinds (low nibble of the token byte).
///
/// Nibbles 5 to 14 are reserved for XML constructs this format does not
/// carry (CDATA, entity refs, comments, ...) and are skipped by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// Opens the document.
    StartDocument = 0,
    /// Closes the document.
    EndDocument = 1,
    /// Opens an element; followed by an interned tag name.
    StartTag = 2,
    /// Closes an element; followed by an interned tag name.
    EndTag = 3,
    /// Text content; followed by a length-prefixed string.
    Text = 4,
    /// Attribute; followed by an interned name and a typed payload.
    Attribute = 15,
}

impl TokenKind {
    /// Map a token nibble to its kind, `None` for reserved nibbles.
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble & TOKEN_KIND_MASK {
            0 => Some(TokenKind::StartDocument),
            1 => Some(TokenKind::EndDocument),
            2 => Some(TokenKind::StartTag),
            3 => Some(TokenKind::EndTag),
            4 => Some(TokenKind::Text),
            15 => Some(TokenKind::Attribute),
            _ => None,
        }
    }

    /// Display name of the token kind.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::StartDocument => "START_DOCUMENT",
            TokenKind::EndDocument => "END_DOCUMENT",
            TokenKind::StartTag => "START_TAG",
            TokenKind::EndTag => "END_TAG",
            TokenKind::Text => "TEXT",
            TokenKind::Attribute => "ATTRIBUTE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value data types (high nibble of the token byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum DataType {
    /// No value.
    Null = 1,
    /// Length-prefixed UTF-8 string.
    String = 2,
    /// Interned string reference or definition.
    StringInterned = 3,
    /// Byte block rendered as a hex digest.
    BytesHex = 4,
    /// Base64 text block.
    BytesBase64 = 5,
    /// 32-bit signed integer, decimal form.
    Int = 6,
    /// 32-bit signed integer, hex form.
    IntHex = 7,
    /// 64-bit signed integer, decimal form.
    Long = 8,
    /// 64-bit signed integer, hex form.
    LongHex = 9,
    /// IEEE754 single precision.
    Float = 10,
    /// IEEE754 double precision.
    Double = 11,
    /// Boolean `true`, no payload.
    BooleanTrue = 12,
    /// Boolean `false`, no payload.
    BooleanFalse = 13,
}

/// Display names indexed by data type nibble.
const DATA_TYPE_NAMES: [&str; 14] = [
    "",
    "NULL",
    "STRING",
    "STRING_INTERNED",
    "BYTES_HEX",
    "BYTES_BASE64",
    "INT",
    "INT_HEX",
    "LONG",
    "LONG_HEX",
    "FLOAT",
    "DOUBLE",
    "BOOLEAN_TRUE",
    "BOOLEAN_FALSE",
];

impl DataType {
    /// All data types in nibble order.
    pub const ALL: [DataType; 13] = [
        DataType::Null,
        DataType::String,
        DataType::StringInterned,
        DataType::BytesHex,
        DataType::BytesBase64,
        DataType::Int,
        DataType::IntHex,
        DataType::Long,
        DataType::LongHex,
        DataType::Float,
        DataType::Double,
        DataType::BooleanTrue,
        DataType::BooleanFalse,
    ];

    /// Map a data type nibble (0..=15, unshifted) to its type.
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            1..=13 => Some(Self::ALL[(nibble - 1) as usize]),
            _ => None,
        }
    }

    /// The unshifted nibble value.
    #[inline]
    pub fn nibble(self) -> u8 {
        self as u8
    }

    /// Display name as used in the format description (e.g. `BYTES_HEX`).
    #[inline]
    pub fn name(self) -> &'static str {
        DATA_TYPE_NAMES[self as usize]
    }

    /// Check whether the type carries a payload after the attribute name.
    pub fn has_payload(self) -> bool {
        !matches!(
            self,
            DataType::Null | DataType::BooleanTrue | DataType::BooleanFalse
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded token byte.
///
/// Keeps the raw nibbles so that reserved kinds and unknown data types can
/// be reported rather than lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Token kind nibble (bits 3..0).
    pub kind: u8,
    /// Data type nibble, unshifted (bits 7..4).
    pub data_type: u8,
}

impl Token {
    /// Create a token from a kind and a data type.
    pub fn new(kind: TokenKind, data_type: DataType) -> Self {
        Self {
            kind: kind as u8,
            data_type: data_type.nibble(),
        }
    }

    /// Encode the token into a single byte.
    ///
    /// # Example
    ///
    /// ```
    /// use abx_codec::protocol::{DataType, Token, TokenKind};
    ///
    /// let byte = Token::new(TokenKind::StartTag, DataType::StringInterned).encode();
    /// assert_eq!(byte, 0x32);
    /// ```
    #[inline]
    pub fn encode(&self) -> u8 {
        (self.kind & TOKEN_KIND_MASK) | ((self.data_type << 4) & DATA_TYPE_MASK)
    }

    /// Split a token byte into its nibbles.
    #[inline]
    pub fn decode(byte: u8) -> Self {
        Self {
            kind: byte & TOKEN_KIND_MASK,
            data_type: (byte & DATA_TYPE_MASK) >> 4,
        }
    }

    /// Token kind, `None` for reserved nibbles.
    #[inline]
    pub fn token_kind(&self) -> Option<TokenKind> {
        TokenKind::from_nibble(self.kind)
    }

    /// Data type, `None` for nibbles outside the 13 defined types.
    #[inline]
    pub fn value_type(&self) -> Option<DataType> {
        DataType::from_nibble(self.data_type)
    }

    /// Check the token carries the given data type.
    #[inline]
    pub fn has_type(&self, data_type: DataType) -> bool {
        self.data_type == data_type.nibble()
    }
}

/// Encode a token byte (standalone function).
#[inline]
pub fn token_byte(kind: TokenKind, data_type: DataType) -> u8 {
    Token::new(kind, data_type).encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_bytes() {
        assert_eq!(SIGNATURE, [0x41, 0x42, 0x58, 0x00]);
        assert_eq!(SIGNATURE.len(), SIGNATURE_SIZE);
    }

    #[test]
    fn test_token_byte_layout() {
        assert_eq!(token_byte(TokenKind::StartDocument, DataType::Null), 0x10);
        assert_eq!(token_byte(TokenKind::EndDocument, DataType::Null), 0x11);
        assert_eq!(
            token_byte(TokenKind::StartTag, DataType::StringInterned),
            0x32
        );
        assert_eq!(token_byte(TokenKind::EndTag, DataType::StringInterned), 0x33);
        assert_eq!(token_byte(TokenKind::Text, DataType::String), 0x24);
        assert_eq!(token_byte(TokenKind::Attribute, DataType::Int), 0x6F);
        assert_eq!(token_byte(TokenKind::Attribute, DataType::BooleanFalse), 0xDF);
    }

    #[test]
    fn test_token_decode_splits_nibbles() {
        let token = Token::decode(0xAF);
        assert_eq!(token.kind, 15);
        assert_eq!(token.data_type, 10);
        assert_eq!(token.token_kind(), Some(TokenKind::Attribute));
        assert_eq!(token.value_type(), Some(DataType::Float));
    }

    #[test]
    fn test_reserved_token_kinds() {
        for nibble in 5..=14 {
            assert_eq!(TokenKind::from_nibble(nibble), None);
        }
    }

    #[test]
    fn test_unknown_data_types() {
        assert_eq!(DataType::from_nibble(0), None);
        assert_eq!(DataType::from_nibble(14), None);
        assert_eq!(DataType::from_nibble(15), None);
    }

    #[test]
    fn test_data_type_nibbles_match_table() {
        for (i, data_type) in DataType::ALL.iter().enumerate() {
            assert_eq!(data_type.nibble() as usize, i + 1);
            assert_eq!(DataType::from_nibble(data_type.nibble()), Some(*data_type));
        }
    }

    #[test]
    fn test_data_type_names() {
        assert_eq!(DataType::Null.name(), "NULL");
        assert_eq!(DataType::BytesHex.name(), "BYTES_HEX");
        assert_eq!(DataType::BooleanFalse.to_string(), "BOOLEAN_FALSE");
        assert_eq!(TokenKind::EndTag.to_string(), "END_TAG");
    }

    #[test]
    fn test_has_payload() {
        assert!(!DataType::Null.has_payload());
        assert!(!DataType::BooleanTrue.has_payload());
        assert!(DataType::Int.has_payload());
        assert!(DataType::BytesBase64.has_payload());
    }
}
