//! Error types for abx-codec.

use thiserror::Error;

use crate::protocol::DataType;

/// Main error type for all ABX encode/decode operations.
#[derive(Debug, Error)]
pub enum AbxError {
    /// I/O error while reading from a source or writing to a sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream does not start with the `ABX\0` signature.
    #[error("Not an ABX document (bad signature)")]
    NotAbxFormat,

    /// Not enough bytes left for a primitive read.
    #[error("Truncated input")]
    TruncatedInput,

    /// Illegal token, data type or token order.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// END_TAG name differs from the currently open element.
    #[error("Tag mismatch: expected </{expected}>, found </{found}>")]
    TagMismatch {
        /// Tag name of the open element.
        expected: String,
        /// Tag name carried by the END_TAG token.
        found: String,
    },

    /// Same attribute name written twice on one element.
    #[error("Duplicate attribute: {0}")]
    DuplicateAttribute(String),

    /// Stream ended while elements were still open.
    #[error("Document ended with {0} unclosed element(s)")]
    UnclosedElements(usize),

    /// Elements nest deeper than the decoder allows.
    #[error("Element nesting exceeds the limit of {0}")]
    DepthLimitExceeded(usize),

    /// Intern reference points past the end of the table.
    #[error("Bad intern reference {index} (table size {size})")]
    BadInternReference {
        /// Index read from the stream.
        index: usize,
        /// Number of strings interned so far.
        size: usize,
    },

    /// Intern table cannot address another string.
    #[error("Intern table full")]
    InternTableFull,

    /// BYTES_HEX value is not an even-length hex digest.
    #[error("Malformed hex value: {0:?}")]
    MalformedHex(String),

    /// BYTES_BASE64 payload is not valid base64.
    #[error("Malformed base64 payload: {0}")]
    MalformedBase64(String),

    /// Numeric attribute value could not be parsed.
    #[error("Malformed {data_type} value: {value:?}")]
    MalformedNumber {
        /// Data type the value was parsed as.
        data_type: DataType,
        /// Offending textual value.
        value: String,
    },

    /// Attribute of a valued data type has no value.
    #[error("Attribute {name:?} of type {data_type} has no value")]
    MissingValue {
        /// Attribute name.
        name: String,
        /// Declared data type.
        data_type: DataType,
    },

    /// Data-type nibble is not one of the 13 defined types.
    #[error("Unknown data type 0x{0:02x}")]
    UnknownDataType(u8),

    /// String or byte block does not fit an `i16` length prefix.
    #[error("Value too long for the wire format: {0} bytes")]
    ValueTooLong(usize),

    /// String bytes are not valid UTF-8 under the strict policy.
    #[error("Invalid UTF-8 in string value")]
    InvalidUtf8,

    /// Element has both text and children, or an attribute value does not
    /// fit its payload-less data type.
    #[error("Invalid tree: {0}")]
    InvalidTree(String),
}

/// Result type alias using AbxError.
pub type Result<T> = std::result::Result<T, AbxError>;
