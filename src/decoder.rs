//! Document decoder - rebuilds a tree from an ABX token stream.
//!
//! Implements a state machine over the flat token stream:
//! - an element stack of open elements (innermost last)
//! - `document_open` after START_DOCUMENT
//! - the root, once the outermost element closes
//!
//! Running out of input inside the token loop ends the document, as if
//! END_DOCUMENT had been read. The document is accepted only if its root
//! element was closed. [`DecoderConfig::strict_truncation`] turns a cut in
//! the middle of a token into [`AbxError::TruncatedInput`] instead.
//!
//! # Example
//!
//! ```
//! use abx_codec::Decoder;
//!
//! let bytes = [
//!     b'A', b'B', b'X', 0x00, // signature
//!     0x10, // START_DOCUMENT
//!     0x32, 0xFF, 0xFF, 0x00, 0x01, b'r', // START_TAG "r"
//!     0x33, 0x00, 0x00, // END_TAG ref 0
//!     0x11, // END_DOCUMENT
//! ];
//!
//! let root = Decoder::new().decode(&bytes[..]).unwrap();
//! assert_eq!(root.tag_name, "r");
//! ```

use bytes::Buf;

use crate::codec::{read_value, InternTable, PrimitiveReader, Utf8Policy};
use crate::error::{AbxError, Result};
use crate::protocol::{DataType, Token, TokenKind, SIGNATURE, SIGNATURE_SIZE};
use crate::tree::{Attribute, Element};

/// Default maximum element nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration for the decoder.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Fail with `TruncatedInput` when input ends inside a token.
    ///
    /// When `false`, a cut anywhere ends the document and only an unclosed
    /// root is reported.
    pub strict_truncation: bool,
    /// Conversion of string bytes to text.
    pub utf8: Utf8Policy,
    /// Maximum number of simultaneously open elements. A START_TAG past it
    /// fails with [`AbxError::DepthLimitExceeded`].
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            strict_truncation: false,
            utf8: Utf8Policy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Outcome of applying one token.
enum Step {
    Continue,
    Finished,
}

/// Mutable state of one decode run.
#[derive(Default)]
struct DocumentState {
    /// Open elements, innermost last.
    stack: Vec<Element>,
    document_open: bool,
    /// Set once the outermost element closes.
    root: Option<Element>,
    max_depth: usize,
}

impl DocumentState {
    fn top(&mut self, token: TokenKind) -> Result<&mut Element> {
        self.stack
            .last_mut()
            .ok_or_else(|| AbxError::Protocol(format!("{} without an open element", token)))
    }

    fn apply<B: Buf>(
        &mut self,
        token: Token,
        reader: &mut PrimitiveReader<B>,
        interns: &mut InternTable,
    ) -> Result<Step> {
        let Some(kind) = token.token_kind() else {
            tracing::debug!(
                "Ignoring reserved token kind {} (data type {})",
                token.kind,
                token.data_type
            );
            return Ok(Step::Continue);
        };

        match kind {
            TokenKind::StartDocument => {
                if !token.has_type(DataType::Null) || self.document_open {
                    return Err(invalid(kind, token));
                }
                self.document_open = true;
            }

            TokenKind::EndDocument => {
                if !token.has_type(DataType::Null) {
                    return Err(invalid(kind, token));
                }
                if !self.stack.is_empty() {
                    return Err(AbxError::UnclosedElements(self.stack.len()));
                }
                return Ok(Step::Finished);
            }

            TokenKind::StartTag => {
                if !token.has_type(DataType::StringInterned)
                    || !self.document_open
                    || self.root.is_some()
                {
                    return Err(invalid(kind, token));
                }
                if self.stack.len() >= self.max_depth {
                    return Err(AbxError::DepthLimitExceeded(self.max_depth));
                }
                let name = interns.read(reader)?;
                self.stack.push(Element::new(name));
            }

            TokenKind::EndTag => {
                if !token.has_type(DataType::StringInterned) {
                    return Err(invalid(kind, token));
                }
                self.top(kind)?;
                let name = interns.read(reader)?;

                let Some(element) = self.stack.pop() else {
                    return Err(invalid(kind, token));
                };
                if element.tag_name != name {
                    return Err(AbxError::TagMismatch {
                        expected: element.tag_name,
                        found: name,
                    });
                }

                match self.stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => self.root = Some(element),
                }
            }

            TokenKind::Text => {
                self.top(kind)?;
                let text = reader.read_string()?;
                self.top(kind)?.append_text(&text);
            }

            TokenKind::Attribute => {
                self.top(kind)?;
                let name = interns.read(reader)?;
                if self.top(kind)?.attributes.contains_key(&name) {
                    return Err(AbxError::DuplicateAttribute(name));
                }

                let data_type = token
                    .value_type()
                    .ok_or(AbxError::UnknownDataType(token.data_type))?;
                let value = read_value(data_type, reader, interns)?;
                self.top(kind)?
                    .attributes
                    .insert(name, Attribute { data_type, value });
            }
        }

        Ok(Step::Continue)
    }

    fn finish(self) -> Result<Element> {
        self.root.ok_or(AbxError::UnclosedElements(self.stack.len()))
    }
}

fn invalid(kind: TokenKind, token: Token) -> AbxError {
    let data_type = token
        .value_type()
        .map(DataType::name)
        .unwrap_or("UNKNOWN");
    AbxError::Protocol(format!("{} with data type {} is not allowed here", kind, data_type))
}

/// ABX document decoder.
///
/// A decoder can be reused; every call to [`Decoder::decode`] starts from an
/// empty intern table.
#[derive(Debug, Default)]
pub struct Decoder {
    config: DecoderConfig,
    interns: InternTable,
}

impl Decoder {
    /// Create a decoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a custom configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            interns: InternTable::new(),
        }
    }

    /// Get the decoder configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a complete document and return its root element.
    ///
    /// # Errors
    ///
    /// - [`AbxError::NotAbxFormat`] if the signature is missing
    /// - [`AbxError::UnclosedElements`] if the root never closes
    /// - [`AbxError::DepthLimitExceeded`] if elements nest deeper than
    ///   [`DecoderConfig::max_depth`]
    /// - any token-level error ([`AbxError::TagMismatch`],
    ///   [`AbxError::DuplicateAttribute`], [`AbxError::Protocol`], ...)
    pub fn decode<B: Buf>(&mut self, buf: B) -> Result<Element> {
        let mut reader = PrimitiveReader::with_utf8_policy(buf, self.config.utf8);

        if reader.remaining() < SIGNATURE_SIZE || reader.read_raw(SIGNATURE_SIZE)? != SIGNATURE[..]
        {
            return Err(AbxError::NotAbxFormat);
        }

        self.interns.clear();
        let mut state = DocumentState {
            max_depth: self.config.max_depth,
            ..Default::default()
        };
        tracing::trace!("Decoding ABX document ({} bytes)", reader.remaining());

        while reader.has_remaining() {
            let token = Token::decode(reader.read_u8()?);
            match state.apply(token, &mut reader, &mut self.interns) {
                Ok(Step::Continue) => {}
                Ok(Step::Finished) => break,
                Err(AbxError::TruncatedInput) if !self.config.strict_truncation => {
                    tracing::debug!(
                        "Input ended inside token 0x{:02x}, treating as end of document",
                        token.encode()
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        let root = state.finish()?;
        tracing::trace!("Decoded ABX document with {} interned strings", self.interns.len());
        Ok(root)
    }
}
