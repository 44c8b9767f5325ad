//! Protocol module - signature, token kinds and data types.
//!
//! This module describes the ABX token grammar:
//! - 4-byte `ABX\0` signature
//! - Token byte = token kind nibble | data type nibble
//! - Data type table with static display names

mod wire_format;

pub use wire_format::{
    token_byte, DataType, Token, TokenKind, DATA_TYPE_MASK, INTERN_DEFINITION, SIGNATURE,
    SIGNATURE_SIZE, TOKEN_KIND_MASK,
};
