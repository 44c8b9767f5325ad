//! Typed attribute payloads.
//!
//! Attribute values are kept as text in the tree; this module converts that
//! text to and from the binary payload selected by the [`DataType`]:
//!
//! | Data type | Payload | Text form |
//! |---|---|---|
//! | `NULL`, `BOOLEAN_*` | none | absent, `true`, `false` |
//! | `INT` / `INT_HEX` | int32 | decimal / lower-case hex |
//! | `LONG` / `LONG_HEX` | int64 | decimal / lower-case hex |
//! | `FLOAT` / `DOUBLE` | IEEE754 | shortest round-trip form |
//! | `STRING` | length-prefixed string | literal |
//! | `STRING_INTERNED` | intern reference | literal |
//! | `BYTES_HEX` | length-prefixed bytes | hex digest |
//! | `BYTES_BASE64` | length-prefixed base64 | decoded bytes as text |

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use bytes::{Buf, BufMut};

use super::intern::InternTable;
use super::primitive::{PrimitiveReader, PrimitiveWriter};
use crate::error::{AbxError, Result};
use crate::protocol::DataType;
use crate::tree::Attribute;

/// Standard alphabet, padding optional on decode.
const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Text form of a FLOAT value.
pub(crate) fn float_text(value: f32) -> String {
    format!("{:?}", value)
}

/// Text form of a DOUBLE value.
pub(crate) fn double_text(value: f64) -> String {
    format!("{:?}", value)
}

/// Read the payload for `data_type` and return its text form.
///
/// `NULL` yields `None`; every other type yields `Some`.
pub fn read_value<B: Buf>(
    data_type: DataType,
    reader: &mut PrimitiveReader<B>,
    interns: &mut InternTable,
) -> Result<Option<String>> {
    let text = match data_type {
        DataType::Null => return Ok(None),
        DataType::BooleanTrue | DataType::BooleanFalse => {
            fixed_text(data_type).unwrap_or_default().to_owned()
        }
        DataType::Int => reader.read_i32()?.to_string(),
        DataType::IntHex => format!("{:x}", reader.read_i32()?),
        DataType::Long => reader.read_i64()?.to_string(),
        DataType::LongHex => format!("{:x}", reader.read_i64()?),
        DataType::Float => float_text(reader.read_f32()?),
        DataType::Double => double_text(reader.read_f64()?),
        DataType::String => reader.read_string()?,
        DataType::StringInterned => interns.read(reader)?,
        DataType::BytesHex => hex::encode(reader.read_block()?),
        DataType::BytesBase64 => {
            let encoded = reader.read_block()?;
            let raw = BASE64_LENIENT
                .decode(&encoded)
                .map_err(|e| AbxError::MalformedBase64(e.to_string()))?;
            reader.text(&raw)?
        }
    };
    Ok(Some(text))
}

/// Write the payload of `attribute`.
///
/// `name` is only used for error reporting.
pub fn write_value<B: BufMut>(
    name: &str,
    attribute: &Attribute,
    writer: &mut PrimitiveWriter<B>,
    interns: &mut InternTable,
) -> Result<()> {
    let data_type = attribute.data_type;
    if !data_type.has_payload() {
        if attribute.value() != fixed_text(data_type) {
            return Err(AbxError::InvalidTree(format!(
                "Attribute {:?} of type {} cannot hold {:?}",
                name, data_type, attribute.value
            )));
        }
        return Ok(());
    }

    let value = attribute
        .value
        .as_deref()
        .ok_or_else(|| AbxError::MissingValue {
            name: name.to_owned(),
            data_type,
        })?;

    match data_type {
        DataType::Null | DataType::BooleanTrue | DataType::BooleanFalse => {}
        DataType::Int => writer.write_i32(parse(data_type, value)?),
        DataType::IntHex => writer.write_i32(parse_hex_i32(value)?),
        DataType::Long => writer.write_i64(parse(data_type, value)?),
        DataType::LongHex => writer.write_i64(parse_hex_i64(value)?),
        DataType::Float => writer.write_f32(parse(data_type, value)?),
        DataType::Double => writer.write_f64(parse(data_type, value)?),
        DataType::String => writer.write_string(value)?,
        DataType::StringInterned => interns.write(writer, value)?,
        DataType::BytesHex => {
            let raw = hex::decode(value).map_err(|_| AbxError::MalformedHex(value.to_owned()))?;
            writer.write_block(&raw)?;
        }
        DataType::BytesBase64 => {
            let encoded = STANDARD.encode(value.as_bytes());
            writer.write_block(encoded.as_bytes())?;
        }
    }
    Ok(())
}

/// Text form implied by a payload-less data type.
fn fixed_text(data_type: DataType) -> Option<&'static str> {
    match data_type {
        DataType::BooleanTrue => Some("true"),
        DataType::BooleanFalse => Some("false"),
        _ => None,
    }
}

fn parse<T: std::str::FromStr>(data_type: DataType, value: &str) -> Result<T> {
    value.parse().map_err(|_| malformed(data_type, value))
}

fn malformed(data_type: DataType, value: &str) -> AbxError {
    AbxError::MalformedNumber {
        data_type,
        value: value.to_owned(),
    }
}

/// Accepts the unsigned form written by the decoder (`ffffffff`) as well as
/// a signed one (`-1`).
fn parse_hex_i32(value: &str) -> Result<i32> {
    u32::from_str_radix(value, 16)
        .map(|v| v as i32)
        .or_else(|_| i32::from_str_radix(value, 16))
        .map_err(|_| malformed(DataType::IntHex, value))
}

fn parse_hex_i64(value: &str) -> Result<i64> {
    u64::from_str_radix(value, 16)
        .map(|v| v as i64)
        .or_else(|_| i64::from_str_radix(value, 16))
        .map_err(|_| malformed(DataType::LongHex, value))
}
