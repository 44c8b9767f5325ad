//! Element and attribute types.
//!
//! # Example
//!
//! ```
//! use abx_codec::tree::{Attribute, Element};
//!
//! let root = Element::new("package")
//!     .with_attribute("name", Attribute::string("com.example"))
//!     .with_attribute("version", Attribute::int(3))
//!     .with_child(Element::new("perm").with_text("INTERNET"));
//!
//! assert_eq!(root.attribute("version").and_then(|a| a.value()), Some("3"));
//! assert_eq!(root.find_child("perm").and_then(|c| c.text.as_deref()), Some("INTERNET"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::codec::{double_text, float_text};
use crate::error::{AbxError, Result};
use crate::protocol::DataType;

/// A typed attribute value, stored in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Wire data type used to encode the value.
    pub data_type: DataType,
    /// Text form of the value; `None` for `NULL`.
    pub value: Option<String>,
}

impl Attribute {
    /// Create an attribute from a data type and its text form.
    pub fn new(data_type: DataType, value: impl Into<String>) -> Self {
        Self {
            data_type,
            value: Some(value.into()),
        }
    }

    /// A `NULL` attribute.
    pub fn null() -> Self {
        Self {
            data_type: DataType::Null,
            value: None,
        }
    }

    /// A `BOOLEAN_TRUE` or `BOOLEAN_FALSE` attribute.
    pub fn boolean(value: bool) -> Self {
        let data_type = if value {
            DataType::BooleanTrue
        } else {
            DataType::BooleanFalse
        };
        Self::new(data_type, value.to_string())
    }

    /// An `INT` attribute.
    pub fn int(value: i32) -> Self {
        Self::new(DataType::Int, value.to_string())
    }

    /// An `INT_HEX` attribute.
    pub fn int_hex(value: i32) -> Self {
        Self::new(DataType::IntHex, format!("{:x}", value))
    }

    /// A `LONG` attribute.
    pub fn long(value: i64) -> Self {
        Self::new(DataType::Long, value.to_string())
    }

    /// A `LONG_HEX` attribute.
    pub fn long_hex(value: i64) -> Self {
        Self::new(DataType::LongHex, format!("{:x}", value))
    }

    /// A `FLOAT` attribute.
    pub fn float(value: f32) -> Self {
        Self::new(DataType::Float, float_text(value))
    }

    /// A `DOUBLE` attribute.
    pub fn double(value: f64) -> Self {
        Self::new(DataType::Double, double_text(value))
    }

    /// A `STRING` attribute.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(DataType::String, value)
    }

    /// A `STRING_INTERNED` attribute.
    pub fn interned(value: impl Into<String>) -> Self {
        Self::new(DataType::StringInterned, value)
    }

    /// A `BYTES_HEX` attribute holding `bytes`.
    pub fn bytes_hex(bytes: &[u8]) -> Self {
        Self::new(DataType::BytesHex, hex::encode(bytes))
    }

    /// A `BYTES_BASE64` attribute; `text` is base64-encoded on the wire.
    pub fn base64(text: impl Into<String>) -> Self {
        Self::new(DataType::BytesBase64, text)
    }

    /// Get the text form of the value.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// An element of the document tree.
///
/// An element holds either text or children, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name.
    pub tag_name: String,
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Attributes in insertion order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, Attribute>,
    /// Child elements in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            text: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Set the text content (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an attribute (builder style). A repeated name replaces the value
    /// and keeps the original position.
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.set_attribute(name, attribute);
        self
    }

    /// Append a child (builder style).
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        attribute: Attribute,
    ) -> Option<Attribute> {
        self.attributes.insert(name.into(), attribute)
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Append to the text content.
    pub fn append_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_owned()),
        }
    }

    /// Find the first direct child with the given tag name.
    pub fn find_child(&self, tag_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag_name == tag_name)
    }

    /// Check the text-or-children invariant for this element and all
    /// descendants.
    ///
    /// # Errors
    ///
    /// Returns [`AbxError::InvalidTree`] naming the first offending element.
    pub fn validate(&self) -> Result<()> {
        if self.text.is_some() && !self.children.is_empty() {
            return Err(AbxError::InvalidTree(format!(
                "<{}> has both text and {} child element(s)",
                self.tag_name,
                self.children.len()
            )));
        }
        self.children.iter().try_for_each(Element::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let element = Element::new("a")
            .with_attribute("x", Attribute::int(1))
            .with_attribute("y", Attribute::null())
            .with_child(Element::new("b"));

        assert_eq!(element.tag_name, "a");
        assert_eq!(element.attributes.len(), 2);
        assert_eq!(element.children.len(), 1);
        assert!(element.text.is_none());
    }

    #[test]
    fn test_attribute_order_preserved() {
        let element = Element::new("a")
            .with_attribute("z", Attribute::int(1))
            .with_attribute("a", Attribute::int(2))
            .with_attribute("m", Attribute::int(3));

        let names: Vec<&str> = element.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut element = Element::new("a")
            .with_attribute("x", Attribute::int(1))
            .with_attribute("y", Attribute::int(2));

        let previous = element.set_attribute("x", Attribute::string("new"));
        assert_eq!(previous, Some(Attribute::int(1)));
        assert_eq!(element.attributes.get_index(0).map(|(k, _)| k.as_str()), Some("x"));
        assert_eq!(element.attribute("x").and_then(Attribute::value), Some("new"));
    }

    #[test]
    fn test_append_text_concatenates() {
        let mut element = Element::new("t");
        element.append_text("ab");
        element.append_text("cd");
        assert_eq!(element.text.as_deref(), Some("abcd"));
    }

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Attribute::int(-42).value(), Some("-42"));
        assert_eq!(Attribute::int_hex(-1).value(), Some("ffffffff"));
        assert_eq!(Attribute::long_hex(255).value(), Some("ff"));
        assert_eq!(Attribute::float(2.0).value(), Some("2.0"));
        assert_eq!(Attribute::double(0.25).value(), Some("0.25"));
        assert_eq!(Attribute::bytes_hex(&[0x0A, 0xFF]).value(), Some("0aff"));
        assert_eq!(Attribute::boolean(false).data_type, DataType::BooleanFalse);
        assert_eq!(Attribute::null().value(), None);
    }

    #[test]
    fn test_validate_rejects_mixed_content() {
        let tree = Element::new("root").with_child(
            Element::new("bad")
                .with_text("x")
                .with_child(Element::new("c")),
        );
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("<bad>"));

        let ok = Element::new("root").with_child(Element::new("leaf").with_text("x"));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_serde_json_shape() {
        let element = Element::new("a").with_attribute("n", Attribute::int(7));
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tag_name": "a",
                "attributes": { "n": { "data_type": "INT", "value": "7" } }
            })
        );

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }
}
