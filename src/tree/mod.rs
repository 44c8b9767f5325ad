//! Tree module - the in-memory document model.
//!
//! - [`Element`] - tag name, optional text, ordered attributes, children
//! - [`Attribute`] - data type plus the value's text form
//! - `Display` for [`Element`] - deterministic text listing

mod element;
mod render;

pub use element::{Attribute, Element};
