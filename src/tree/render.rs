//! Deterministic text rendering of a tree.
//!
//! Produces an XML-looking listing, one element per line:
//! ```text
//! <root a="1">
//! <title>Hello</title>
//! <empty/>
//! </root>
//! ```
//! Attribute values are printed in their text form (`null` for `NULL`),
//! with `&`, `<` and `"` escaped. There is no trailing newline.

use std::fmt::{self, Write as _};

use super::Element;

fn escape(out: &mut String, value: &str, quote: bool) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn render(element: &Element, out: &mut String) -> fmt::Result {
    write!(out, "<{}", element.tag_name)?;
    for (name, attribute) in &element.attributes {
        write!(out, " {}=\"", name)?;
        escape(out, attribute.value().unwrap_or("null"), true);
        out.push('"');
    }

    if let Some(text) = &element.text {
        out.push('>');
        escape(out, text, false);
        writeln!(out, "</{}>", element.tag_name)?;
    } else if element.children.is_empty() {
        out.push_str("/>\n");
    } else {
        out.push_str(">\n");
        for child in &element.children {
            render(child, out)?;
        }
        writeln!(out, "</{}>", element.tag_name)?;
    }
    Ok(())
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        render(self, &mut out)?;
        f.write_str(out.trim_end_matches('\n'))
    }
}
