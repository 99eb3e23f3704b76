//! # HTML Serialization
//!
//! Converts markup trees to HTML strings.

use super::{Element, Node};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

/// Escape text content (`&`, `<`, `>`).
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Characters that would end a declaration or open a nested construct.
const CSS_BREAKOUT: &[char] = &[';', '{', '}', '\\', '(', ')'];

/// True if `value` stays a single CSS value inside `property: value;`.
pub fn is_safe_css_value(value: &str) -> bool {
    !value.contains(CSS_BREAKOUT)
}

impl Node {
    /// Serialize this node (and its subtree) to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(element) => element.write_html(out),
        }
    }
}

impl Element {
    /// Serialize this element to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);

        if let Some(class) = self.class {
            out.push_str(" class=\"");
            out.push_str(&escape_attr(class));
            out.push('"');
        }

        if !self.style.is_empty() {
            // A value that could start another declaration is dropped with its property.
            let style = self
                .style
                .iter()
                .filter(|d| is_safe_css_value(&d.value))
                .map(|d| format!("{}: {};", d.property, d.value))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(" style=\"");
            out.push_str(&escape_attr(&style));
            out.push('"');
        }

        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }

        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}
