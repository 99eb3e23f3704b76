//! # Markup Tree
//!
//! The intermediate representation between the layout engine and HTML.
//!
//! ```text
//! Template + Row → Layout Engine → Node tree (inspectable) → HTML (escaped)
//! ```
//!
//! The layout engine only builds [`Node`]s. Escaping happens in one place,
//! [`Node::to_html`], so data values can never inject markup no matter which
//! cell type carried them.

mod html;

pub use html::{escape_attr, escape_text, is_safe_css_value};

/// One CSS declaration (`property: value;`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: &'static str,
    pub value: String,
}

/// An element with a tag, an optional class, inline style, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub class: Option<&'static str>,
    pub style: Vec<Declaration>,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            class: None,
            style: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<div>` shorthand.
    pub fn div() -> Self {
        Self::new("div")
    }

    /// `<img>` shorthand.
    pub fn img(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::new("img").attr("src", src).attr("alt", alt)
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    /// Append a style declaration.
    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.style.push(Declaration {
            property,
            value: value.into(),
        });
        self
    }

    /// Append a style declaration only when `enabled`.
    pub fn style_if(self, enabled: bool, property: &'static str, value: &str) -> Self {
        if enabled {
            self.style(property, value)
        } else {
            self
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Look up a style declaration by property name.
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    /// Look up an attribute by name.
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    /// The element inside this node, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Concatenated text content of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Element(e) => e.children.iter().map(Node::text_content).collect(),
        }
    }
}
