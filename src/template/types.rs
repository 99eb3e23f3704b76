//! Cell definition types for label templates.
//!
//! All types derive `Serialize + Deserialize` so the same types are the Rust
//! API and the portable template document format. A cell serializes to one
//! flat JSON object:
//!
//! ```json
//! {"type": "qrcode", "name": "SKU", "col_span": 2, "row_span": 1,
//!  "height_val": "40px", "size": "12px", "bold": false, "italic": false,
//!  "bgcolor_col": "", "textcolor_col": "", "static_bgcolor": "", "static_textcolor": ""}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Widest a cell may span on the label grid.
pub const MAX_COL_SPAN: u32 = 6;

/// Placeholder shown when a bound column has no value in a row.
pub const NO_DATA: &str = "NO DATA";

pub const DEFAULT_HEIGHT: &str = "40px";
pub const DEFAULT_FONT_SIZE: &str = "12px";
pub const DEFAULT_STATIC_TEXT: &str = "Static Text";
pub const DEFAULT_LOGO_URL: &str = "/static/logo.png";

fn default_span() -> u32 {
    1
}

fn default_height() -> String {
    DEFAULT_HEIGHT.to_string()
}

fn default_font_size() -> String {
    DEFAULT_FONT_SIZE.to_string()
}

/// Cell type without its content payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    StaticText,
    Text,
    BarcodeText,
    #[serde(rename = "qrcode")]
    QrCode,
    ImageLogo,
}

impl CellType {
    pub const ALL: [CellType; 5] = [
        CellType::StaticText,
        CellType::Text,
        CellType::BarcodeText,
        CellType::QrCode,
        CellType::ImageLogo,
    ];

    /// Wire name, as used in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            CellType::StaticText => "static_text",
            CellType::Text => "text",
            CellType::BarcodeText => "barcode_text",
            CellType::QrCode => "qrcode",
            CellType::ImageLogo => "image_logo",
        }
    }

    /// Human-readable label for the designer.
    pub fn label(self) -> &'static str {
        match self {
            CellType::StaticText => "Static Text",
            CellType::Text => "Text (column)",
            CellType::BarcodeText => "Barcode Text (column)",
            CellType::QrCode => "QR Code (column)",
            CellType::ImageLogo => "Image / Logo",
        }
    }

    /// True for types whose content comes from a dataset column.
    pub fn is_dynamic(self) -> bool {
        matches!(
            self,
            CellType::Text | CellType::BarcodeText | CellType::QrCode
        )
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown cell type: {}", s))
    }
}

/// What a cell shows. One variant per cell type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CellKind {
    /// Literal text, centered.
    #[serde(rename = "static_text")]
    StaticText {
        #[serde(default)]
        content: String,
    },
    /// Column value, left-aligned.
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        name: String,
    },
    /// Column value, centered (for barcode fonts).
    #[serde(rename = "barcode_text")]
    BarcodeText {
        #[serde(default)]
        name: String,
    },
    /// Column value rendered as a QR code image.
    #[serde(rename = "qrcode")]
    QrCode {
        #[serde(default)]
        name: String,
    },
    /// Image from a URL (`name` holds the URL).
    #[serde(rename = "image_logo")]
    ImageLogo {
        #[serde(default)]
        name: String,
    },
}

impl CellKind {
    pub fn cell_type(&self) -> CellType {
        match self {
            CellKind::StaticText { .. } => CellType::StaticText,
            CellKind::Text { .. } => CellType::Text,
            CellKind::BarcodeText { .. } => CellType::BarcodeText,
            CellKind::QrCode { .. } => CellType::QrCode,
            CellKind::ImageLogo { .. } => CellType::ImageLogo,
        }
    }

    /// Column this cell reads its content from, for dynamic types.
    pub fn bound_column(&self) -> Option<&str> {
        match self {
            CellKind::Text { name }
            | CellKind::BarcodeText { name }
            | CellKind::QrCode { name } => Some(name),
            CellKind::StaticText { .. } | CellKind::ImageLogo { .. } => None,
        }
    }

    /// Short description for the designer's cell list.
    pub fn summary(&self) -> String {
        match self {
            CellKind::StaticText { content } => format!("\"{}\"", content),
            CellKind::Text { name }
            | CellKind::BarcodeText { name }
            | CellKind::QrCode { name } => format!("[{}]", name),
            CellKind::ImageLogo { name } => name.clone(),
        }
    }
}

/// Layout and style fields shared by every cell type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    #[serde(default = "default_span")]
    pub col_span: u32,
    #[serde(default = "default_span")]
    pub row_span: u32,
    /// Minimum cell height, a CSS length (e.g. "40px").
    #[serde(default = "default_height")]
    pub height_val: String,
    /// Font size, a CSS length (e.g. "12px").
    #[serde(default = "default_font_size")]
    pub size: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    /// Column whose per-row value sets the background. Empty = unset.
    #[serde(default)]
    pub bgcolor_col: String,
    /// Column whose per-row value sets the text color. Empty = unset.
    #[serde(default)]
    pub textcolor_col: String,
    #[serde(default)]
    pub static_bgcolor: String,
    #[serde(default)]
    pub static_textcolor: String,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            col_span: 1,
            row_span: 1,
            height_val: default_height(),
            size: default_font_size(),
            bold: false,
            italic: false,
            bgcolor_col: String::new(),
            textcolor_col: String::new(),
            static_bgcolor: String::new(),
            static_textcolor: String::new(),
        }
    }
}

/// One configured visual unit of a label template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDefinition {
    #[serde(flatten)]
    pub kind: CellKind,
    #[serde(flatten)]
    pub style: CellStyle,
}

impl CellDefinition {
    pub fn new(kind: CellKind) -> Self {
        Self {
            kind,
            style: CellStyle::default(),
        }
    }

    pub fn static_text(content: impl Into<String>) -> Self {
        Self::new(CellKind::StaticText {
            content: content.into(),
        })
    }

    pub fn text(column: impl Into<String>) -> Self {
        Self::new(CellKind::Text {
            name: column.into(),
        })
    }

    pub fn barcode_text(column: impl Into<String>) -> Self {
        Self::new(CellKind::BarcodeText {
            name: column.into(),
        })
    }

    pub fn qrcode(column: impl Into<String>) -> Self {
        Self::new(CellKind::QrCode {
            name: column.into(),
        })
    }

    pub fn image_logo(url: impl Into<String>) -> Self {
        Self::new(CellKind::ImageLogo { name: url.into() })
    }

    pub fn cell_type(&self) -> CellType {
        self.kind.cell_type()
    }

    pub fn span(mut self, col_span: u32, row_span: u32) -> Self {
        self.style.col_span = col_span;
        self.style.row_span = row_span;
        self
    }

    pub fn height(mut self, height_val: impl Into<String>) -> Self {
        self.style.height_val = height_val.into();
        self
    }

    pub fn font_size(mut self, size: impl Into<String>) -> Self {
        self.style.size = size.into();
        self
    }

    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style.italic = true;
        self
    }

    pub fn bgcolor_col(mut self, column: impl Into<String>) -> Self {
        self.style.bgcolor_col = column.into();
        self
    }

    pub fn textcolor_col(mut self, column: impl Into<String>) -> Self {
        self.style.textcolor_col = column.into();
        self
    }

    pub fn static_bgcolor(mut self, color: impl Into<String>) -> Self {
        self.style.static_bgcolor = color.into();
        self
    }

    pub fn static_textcolor(mut self, color: impl Into<String>) -> Self {
        self.style.static_textcolor = color.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_serializes_flat() {
        let cell = CellDefinition::qrcode("SKU").span(2, 1);
        let value = serde_json::to_value(&cell).unwrap();
        assert_eq!(value["type"], "qrcode");
        assert_eq!(value["name"], "SKU");
        assert_eq!(value["col_span"], 2);
        assert_eq!(value["height_val"], "40px");
        assert!(value.get("kind").is_none());
        assert!(value.get("style").is_none());
    }

    #[test]
    fn test_cell_deserializes_with_defaults() {
        let cell: CellDefinition =
            serde_json::from_str(r#"{"type": "text", "name": "Price"}"#).unwrap();
        assert_eq!(cell, CellDefinition::text("Price"));
    }

    #[test]
    fn test_cell_ignores_unused_content_fields() {
        // Documents carry both `name` and `content` on every cell.
        let cell: CellDefinition = serde_json::from_str(
            r#"{"type": "static_text", "name": "", "content": "Hello", "col_span": 3, "bold": true}"#,
        )
        .unwrap();
        assert_eq!(cell.kind, CellKind::StaticText { content: "Hello".into() });
        assert_eq!(cell.style.col_span, 3);
        assert!(cell.style.bold);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = serde_json::from_str::<CellDefinition>(r#"{"type": "hologram"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_cell_type_parse() {
        for t in CellType::ALL {
            assert_eq!(t.as_str().parse::<CellType>().unwrap(), t);
        }
        assert!("nope".parse::<CellType>().is_err());
    }

    #[test]
    fn test_bound_column() {
        assert_eq!(CellDefinition::qrcode("SKU").kind.bound_column(), Some("SKU"));
        assert_eq!(CellDefinition::static_text("x").kind.bound_column(), None);
        assert_eq!(CellDefinition::image_logo("/a.png").kind.bound_column(), None);
    }
}
