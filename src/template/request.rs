//! Building cells from the designer's "add cell" form.

use serde::Deserialize;

use super::types::{
    CellDefinition, CellKind, CellStyle, CellType, DEFAULT_FONT_SIZE, DEFAULT_HEIGHT,
    DEFAULT_LOGO_URL, DEFAULT_STATIC_TEXT,
};
use crate::error::LabelError;

/// Raw "add cell" request, field-for-field as the designer form submits it.
///
/// Every field is an optional string so the same struct accepts partial forms.
/// Checkboxes arrive as `"on"` when ticked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellRequest {
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub col_span: Option<String>,
    #[serde(default)]
    pub row_span: Option<String>,
    #[serde(default)]
    pub height_val: Option<String>,
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub bold: Option<String>,
    #[serde(default)]
    pub italic: Option<String>,
    #[serde(default)]
    pub bgcolor_col: Option<String>,
    #[serde(default)]
    pub textcolor_col: Option<String>,
    #[serde(default)]
    pub static_bgcolor: Option<String>,
    #[serde(default)]
    pub static_textcolor: Option<String>,
    #[serde(default)]
    pub static_text_content: Option<String>,
    #[serde(default)]
    pub dynamic_col_name: Option<String>,
    #[serde(default)]
    pub image_logo_url: Option<String>,
}

fn parse_span(value: Option<&str>) -> Result<u32, LabelError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(1);
    };
    raw.parse::<i64>()
        .map(|n| n.clamp(1, u32::MAX as i64) as u32)
        .map_err(|_| LabelError::validation("Column/row span values must be numbers."))
}

fn checked(value: &Option<String>) -> bool {
    value.as_deref() == Some("on")
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

impl CellRequest {
    /// Parse the request into a cell definition.
    ///
    /// Only the form itself is checked here (type name, numeric spans).
    /// Column references are checked by [`super::Template::append`].
    pub fn build(&self) -> Result<CellDefinition, LabelError> {
        let cell_type: CellType = self
            .item_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(LabelError::Validation)?;

        let col_span = parse_span(self.col_span.as_deref())?;
        let row_span = parse_span(self.row_span.as_deref())?;

        let column = self.dynamic_col_name.clone().unwrap_or_default();
        let kind = match cell_type {
            CellType::StaticText => CellKind::StaticText {
                content: self
                    .static_text_content
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATIC_TEXT.to_string()),
            },
            CellType::Text => CellKind::Text { name: column },
            CellType::BarcodeText => CellKind::BarcodeText { name: column },
            CellType::QrCode => CellKind::QrCode { name: column },
            CellType::ImageLogo => CellKind::ImageLogo {
                name: or_default(&self.image_logo_url, DEFAULT_LOGO_URL),
            },
        };

        Ok(CellDefinition {
            kind,
            style: CellStyle {
                col_span,
                row_span,
                height_val: or_default(&self.height_val, DEFAULT_HEIGHT),
                size: or_default(&self.font_size, DEFAULT_FONT_SIZE),
                bold: checked(&self.bold),
                italic: checked(&self.italic),
                bgcolor_col: self.bgcolor_col.clone().unwrap_or_default(),
                textcolor_col: self.textcolor_col.clone().unwrap_or_default(),
                static_bgcolor: self
                    .static_bgcolor
                    .as_deref()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                static_textcolor: self
                    .static_textcolor
                    .as_deref()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            },
        })
    }
}
