//! # Label Templates
//!
//! A [`Template`] is an ordered list of [`CellDefinition`]s. Render order is
//! list order, and the designer edits it with the structural operations here:
//! [`Template::append`], [`Template::move_cell`], [`Template::delete`],
//! [`Template::clear`], plus export/import through [`TemplateDocument`].
//!
//! ```
//! use labelgrid::template::{CellDefinition, Direction, Template};
//!
//! let columns = vec!["Name".to_string(), "SKU".to_string()];
//! let mut template = Template::new();
//! template.append(CellDefinition::text("Name").span(9, 1), &columns).unwrap();
//! template.append(CellDefinition::qrcode("SKU"), &columns).unwrap();
//! assert_eq!(template.cells()[0].style.col_span, 6);
//!
//! template.move_cell(1, Direction::Up);
//! assert_eq!(template.cells()[0], CellDefinition::qrcode("SKU"));
//!
//! let json = template.export(&columns).unwrap().to_json_pretty().unwrap();
//! let restored = Template::import_json(&json).unwrap();
//! assert_eq!(restored, template);
//! ```

mod request;
pub mod types;

pub use request::CellRequest;
pub use types::*;

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Direction for [`Template::move_cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// An ordered list of cell definitions forming one label's layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    cells: Vec<CellDefinition>,
}

impl Template {
    /// Create an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap cells as-is, without validation (used by import).
    pub fn from_cells(cells: Vec<CellDefinition>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[CellDefinition] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellDefinition> {
        self.cells.iter()
    }

    /// Append a cell, validated against the active dataset's columns.
    ///
    /// - Dynamic cells (`text`, `barcode_text`, `qrcode`) must name an existing
    ///   column, otherwise the template is left unchanged and a validation
    ///   error is returned.
    /// - Color column references that do not exist are cleared.
    /// - `col_span` is clamped to `1..=6`, `row_span` raised to at least 1.
    pub fn append(
        &mut self,
        mut cell: CellDefinition,
        columns: &[String],
    ) -> Result<(), LabelError> {
        let has_column = |name: &str| columns.iter().any(|c| c == name);

        if let Some(name) = cell.kind.bound_column()
            && !has_column(name)
        {
            return Err(LabelError::validation(format!(
                "No valid column selected for the dynamic field: {}",
                name
            )));
        }

        if !has_column(&cell.style.bgcolor_col) {
            cell.style.bgcolor_col.clear();
        }
        if !has_column(&cell.style.textcolor_col) {
            cell.style.textcolor_col.clear();
        }

        cell.style.col_span = cell.style.col_span.clamp(1, MAX_COL_SPAN);
        cell.style.row_span = cell.style.row_span.max(1);

        self.cells.push(cell);
        Ok(())
    }

    /// Swap the cell at `index` with its neighbor in `direction`.
    ///
    /// Returns `false` (and changes nothing) when the cell is already at that
    /// boundary or `index` is out of range.
    pub fn move_cell(&mut self, index: usize, direction: Direction) -> bool {
        if index >= self.cells.len() {
            return false;
        }
        match direction {
            Direction::Up if index > 0 => {
                self.cells.swap(index, index - 1);
                true
            }
            Direction::Down if index + 1 < self.cells.len() => {
                self.cells.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the cell at `index`.
    ///
    /// An out-of-range index leaves the template untouched and returns
    /// [`LabelError::IndexOutOfRange`]; callers are free to ignore it.
    pub fn delete(&mut self, index: usize) -> Result<CellDefinition, LabelError> {
        if index >= self.cells.len() {
            return Err(LabelError::IndexOutOfRange {
                index,
                len: self.cells.len(),
            });
        }
        Ok(self.cells.remove(index))
    }

    /// Remove every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Package this template with the dataset's columns as a portable document.
    pub fn export(&self, columns: &[String]) -> Result<TemplateDocument, LabelError> {
        if self.is_empty() {
            return Err(LabelError::validation("No template found to export."));
        }
        Ok(TemplateDocument {
            columns: columns.to_vec(),
            template: self.cells.clone(),
        })
    }

    /// Parse a template document and return its template.
    ///
    /// Cells are trusted as-is: column references are not re-checked against
    /// any dataset.
    pub fn import_json(json: &str) -> Result<Template, LabelError> {
        TemplateDocument::from_json(json)?.into_template()
    }
}

impl<'a> IntoIterator for &'a Template {
    type Item = &'a CellDefinition;
    type IntoIter = std::slice::Iter<'a, CellDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// The portable template document: `{"columns": [...], "template": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDocument {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub template: Vec<CellDefinition>,
}

impl TemplateDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, LabelError> {
        serde_json::from_str(json).map_err(|e| {
            LabelError::validation(format!("An error occurred while importing: {}", e))
        })
    }

    /// Human-readable JSON (indented, non-ASCII kept as-is).
    pub fn to_json_pretty(&self) -> Result<String, LabelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Take the template out of the document; an empty template is refused.
    pub fn into_template(self) -> Result<Template, LabelError> {
        if self.template.is_empty() {
            return Err(LabelError::validation(
                "The imported JSON file does not contain a valid template.",
            ));
        }
        Ok(Template::from_cells(self.template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<String> {
        vec!["Name".into(), "SKU".into(), "Price".into()]
    }

    fn sample() -> Template {
        let cols = columns();
        let mut t = Template::new();
        t.append(CellDefinition::static_text("ACME").span(6, 1).bold(), &cols)
            .unwrap();
        t.append(CellDefinition::text("Name").span(4, 1), &cols).unwrap();
        t.append(CellDefinition::qrcode("SKU").span(2, 2), &cols).unwrap();
        t
    }

    #[test]
    fn test_append_clamps_col_span() {
        let mut t = Template::new();
        t.append(CellDefinition::text("Name").span(12, 1), &columns())
            .unwrap();
        t.append(CellDefinition::text("Name").span(6, 1), &columns())
            .unwrap();
        t.append(CellDefinition::text("Name").span(3, 1), &columns())
            .unwrap();
        let spans: Vec<u32> = t.iter().map(|c| c.style.col_span).collect();
        assert_eq!(spans, vec![6, 6, 3]);
    }

    #[test]
    fn test_append_rejects_unknown_column() {
        let mut t = sample();
        let before = t.clone();
        let err = t
            .append(CellDefinition::barcode_text("Missing"), &columns())
            .unwrap_err();
        assert!(matches!(err, LabelError::Validation(_)));
        assert_eq!(t, before);
    }

    #[test]
    fn test_append_static_and_image_need_no_column() {
        let mut t = Template::new();
        t.append(CellDefinition::static_text("Hi"), &[]).unwrap();
        t.append(CellDefinition::image_logo("/static/logo.png"), &[])
            .unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_append_clears_unknown_color_columns() {
        let mut t = Template::new();
        t.append(
            CellDefinition::text("Name")
                .bgcolor_col("Nope")
                .textcolor_col("Price"),
            &columns(),
        )
        .unwrap();
        assert_eq!(t.cells()[0].style.bgcolor_col, "");
        assert_eq!(t.cells()[0].style.textcolor_col, "Price");
    }

    #[test]
    fn test_move_up_at_top_is_noop() {
        let mut t = Template::new();
        t.append(CellDefinition::static_text("only"), &[]).unwrap();
        let before = t.clone();
        assert!(!t.move_cell(0, Direction::Up));
        assert_eq!(t, before);
    }

    #[test]
    fn test_move_down_swaps() {
        let mut t = Template::new();
        t.append(CellDefinition::static_text("a"), &[]).unwrap();
        t.append(CellDefinition::static_text("b"), &[]).unwrap();
        assert!(t.move_cell(0, Direction::Down));
        assert_eq!(t.cells()[0], CellDefinition::static_text("b"));
        assert_eq!(t.cells()[1], CellDefinition::static_text("a"));
    }

    #[test]
    fn test_move_down_at_bottom_is_noop() {
        let mut t = sample();
        let before = t.clone();
        assert!(!t.move_cell(2, Direction::Down));
        assert!(!t.move_cell(7, Direction::Up));
        assert_eq!(t, before);
    }

    #[test]
    fn test_delete() {
        let mut t = sample();
        let removed = t.delete(1).unwrap();
        assert_eq!(removed.kind.bound_column(), Some("Name"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_delete_out_of_range_leaves_template() {
        let mut t = sample();
        let before = t.clone();
        assert!(matches!(
            t.delete(3),
            Err(LabelError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert_eq!(t, before);
    }

    #[test]
    fn test_clear() {
        let mut t = sample();
        t.clear();
        assert!(t.is_empty());
    }

    #[test]
    fn test_export_import_preserves_cells() {
        let t = sample();
        let json = t.export(&columns()).unwrap().to_json_pretty().unwrap();
        assert!(json.contains("\"columns\""));
        assert!(json.contains("\"template\""));
        let restored = Template::import_json(&json).unwrap();
        assert_eq!(restored, t);
    }

    #[test]
    fn test_export_keeps_non_ascii() {
        let mut t = Template::new();
        t.append(CellDefinition::static_text("Şablon ürün"), &[])
            .unwrap();
        let json = t.export(&[]).unwrap().to_json_pretty().unwrap();
        assert!(json.contains("Şablon ürün"));
    }

    #[test]
    fn test_export_empty_refused() {
        assert!(matches!(
            Template::new().export(&columns()),
            Err(LabelError::Validation(_))
        ));
    }

    #[test]
    fn test_import_requires_template() {
        for doc in [r#"{"columns": ["A"]}"#, r#"{"columns": [], "template": []}"#] {
            assert!(matches!(
                Template::import_json(doc),
                Err(LabelError::Validation(_))
            ));
        }
        assert!(matches!(
            Template::import_json("not json"),
            Err(LabelError::Validation(_))
        ));
    }

    #[test]
    fn test_import_trusts_column_references() {
        let doc = r#"{"columns": [], "template": [{"type": "text", "name": "Ghost"}]}"#;
        let t = Template::import_json(doc).unwrap();
        assert_eq!(t.cells()[0].kind.bound_column(), Some("Ghost"));
    }
}
