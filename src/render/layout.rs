//! One label: a `label-box` holding a `label-grid` of `label-cell`s.

use super::QrUrlBuilder;
use super::color::resolve_colors;
use super::content::render_content;
use crate::dataset::Row;
use crate::markup::{Element, Node};
use crate::template::{CellDefinition, Template};

/// Wrap one cell's content in its grid cell with placement and presentation styles.
fn render_cell<Q>(cell: &CellDefinition, row: &Row<'_>, qr_urls: &Q) -> Node
where
    Q: QrUrlBuilder + ?Sized,
{
    let style = &cell.style;
    let colors = resolve_colors(cell, row);

    Element::div()
        .class("label-cell")
        .style("grid-column", format!("span {}", style.col_span))
        .style("grid-row", format!("span {}", style.row_span))
        .style("min-height", style.height_val.as_str())
        .style("background-color", colors.background)
        .style("color", colors.text)
        .style_if(style.bold, "font-weight", "bold")
        .style_if(style.italic, "font-style", "italic")
        .child(render_content(cell, row, qr_urls))
        .into()
}

/// Compose the markup for one label from `template` and `row`.
///
/// Cells appear in template order. Pure: no I/O, same inputs give the same tree.
pub fn render_label<Q>(template: &Template, row: &Row<'_>, qr_urls: &Q) -> Node
where
    Q: QrUrlBuilder + ?Sized,
{
    let grid = Element::div()
        .class("label-grid")
        .children(template.iter().map(|cell| render_cell(cell, row, qr_urls)));

    Element::div().class("label-box").child(grid).into()
}
