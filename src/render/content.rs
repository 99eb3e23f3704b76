//! Cell content rendering: the inner node of one label cell.
//!
//! | Type | Output |
//! |------|--------|
//! | `static_text` | the literal content, centered |
//! | `text` | the row's value, left-aligned |
//! | `barcode_text` | the row's value, centered |
//! | `qrcode` | an `<img>` pointing at the QR route for the row's value |
//! | `image_logo` | an `<img>` pointing at the configured URL |
//!
//! A bound column that is missing or empty in the row shows [`NO_DATA`]
//! instead of failing; one bad template cell must not break a whole batch.

use super::QrUrlBuilder;
use crate::dataset::Row;
use crate::markup::{Element, Node};
use crate::qr;
use crate::template::{CellDefinition, CellKind, NO_DATA};

/// Text block with the shared label text style.
fn text_block(align: &str, font_size: &str, text: &str) -> Element {
    Element::div()
        .style("text-align", align)
        .style("margin", "0")
        .style("padding", "0")
        .style("word-break", "break-all")
        .style("white-space", "normal")
        .style("line-height", "1.2")
        .style("font-size", font_size)
        .text(text)
}

fn bound_value<'a>(row: &Row<'a>, column: &str) -> &'a str {
    row.get_non_empty(column).unwrap_or(NO_DATA)
}

/// Render the content of `cell` for `row`.
pub fn render_content<Q>(cell: &CellDefinition, row: &Row<'_>, qr_urls: &Q) -> Node
where
    Q: QrUrlBuilder + ?Sized,
{
    let font_size = cell.style.size.as_str();

    match &cell.kind {
        CellKind::StaticText { content } => text_block("center", font_size, content).into(),

        CellKind::ImageLogo { name } => Element::div()
            .style("text-align", "center")
            .child(
                Element::img(name.as_str(), "Logo")
                    .style("max-height", "100%")
                    .style("width", "auto")
                    .style("max-width", "100%")
                    .style("display", "inline-block"),
            )
            .into(),

        CellKind::QrCode { name } => {
            let value = bound_value(row, name);
            let url = qr_urls.qr_url(&qr::encode_payload(value));
            Element::div()
                .style("text-align", "center")
                .style("padding", "5px")
                .style("height", "100%")
                .child(
                    Element::img(url, format!("QR: {}", value))
                        .style("max-height", "100%")
                        .style("width", "auto")
                        .style("max-width", "100%")
                        .style("display", "block")
                        .style("margin", "0 auto"),
                )
                .into()
        }

        CellKind::Text { name } => text_block("left", font_size, bound_value(row, name)).into(),

        CellKind::BarcodeText { name } => {
            text_block("center", font_size, bound_value(row, name)).into()
        }
    }
}
