//! # Label Rendering
//!
//! Turns a [`Template`] and dataset rows into label markup.
//!
//! ## Modules
//!
//! - [`color`]: background/text color precedence and the color allow-list
//! - [`content`]: per-type cell content (text, QR image, logo)
//! - [`layout`]: one label as a grid of cells
//!
//! ## Usage Example
//!
//! ```
//! use labelgrid::dataset::Dataset;
//! use labelgrid::render::{render_batch, QrRoute};
//! use labelgrid::template::{CellDefinition, Template};
//!
//! let dataset = Dataset::new(
//!     vec!["Name".into(), "SKU".into()],
//!     vec![vec!["Apple".into(), "A-1".into()]],
//! );
//! let template = Template::from_cells(vec![
//!     CellDefinition::text("Name").bold(),
//!     CellDefinition::qrcode("SKU"),
//! ]);
//!
//! let labels = render_batch(&template, dataset.rows(), &QrRoute::default()).unwrap();
//! assert_eq!(labels.len(), 1);
//! assert!(labels[0].html().contains("/qrcode/A-1"));
//! ```

pub mod color;
pub mod content;
pub mod layout;

pub use color::{ResolvedColors, resolve_colors};
pub use content::render_content;
pub use layout::render_label;

use crate::dataset::Row;
use crate::error::LabelError;
use crate::markup::Node;
use crate::template::Template;

/// Builds the image URL for an already percent-encoded QR payload.
pub trait QrUrlBuilder {
    fn qr_url(&self, encoded_payload: &str) -> String;
}

impl<F> QrUrlBuilder for F
where
    F: Fn(&str) -> String,
{
    fn qr_url(&self, encoded_payload: &str) -> String {
        self(encoded_payload)
    }
}

/// QR URLs served by this application's own QR route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRoute {
    prefix: String,
}

impl QrRoute {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for QrRoute {
    fn default() -> Self {
        Self::new("/qrcode/")
    }
}

impl QrUrlBuilder for QrRoute {
    fn qr_url(&self, encoded_payload: &str) -> String {
        format!("{}{}", self.prefix, encoded_payload)
    }
}

/// One rendered label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    root: Node,
}

impl Label {
    /// The label's markup tree.
    pub fn node(&self) -> &Node {
        &self.root
    }

    /// The label as escaped HTML.
    pub fn html(&self) -> String {
        self.root.to_html()
    }
}

/// Render one label per row, in row order.
///
/// Fails with [`LabelError::Configuration`] when the template has no cells;
/// nothing is rendered in that case.
pub fn render_batch<'a, I, Q>(
    template: &Template,
    rows: I,
    qr_urls: &Q,
) -> Result<Vec<Label>, LabelError>
where
    I: IntoIterator<Item = Row<'a>>,
    Q: QrUrlBuilder + ?Sized,
{
    if template.is_empty() {
        return Err(LabelError::configuration(
            "No template found to print. Please set up the template first.",
        ));
    }

    Ok(rows
        .into_iter()
        .map(|row| Label {
            root: render_label(template, &row, qr_urls),
        })
        .collect())
}
