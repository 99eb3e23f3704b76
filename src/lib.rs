//! # labelgrid - Label Designer and Print Preview
//!
//! labelgrid turns rows of a CSV/XLSX table into print-ready labels. It provides:
//!
//! - **Ingestion**: CSV with encoding/separator sniffing, and XLSX
//! - **Templates**: an ordered list of grid cells (text, barcode text, QR code, logo)
//! - **Rendering**: one escaped HTML label per selected row
//! - **Server**: a small web app for upload, row selection, template design and preview
//!
//! ## Quick Start
//!
//! ```
//! use labelgrid::{
//!     dataset::ingest,
//!     render::{render_batch, QrRoute},
//!     template::{CellDefinition, Template},
//! };
//!
//! let csv = b"Name;SKU;Color\nApple;A-1;red\nPear;P-2;\n";
//! let dataset = ingest::read_dataset("products.csv", csv)?;
//!
//! let mut template = Template::new();
//! template.append(
//!     CellDefinition::text("Name").span(4, 1).bold().bgcolor_col("Color"),
//!     dataset.columns(),
//! )?;
//! template.append(CellDefinition::qrcode("SKU").span(2, 2), dataset.columns())?;
//!
//! let selection = dataset.select(&[1, 0])?;
//! let labels = render_batch(&template, selection.rows(), &QrRoute::default())?;
//! assert_eq!(labels.len(), 2);
//! assert!(labels[1].html().contains("background-color: red;"));
//! # Ok::<(), labelgrid::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dataset`] | Tables, file ingestion and on-disk storage |
//! | [`template`] | Cell definitions and template editing |
//! | [`render`] | Color resolution, cell content and label layout |
//! | [`markup`] | Markup tree and escaped HTML output |
//! | [`qr`] | QR payload encoding and PNG rendering |
//! | [`server`] | HTTP interface |
//! | [`error`] | Error types |

pub mod dataset;
pub mod error;
pub mod markup;
pub mod qr;
pub mod render;
pub mod server;
pub mod template;

// Re-exports for convenience
pub use error::LabelError;
