//! # Datasets
//!
//! The uploaded table: a fixed, ordered list of column names plus rows of text
//! values. Rows are addressed by position for selection.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ingest`] | CSV/XLSX decoding with encoding and separator sniffing |
//! | [`store`] | On-disk columnar persistence keyed by random ids |

pub mod ingest;
pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LabelError;

/// Row-major table of text values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset. Short rows are padded with empty strings and long rows
    /// truncated, so every row has exactly one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// All rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Copy the rows at `indices` (in the given order) into a new dataset.
    ///
    /// An empty selection, or any index past the end, is a validation error.
    pub fn select(&self, indices: &[usize]) -> Result<Dataset, LabelError> {
        if indices.is_empty() {
            return Err(LabelError::validation(
                "You must select at least one row to print.",
            ));
        }

        let rows = indices
            .iter()
            .map(|&i| {
                self.rows.get(i).cloned().ok_or_else(|| {
                    LabelError::validation(format!(
                        "Row {} does not exist (the table has {} rows).",
                        i,
                        self.rows.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Dataset {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Rows as `{column: value}` objects, for JSON consumers.
    pub fn records(&self) -> Vec<BTreeMap<&str, &str>> {
        self.rows().map(|row| row.iter().collect()).collect()
    }
}

/// A borrowed view of one row, with value lookup by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// Pair an explicit column list with values (used by tests and the CLI).
    pub fn new(columns: &'a [String], values: &'a [String]) -> Self {
        Self { columns, values }
    }

    /// Value of `column`, or `None` when the column does not exist.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let values = self.values;
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| values.get(i))
            .map(String::as_str)
    }

    /// Value of `column`, or `None` when it is missing or empty.
    pub fn get_non_empty(&self, column: &str) -> Option<&'a str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a str)> {
        let Row { columns, values } = self;
        columns
            .iter()
            .map(String::as_str)
            .zip(values.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Name".into(), "SKU".into()],
            vec![
                vec!["Apple".into(), "A-1".into()],
                vec!["Pear".into()],
                vec!["Plum".into(), "P-3".into()],
            ],
        )
    }

    #[test]
    fn test_short_rows_padded() {
        let ds = dataset();
        assert_eq!(ds.row(1).unwrap().get("SKU"), Some(""));
        assert_eq!(ds.row(1).unwrap().get_non_empty("SKU"), None);
    }

    #[test]
    fn test_row_lookup() {
        let ds = dataset();
        let row = ds.row(0).unwrap();
        assert_eq!(row.get("Name"), Some("Apple"));
        assert_eq!(row.get("Missing"), None);
        assert!(ds.row(3).is_none());
    }

    #[test]
    fn test_select_keeps_caller_order() {
        let ds = dataset();
        let selected = ds.select(&[2, 0]).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected.row(0).unwrap().get("Name"), Some("Plum"));
        assert_eq!(selected.row(1).unwrap().get("Name"), Some("Apple"));
        assert_eq!(selected.columns(), ds.columns());
    }

    #[test]
    fn test_select_empty_is_validation_error() {
        assert!(matches!(
            dataset().select(&[]),
            Err(LabelError::Validation(_))
        ));
    }

    #[test]
    fn test_select_out_of_range() {
        assert!(matches!(
            dataset().select(&[0, 9]),
            Err(LabelError::Validation(_))
        ));
    }

    #[test]
    fn test_records() {
        let ds = dataset();
        let records = ds.records();
        assert_eq!(records[0]["Name"], "Apple");
        assert_eq!(records[1]["SKU"], "");
    }
}
