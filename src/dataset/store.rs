//! On-disk dataset storage.
//!
//! Each uploaded dataset is written once to `<root>/<uuid>.json` and each
//! print selection to `<root>/<uuid>_print.json`. Files hold the table in
//! columnar form (one array of values per column) so a dataset can be read
//! back without any knowledge of the original upload format.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::Dataset;
use crate::error::LabelError;

/// Which kind of stored table a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredKind {
    /// A full uploaded dataset.
    Dataset,
    /// Rows selected for printing.
    Selection,
}

impl StoredKind {
    fn file_name(self, id: Uuid) -> String {
        match self {
            StoredKind::Dataset => format!("{}.json", id),
            StoredKind::Selection => format!("{}_print.json", id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredColumn {
    name: String,
    values: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ColumnarFile {
    row_count: usize,
    columns: Vec<StoredColumn>,
}

impl ColumnarFile {
    fn from_dataset(dataset: &Dataset) -> Self {
        let columns = dataset
            .columns()
            .iter()
            .enumerate()
            .map(|(i, name)| StoredColumn {
                name: name.clone(),
                values: dataset.rows().map(|row| row.values()[i].clone()).collect(),
            })
            .collect();
        Self {
            row_count: dataset.len(),
            columns,
        }
    }

    fn into_dataset(self) -> Dataset {
        let mut rows = vec![Vec::with_capacity(self.columns.len()); self.row_count];
        let mut names = Vec::with_capacity(self.columns.len());
        for column in self.columns {
            names.push(column.name);
            let mut values = column.values.into_iter();
            for row in rows.iter_mut() {
                row.push(values.next().unwrap_or_default());
            }
        }
        Dataset::new(names, rows)
    }
}

/// Directory-backed store for datasets and print selections.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LabelError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, kind: StoredKind, id: Uuid) -> PathBuf {
        self.root.join(kind.file_name(id))
    }

    /// Write a table under a fresh id.
    pub fn save(&self, kind: StoredKind, dataset: &Dataset) -> Result<Uuid, LabelError> {
        let id = Uuid::new_v4();
        let path = self.path(kind, id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec(&ColumnarFile::from_dataset(dataset))?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(id)
    }

    /// Read a table back.
    pub fn load(&self, kind: StoredKind, id: Uuid) -> Result<Dataset, LabelError> {
        let bytes = match fs::read(self.path(kind, id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LabelError::Storage(match kind {
                    StoredKind::Dataset => "Data file not found. Please upload again.".into(),
                    StoredKind::Selection => {
                        "The data file selected for printing was not found.".into()
                    }
                }));
            }
            Err(e) => return Err(e.into()),
        };
        let file: ColumnarFile = serde_json::from_slice(&bytes)
            .map_err(|e| LabelError::Storage(format!("Stored data is corrupt: {}", e)))?;
        Ok(file.into_dataset())
    }

    /// Delete a stored table. Missing files are not an error.
    pub fn remove(&self, kind: StoredKind, id: Uuid) -> Result<(), LabelError> {
        match fs::remove_file(self.path(kind, id)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Name".into(), "SKU".into()],
            vec![
                vec!["Çay".into(), "T-1".into()],
                vec!["Kahve".into(), "".into()],
            ],
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        let id = store.save(StoredKind::Dataset, &dataset()).unwrap();
        assert!(dir.path().join(format!("{}.json", id)).exists());
        assert_eq!(store.load(StoredKind::Dataset, id).unwrap(), dataset());
    }

    #[test]
    fn test_selection_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        let id = store.save(StoredKind::Selection, &dataset()).unwrap();
        assert!(dir.path().join(format!("{}_print.json", id)).exists());
        assert!(store.load(StoredKind::Dataset, id).is_err());
    }

    #[test]
    fn test_stored_as_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        let id = store.save(StoredKind::Dataset, &dataset()).unwrap();
        let raw = fs::read_to_string(dir.path().join(format!("{}.json", id))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["row_count"], 2);
        assert_eq!(value["columns"][0]["name"], "Name");
        assert_eq!(value["columns"][0]["values"][1], "Kahve");
    }

    #[test]
    fn test_missing_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.load(StoredKind::Dataset, Uuid::new_v4()),
            Err(LabelError::Storage(_))
        ));
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        let id = store.save(StoredKind::Dataset, &dataset()).unwrap();
        store.remove(StoredKind::Dataset, id).unwrap();
        store.remove(StoredKind::Dataset, id).unwrap();
        assert!(store.load(StoredKind::Dataset, id).is_err());
    }

    #[test]
    fn test_empty_dataset_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        let empty = Dataset::new(vec!["A".into(), "B".into()], vec![]);
        let id = store.save(StoredKind::Dataset, &empty).unwrap();
        assert_eq!(store.load(StoredKind::Dataset, id).unwrap(), empty);
    }
}
