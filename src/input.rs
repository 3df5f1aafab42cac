//! Sheet sources - where flattened rows come from.
//!
//! The reconstruction core only consumes in-memory rows; this module supplies
//! them from the outside world. `CsvSheets` reads a directory holding one
//! `<sheet>.csv` file per sheet, the layout the flattening side writes.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::unflatten::FlatRow;

/// A named collection of sheets: one main sheet plus zero or more sub-sheets.
///
/// Sub-sheet enumeration order must be stable across one conversion; it
/// determines element order when two sub-sheets feed the same repeated group.
pub trait SheetSource {
    /// Name of the main sheet, which is also the root namespace that every
    /// sub-sheet identifier column must start with.
    fn main_sheet_name(&self) -> &str;

    /// Sub-sheet names, in the order their rows should be folded in.
    fn sub_sheet_names(&self) -> &[String];

    /// All rows of one sheet, in sheet order.
    fn sheet_rows(&self, sheet_name: &str) -> Result<Vec<FlatRow>>;
}

/// A directory of `<sheet>.csv` files.
pub struct CsvSheets {
    dir: PathBuf,
    main_sheet_name: String,
    sub_sheet_names: Vec<String>,
}

impl CsvSheets {
    /// Scan `dir` for sheets. The main sheet's CSV must be present and every
    /// file in the directory must be a CSV; sub-sheets are enumerated in
    /// sorted file-name order so conversions are reproducible.
    pub fn open(dir: impl Into<PathBuf>, main_sheet_name: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        let main_sheet_name = main_sheet_name.into();

        let mut sheet_names = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to read sheet directory {}", dir.display()))?
        {
            let path = entry?.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some("csv") => {}
                _ => bail!("Not a CSV file: {}", path.display()),
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sheet_names.push(stem.to_string());
            }
        }

        let main_position = sheet_names.iter().position(|name| *name == main_sheet_name);
        match main_position {
            Some(position) => {
                sheet_names.remove(position);
            }
            None => bail!(
                "Main sheet {}.csv not found in {}",
                main_sheet_name,
                dir.display()
            ),
        }
        sheet_names.sort();

        Ok(CsvSheets {
            dir,
            main_sheet_name,
            sub_sheet_names: sheet_names,
        })
    }

    fn sheet_path(&self, sheet_name: &str) -> PathBuf {
        self.dir.join(format!("{sheet_name}.csv"))
    }
}

impl SheetSource for CsvSheets {
    fn main_sheet_name(&self) -> &str {
        &self.main_sheet_name
    }

    fn sub_sheet_names(&self) -> &[String] {
        &self.sub_sheet_names
    }

    fn sheet_rows(&self, sheet_name: &str) -> Result<Vec<FlatRow>> {
        read_csv_rows(&self.sheet_path(sheet_name))
    }
}

/// Read one CSV file into header-keyed rows, preserving column order.
fn read_csv_rows(path: &Path) -> Result<Vec<FlatRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open sheet {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to read row in {}", path.display()))?;
        let row: FlatRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sheet(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(format!("{name}.csv")), content).unwrap();
    }

    #[test]
    fn test_open_finds_main_and_sub_sheets() {
        let dir = tempfile::tempdir().unwrap();
        write_sheet(dir.path(), "main", "ocid\n1\n");
        write_sheet(dir.path(), "items", "ocid,main/id\n1,r1\n");
        write_sheet(dir.path(), "award", "ocid,main/id\n1,r1\n");

        let sheets = CsvSheets::open(dir.path(), "main").unwrap();
        assert_eq!(sheets.main_sheet_name(), "main");
        assert_eq!(sheets.sub_sheet_names(), ["award", "items"]);
    }

    #[test]
    fn test_missing_main_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_sheet(dir.path(), "items", "ocid\n1\n");
        assert!(CsvSheets::open(dir.path(), "main").is_err());
    }

    #[test]
    fn test_stray_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_sheet(dir.path(), "main", "ocid\n1\n");
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        assert!(CsvSheets::open(dir.path(), "main").is_err());
    }

    #[test]
    fn test_rows_keep_column_order_and_values() {
        let dir = tempfile::tempdir().unwrap();
        write_sheet(dir.path(), "main", "ocid,b/c,a\n1,x,y\n2,,z\n");

        let sheets = CsvSheets::open(dir.path(), "main").unwrap();
        let rows = sheets.sheet_rows("main").unwrap();
        assert_eq!(rows.len(), 2);

        let columns: Vec<&String> = rows[0].keys().collect();
        assert_eq!(columns, ["ocid", "b/c", "a"]);
        assert_eq!(rows[1]["b/c"], "");
        assert_eq!(rows[1]["a"], "z");
    }
}
