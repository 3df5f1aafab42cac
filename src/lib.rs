//! # Recast - rebuild nested documents from flattened sheets
//!
//! A library for un-flattening tabular data: rows keyed by slash-delimited
//! field paths (the shape spreadsheet flattening produces) are reassembled
//! into the nested JSON documents they describe, including array elements
//! described piecemeal across multiple rows and multiple sub-sheets.
//!
//! ## Quick Start
//!
//! ```rust
//! use recast::{FlatRow, Reconstructor, UnflattenConfig};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut main_row = FlatRow::new();
//! main_row.insert("ocid".into(), "ocds-1".into());
//! main_row.insert("buyer/name".into(), "Example Council".into());
//!
//! let mut award_row = FlatRow::new();
//! award_row.insert("ocid".into(), "ocds-1".into());
//! award_row.insert("main/id".into(), "r1".into());
//! award_row.insert("amount".into(), "900".into());
//!
//! let docs = Reconstructor::new(UnflattenConfig::default())
//!     .reconstruct(vec![main_row], vec![("award".to_string(), vec![award_row])])?;
//!
//! assert_eq!(docs, vec![json!({
//!     "ocid": "ocds-1",
//!     "buyer": {"name": "Example Council"},
//!     "award": [{"amount": "900"}]
//! })]);
//! # Ok(())
//! # }
//! ```
//!
//! Reading sheets from a directory of CSV files:
//!
//! ```rust,no_run
//! use recast::{unflatten_source, CsvSheets, UnflattenConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let sheets = CsvSheets::open("release_input", "main")?;
//! let docs = unflatten_source(&sheets, UnflattenConfig::default())?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde_json::Value;

pub mod input;
pub mod unflatten;

// Re-export commonly used types for convenience
pub use input::{CsvSheets, SheetSource};
pub use unflatten::{Fields, FlatRow, KeyedGroup, Node, Reconstructor, UnflattenConfig, UnflattenError};

/// Main entry point: reconstruct every document a sheet source describes.
///
/// The source's main sheet name overrides `config.main_sheet_name`, since the
/// namespace the sub-sheets reference is the source's to define.
pub fn unflatten_source(source: &impl SheetSource, mut config: UnflattenConfig) -> Result<Vec<Value>> {
    config.main_sheet_name = source.main_sheet_name().to_string();

    let main_rows = source
        .sheet_rows(source.main_sheet_name())
        .context("Failed to read main sheet")?;

    let mut sub_sheets = Vec::new();
    for name in source.sub_sheet_names() {
        let rows = source
            .sheet_rows(name)
            .with_context(|| format!("Failed to read sheet {name}"))?;
        sub_sheets.push((name.clone(), rows));
    }

    let docs = Reconstructor::new(config).reconstruct(main_rows, sub_sheets)?;
    Ok(docs)
}
