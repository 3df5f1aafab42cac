//! recast-unflatten: rebuild nested JSON documents from flattened CSV sheets
//!
//! Usage:
//!   # Read a directory of <sheet>.csv files, print documents to stdout
//!   recast-unflatten ./release_input
//!
//!   # Custom main sheet and root identifier column
//!   recast-unflatten ./release_input --main-sheet release --root-id ocid
//!
//!   # Pretty-print into a file
//!   recast-unflatten ./release_input --pretty -o releases.json

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use recast::{unflatten_source, CsvSheets, UnflattenConfig};
use std::io::Write;

#[derive(Parser, Debug)]
#[command(name = "recast-unflatten")]
#[command(about = "Rebuild nested JSON documents from flattened CSV sheets", long_about = None)]
struct Args {
    /// Directory holding one <sheet>.csv file per sheet
    #[arg(value_name = "DIR")]
    input_dir: String,

    /// Name of the main sheet (also the sub-sheet namespace)
    #[arg(long, default_value = "main")]
    main_sheet: String,

    /// Column uniquely identifying each root document
    #[arg(long, default_value = "ocid")]
    root_id: String,

    /// Field naming repeated-group elements
    #[arg(long, default_value = "id")]
    key_field: String,

    /// Output file (stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let sheets = CsvSheets::open(&args.input_dir, &args.main_sheet)?;
    let config = UnflattenConfig {
        main_sheet_name: args.main_sheet,
        root_id_field: args.root_id,
        key_field: args.key_field,
    };

    let docs = unflatten_source(&sheets, config)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&docs)?
    } else {
        serde_json::to_string(&docs)?
    };

    match args.output {
        Some(path) => std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {path}"))?,
        None => {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
