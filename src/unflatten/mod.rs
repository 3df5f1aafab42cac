//! Sheet un-flattening - rebuild nested documents from flat tables
//!
//! This module reverses spreadsheet flattening: rows keyed by slash-delimited
//! field paths, spread over one main sheet and any number of sub-sheets, are
//! reassembled into the nested documents they describe.

pub(crate) mod anchor;
pub mod builder;
pub mod error;
pub mod group;
pub(crate) mod path;
pub mod types;

pub use builder::Reconstructor;
pub use error::UnflattenError;
pub use group::KeyedGroup;
pub use types::{Fields, FlatRow, Node, UnflattenConfig};
