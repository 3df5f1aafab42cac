use thiserror::Error;

/// Errors raised while reconstructing nested documents from flattened sheets.
///
/// All of these are fatal: a malformed row invalidates trust in the rest of
/// the reconstruction, so the whole conversion aborts on first occurrence and
/// no partial documents are returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnflattenError {
    /// Two main-sheet rows share the same root identifier value.
    #[error("main sheet row {row}: duplicate root identifier {value:?}")]
    DuplicateRootIdentifier { row: usize, value: String },

    /// A row is missing (or has an empty) root identifier.
    #[error("sheet {sheet:?} row {row}: missing root identifier column {field:?}")]
    MissingRootIdentifier {
        sheet: String,
        row: usize,
        field: String,
    },

    /// A sub-sheet row names a root identifier no main-sheet row has.
    #[error("sheet {sheet:?} row {row}: unknown root identifier {value:?}")]
    UnknownRootIdentifier {
        sheet: String,
        row: usize,
        value: String,
    },

    /// A sub-sheet identifier column lies outside the main sheet's namespace.
    #[error("sheet {sheet:?} row {row}: identifier column {column:?} does not start with {namespace:?}")]
    NamespaceViolation {
        sheet: String,
        row: usize,
        column: String,
        namespace: String,
    },

    /// A sub-sheet row has no identifier columns, so no anchor can be found.
    #[error("sheet {sheet:?} row {row}: no identifier columns present")]
    MissingAnchor { sheet: String, row: usize },

    /// A row's identifier columns describe mutually inconsistent nesting
    /// chains, so the row cannot be anchored anywhere.
    #[error("sheet {sheet:?} row {row}: identifier column {conflicting:?} is not on the chain of {anchor:?}")]
    AmbiguousAnchor {
        sheet: String,
        row: usize,
        anchor: String,
        conflicting: String,
    },

    /// The path resolver needed an identifier value that was not supplied.
    /// This is an internal contract violation, not bad input: the caller must
    /// provide an identifier for every repeated group on the anchor path.
    #[error("no identifier value supplied for {path:?}")]
    MissingIdentifierLookup { path: String },

    /// A path step requires descending into an object or group, but the
    /// position already holds an incompatible value.
    #[error("path {path:?} conflicts with an existing value of another shape")]
    PathConflict { path: String },
}
