use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::unflatten::group::KeyedGroup;

/// Path segment suffix marking an array-of-objects group, e.g. `awards[]`.
pub const ARRAY_MARKER: &str = "[]";

/// Separator between path segments in flattened column names.
pub const PATH_SEPARATOR: char = '/';

/// One flattened record: an ordered mapping from slash-delimited field path
/// to a scalar cell value. Empty-string values mean "absent".
pub type FlatRow = IndexMap<String, String>;

/// The ordered field map of one object under construction.
pub type Fields = IndexMap<String, Node>;

/// A node of the document tree while it is being assembled.
///
/// `Group` is the in-progress form of a repeated group; it only exists during
/// reconstruction and is converted to a plain JSON array by [`Node::into_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A leaf cell value, kept as the string the sheet supplied.
    Scalar(String),
    /// An ordered object.
    Object(Fields),
    /// A repeated group still accumulating keyed/unkeyed elements.
    Group(KeyedGroup),
}

impl Node {
    /// Finalize this subtree into a plain JSON value.
    ///
    /// Consumes the node, so a tree can only be finalized once: groups become
    /// arrays (keyed elements in first-insertion order, then unkeyed elements
    /// in arrival order) and cannot be appended to afterwards.
    pub fn into_value(self) -> Value {
        match self {
            Node::Scalar(s) => Value::String(s),
            Node::Object(fields) => fields_into_value(fields),
            Node::Group(group) => Value::Array(
                group
                    .finalize()
                    .into_iter()
                    .map(fields_into_value)
                    .collect(),
            ),
        }
    }
}

pub(crate) fn fields_into_value(fields: Fields) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(name, node)| (name, node.into_value()))
            .collect::<Map<String, Value>>(),
    )
}

/// Configuration for the reconstruction process
#[derive(Debug, Clone)]
pub struct UnflattenConfig {
    /// Name of the main sheet; also the namespace that every sub-sheet
    /// identifier column must start with.
    pub main_sheet_name: String,

    /// Column uniquely identifying one root document across the main sheet.
    pub root_id_field: String,

    /// Field naming a repeated-group element, both as the `.../id` suffix of
    /// identifier columns and as the merge key inside a group.
    pub key_field: String,
}

impl Default for UnflattenConfig {
    fn default() -> Self {
        UnflattenConfig {
            main_sheet_name: String::from("main"),
            root_id_field: String::from("ocid"),
            key_field: String::from("id"),
        }
    }
}
