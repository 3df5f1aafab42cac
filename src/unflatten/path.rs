//! Path navigation: walking (and materializing) a position in a nested tree
//! from a slash-delimited path, and unflattening one row into a fragment.

use indexmap::IndexMap;

use crate::unflatten::error::UnflattenError;
use crate::unflatten::group::KeyedGroup;
use crate::unflatten::types::{Fields, FlatRow, Node, ARRAY_MARKER, PATH_SEPARATOR};

/// Walk `segments` down from `fields`, creating intermediate containers as
/// needed, and return the object that should receive the final field.
///
/// A plain segment descends into (or creates) an object. A segment ending in
/// `[]` descends into one element of a repeated group: the element is picked
/// by looking up `<walked path>/<key_field>` in `ids`, which must contain an
/// identifier value for every repeated group on the path.
pub(crate) fn resolve<'a>(
    fields: &'a mut Fields,
    segments: &[&str],
    ids: &IndexMap<String, String>,
    walked: String,
    key_field: &str,
) -> Result<&'a mut Fields, UnflattenError> {
    let (segment, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Ok(fields),
    };
    let walked = format!("{walked}{PATH_SEPARATOR}{segment}");

    if let Some(name) = segment.strip_suffix(ARRAY_MARKER) {
        let node = fields
            .entry(name.to_string())
            .or_insert_with(|| Node::Group(KeyedGroup::new(key_field)));
        let group = match node {
            Node::Group(group) => group,
            _ => return Err(UnflattenError::PathConflict { path: walked }),
        };

        let lookup = format!("{walked}{PATH_SEPARATOR}{key_field}");
        let key = ids
            .get(&lookup)
            .ok_or_else(|| UnflattenError::MissingIdentifierLookup { path: lookup.clone() })?;
        resolve(group.entry_mut(key), rest, ids, walked, key_field)
    } else {
        let node = fields
            .entry(segment.to_string())
            .or_insert_with(|| Node::Object(Fields::new()));
        let child = match node {
            Node::Object(child) => child,
            _ => return Err(UnflattenError::PathConflict { path: walked }),
        };
        resolve(child, rest, ids, walked, key_field)
    }
}

/// Unflatten one row into a fresh nested fragment.
///
/// Empty-valued cells are skipped. Each remaining cell is placed at the tree
/// position implied by its path; a path without a separator is a top-level
/// field. The row must not reach into repeated groups: callers strip
/// identifier and grouping columns beforehand, so any `[]` segment here has
/// no identifier to resolve against and is rejected.
pub(crate) fn unflatten_row(row: FlatRow, key_field: &str) -> Result<Fields, UnflattenError> {
    let mut fields = Fields::new();
    let no_ids = IndexMap::new();

    for (path, value) in row {
        if value.is_empty() {
            continue;
        }
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let (leaf, parents) = match segments.split_last() {
            Some(split) => split,
            None => continue,
        };
        let target = resolve(&mut fields, parents, &no_ids, String::new(), key_field)?;
        target.insert((*leaf).to_string(), Node::Scalar(value));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> FlatRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unflatten_top_level_and_nested() {
        let fields = unflatten_row(
            row(&[("a", "1"), ("b/c", "2"), ("b/d/e", "3")]),
            "id",
        )
        .unwrap();

        assert_eq!(fields["a"], Node::Scalar("1".into()));
        let b = match &fields["b"] {
            Node::Object(b) => b,
            other => panic!("expected object, got {other:?}"),
        };
        assert_eq!(b["c"], Node::Scalar("2".into()));
        let d = match &b["d"] {
            Node::Object(d) => d,
            other => panic!("expected object, got {other:?}"),
        };
        assert_eq!(d["e"], Node::Scalar("3".into()));
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let fields = unflatten_row(row(&[("a", ""), ("b/c", "")]), "id").unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_row_may_not_reach_into_groups() {
        let err = unflatten_row(row(&[("items[]/name", "x")]), "id").unwrap_err();
        assert_eq!(
            err,
            UnflattenError::MissingIdentifierLookup {
                path: "/items[]/id".into()
            }
        );
    }

    #[test]
    fn test_resolve_creates_group_elements_by_id() {
        let mut fields = Fields::new();
        let ids: IndexMap<String, String> =
            [("main/items[]/id".to_string(), "7".to_string())]
                .into_iter()
                .collect();

        resolve(&mut fields, &["items[]"], &ids, "main".into(), "id")
            .unwrap()
            .insert("name".into(), Node::Scalar("thing".into()));

        let group = match &fields["items"] {
            Node::Group(group) => group,
            other => panic!("expected group, got {other:?}"),
        };
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_resolve_reuses_existing_group_element() {
        let mut fields = Fields::new();
        let ids: IndexMap<String, String> =
            [("main/items[]/id".to_string(), "7".to_string())]
                .into_iter()
                .collect();

        resolve(&mut fields, &["items[]"], &ids, "main".into(), "id")
            .unwrap()
            .insert("first".into(), Node::Scalar("1".into()));
        resolve(&mut fields, &["items[]"], &ids, "main".into(), "id")
            .unwrap()
            .insert("second".into(), Node::Scalar("2".into()));

        let group = match fields.swap_remove("items") {
            Some(Node::Group(group)) => group,
            other => panic!("expected group, got {other:?}"),
        };
        let elements = group.finalize();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0]["first"], Node::Scalar("1".into()));
        assert_eq!(elements[0]["second"], Node::Scalar("2".into()));
    }

    #[test]
    fn test_scalar_in_the_way_is_a_conflict() {
        let mut fields = Fields::new();
        fields.insert("a".into(), Node::Scalar("leaf".into()));
        let err = resolve(&mut fields, &["a", "b"], &IndexMap::new(), String::new(), "id")
            .unwrap_err();
        assert_eq!(err, UnflattenError::PathConflict { path: "/a".into() });
    }
}
