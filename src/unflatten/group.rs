//! Order-preserving accumulator for repeated-group elements.
//!
//! Elements of one repeated group may be described piecemeal across many
//! sheet rows. A `KeyedGroup` collects those contributions, merging rows
//! that share a key value into a single element while remembering the order
//! in which keys were first seen.

use indexmap::IndexMap;

use crate::unflatten::types::{Fields, Node};

/// An in-progress repeated group: elements indexed by their key-field value,
/// in first-insertion order, plus a trailing list of elements that arrived
/// without a key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedGroup {
    key_field: String,
    keyed: IndexMap<String, Fields>,
    unkeyed: Vec<Fields>,
}

impl KeyedGroup {
    pub fn new(key_field: impl Into<String>) -> Self {
        KeyedGroup {
            key_field: key_field.into(),
            keyed: IndexMap::new(),
            unkeyed: Vec::new(),
        }
    }

    /// The keyed element for `key`, created empty if this is the first time
    /// the key is seen.
    pub fn entry_mut(&mut self, key: &str) -> &mut Fields {
        self.keyed.entry(key.to_string()).or_default()
    }

    /// Fold one unflattened row fragment into the group.
    ///
    /// If the fragment carries a scalar key field, it is merged into the
    /// element with that key: top-level fields of the fragment are inserted
    /// one by one, so a later row augments the element and wins on
    /// same-named fields, but never replaces the element wholesale.
    /// Fragments without a key are appended unchanged.
    pub fn append(&mut self, fragment: Fields) {
        let key = match fragment.get(&self.key_field) {
            Some(Node::Scalar(key)) => key.clone(),
            _ => {
                self.unkeyed.push(fragment);
                return;
            }
        };

        let element = self.keyed.entry(key).or_default();
        for (name, node) in fragment {
            element.insert(name, node);
        }
    }

    pub fn len(&self) -> usize {
        self.keyed.len() + self.unkeyed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyed.is_empty() && self.unkeyed.is_empty()
    }

    /// Flatten into an ordered list of elements: keyed elements in
    /// first-insertion order, then unkeyed elements in arrival order.
    /// Consumes the group, so finalization happens exactly once.
    pub fn finalize(self) -> Vec<Fields> {
        self.keyed
            .into_values()
            .chain(self.unkeyed)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Node::Scalar(v.to_string())))
            .collect()
    }

    #[test]
    fn test_first_seen_key_order() {
        let mut group = KeyedGroup::new("id");
        group.append(fragment(&[("id", "2"), ("a", "x")]));
        group.append(fragment(&[("id", "1"), ("a", "y")]));
        group.append(fragment(&[("id", "2"), ("b", "z")]));
        group.append(fragment(&[("id", "3"), ("a", "w")]));

        let elements = group.finalize();
        let ids: Vec<&Node> = elements.iter().map(|e| &e["id"]).collect();
        assert_eq!(
            ids,
            [
                &Node::Scalar("2".into()),
                &Node::Scalar("1".into()),
                &Node::Scalar("3".into())
            ]
        );
        // The second "2" row's fields were merged into the first element.
        assert_eq!(elements[0]["a"], Node::Scalar("x".into()));
        assert_eq!(elements[0]["b"], Node::Scalar("z".into()));
    }

    #[test]
    fn test_later_row_wins_on_same_field() {
        let mut group = KeyedGroup::new("id");
        group.append(fragment(&[("id", "1"), ("name", "old")]));
        group.append(fragment(&[("id", "1"), ("name", "new")]));

        let elements = group.finalize();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0]["name"], Node::Scalar("new".into()));
    }

    #[test]
    fn test_unkeyed_fragments_come_last() {
        let mut group = KeyedGroup::new("id");
        group.append(fragment(&[("id", "a")]));
        group.append(fragment(&[("note", "no key")]));
        group.append(fragment(&[("id", "b")]));

        let elements = group.finalize();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0]["id"], Node::Scalar("a".into()));
        assert_eq!(elements[1]["id"], Node::Scalar("b".into()));
        assert_eq!(elements[2]["note"], Node::Scalar("no key".into()));
    }

    #[test]
    fn test_entry_mut_shares_storage_with_append() {
        let mut group = KeyedGroup::new("id");
        group
            .entry_mut("7")
            .insert("seed".into(), Node::Scalar("1".into()));
        group.append(fragment(&[("id", "7"), ("extra", "2")]));

        let elements = group.finalize();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0]["seed"], Node::Scalar("1".into()));
        assert_eq!(elements[0]["extra"], Node::Scalar("2".into()));
    }
}
