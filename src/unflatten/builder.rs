//! The reconstruction driver: builds root documents from the main sheet,
//! folds every sub-sheet row into the right place, then finalizes the trees.

use indexmap::IndexMap;
use serde_json::Value;

use crate::unflatten::anchor::anchor_path;
use crate::unflatten::error::UnflattenError;
use crate::unflatten::group::KeyedGroup;
use crate::unflatten::path::{resolve, unflatten_row};
use crate::unflatten::types::{
    fields_into_value, Fields, FlatRow, Node, UnflattenConfig, PATH_SEPARATOR,
};

/// Rebuilds nested documents from one main sheet plus any number of
/// sub-sheets describing repeated-group elements.
pub struct Reconstructor {
    config: UnflattenConfig,
}

impl Reconstructor {
    pub fn new(config: UnflattenConfig) -> Self {
        Reconstructor { config }
    }

    /// Reconstruct one nested document per main-sheet row.
    ///
    /// `main_rows` supplies the root records; `sub_sheets` supplies
    /// `(sheet name, rows)` pairs in a caller-determined order. Sub-sheet
    /// order only affects element ordering when two sheets contribute to the
    /// same repeated group. Documents come back in main-sheet row order.
    ///
    /// Fails on the first malformed row; no partial output is returned.
    pub fn reconstruct<M, S, R>(
        &self,
        main_rows: M,
        sub_sheets: S,
    ) -> Result<Vec<Value>, UnflattenError>
    where
        M: IntoIterator<Item = FlatRow>,
        S: IntoIterator<Item = (String, R)>,
        R: IntoIterator<Item = FlatRow>,
    {
        let mut roots: IndexMap<String, Fields> = IndexMap::new();

        for (row_idx, row) in main_rows.into_iter().enumerate() {
            let root_id = match row.get(&self.config.root_id_field) {
                Some(value) if !value.is_empty() => value.clone(),
                _ => {
                    return Err(UnflattenError::MissingRootIdentifier {
                        sheet: self.config.main_sheet_name.clone(),
                        row: row_idx,
                        field: self.config.root_id_field.clone(),
                    })
                }
            };
            if roots.contains_key(&root_id) {
                return Err(UnflattenError::DuplicateRootIdentifier {
                    row: row_idx,
                    value: root_id,
                });
            }
            let fields = unflatten_row(row, &self.config.key_field)?;
            roots.insert(root_id, fields);
        }

        for (sheet_name, rows) in sub_sheets {
            for (row_idx, row) in rows.into_iter().enumerate() {
                self.fold_sub_row(&mut roots, &sheet_name, row_idx, row)?;
            }
        }

        Ok(roots.into_values().map(fields_into_value).collect())
    }

    /// Fold one sub-sheet row into the root document it belongs to.
    fn fold_sub_row(
        &self,
        roots: &mut IndexMap<String, Fields>,
        sheet_name: &str,
        row_idx: usize,
        row: FlatRow,
    ) -> Result<(), UnflattenError> {
        let id_suffix = format!("{PATH_SEPARATOR}{}", self.config.key_field);

        let mut root_id: Option<String> = None;
        let mut id_fields: IndexMap<String, String> = IndexMap::new();
        let mut remainder = FlatRow::new();
        for (column, value) in row {
            if column == self.config.root_id_field {
                root_id = Some(value);
            } else if column.ends_with(&id_suffix) {
                id_fields.insert(column, value);
            } else {
                remainder.insert(column, value);
            }
        }

        for column in id_fields.keys() {
            if !column.starts_with(&self.config.main_sheet_name) {
                return Err(UnflattenError::NamespaceViolation {
                    sheet: sheet_name.to_string(),
                    row: row_idx,
                    column: column.clone(),
                    namespace: self.config.main_sheet_name.clone(),
                });
            }
        }

        let anchor = anchor_path(&id_fields, sheet_name, row_idx)?;
        if id_fields[&anchor].is_empty() {
            // The row addresses no element of this group; nothing to fold in.
            return Ok(());
        }

        let root_id = match root_id {
            Some(value) if !value.is_empty() => value,
            _ => {
                return Err(UnflattenError::MissingRootIdentifier {
                    sheet: sheet_name.to_string(),
                    row: row_idx,
                    field: self.config.root_id_field.clone(),
                })
            }
        };
        let document = roots
            .get_mut(&root_id)
            .ok_or_else(|| UnflattenError::UnknownRootIdentifier {
                sheet: sheet_name.to_string(),
                row: row_idx,
                value: root_id.clone(),
            })?;

        // Anchor segments minus the namespace prefix and the trailing key
        // field; the identifier columns resolve every group on the way down.
        let segments: Vec<&str> = anchor.split(PATH_SEPARATOR).collect();
        let inner = &segments[1..segments.len() - 1];
        let target = resolve(
            document,
            inner,
            &id_fields,
            self.config.main_sheet_name.clone(),
            &self.config.key_field,
        )?;

        let node = target
            .entry(sheet_name.to_string())
            .or_insert_with(|| Node::Group(KeyedGroup::new(&self.config.key_field)));
        let group = match node {
            Node::Group(group) => group,
            _ => {
                return Err(UnflattenError::PathConflict {
                    path: format!("{anchor}{PATH_SEPARATOR}{sheet_name}"),
                })
            }
        };
        group.append(unflatten_row(remainder, &self.config.key_field)?);

        Ok(())
    }
}
