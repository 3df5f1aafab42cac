//! Identifier arbitration: picking the single path that anchors a sub-sheet
//! row inside a multiply-nested structure.

use indexmap::IndexMap;

use crate::unflatten::error::UnflattenError;
use crate::unflatten::types::PATH_SEPARATOR;

/// Pick the anchor path out of a row's identifier columns.
///
/// The anchor is the deepest identifier path (first one wins on equal depth,
/// in column order). Every other identifier path must lie on the same chain:
/// all its segments except its own last one must equal the anchor's segments
/// at the same positions. A mismatch means the row claims membership in two
/// incompatible nesting chains and is rejected.
pub(crate) fn anchor_path(
    ids: &IndexMap<String, String>,
    sheet: &str,
    row: usize,
) -> Result<String, UnflattenError> {
    let mut anchor: Option<(&String, Vec<&str>)> = None;
    for path in ids.keys() {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let deeper = match &anchor {
            Some((_, deepest)) => segments.len() > deepest.len(),
            None => true,
        };
        if deeper {
            anchor = Some((path, segments));
        }
    }

    let (anchor, deepest) = match anchor {
        Some(found) => found,
        None => {
            return Err(UnflattenError::MissingAnchor {
                sheet: sheet.to_string(),
                row,
            })
        }
    };

    for path in ids.keys() {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let chain_len = segments.len() - 1;
        if segments[..chain_len] != deepest[..chain_len] {
            return Err(UnflattenError::AmbiguousAnchor {
                sheet: sheet.to_string(),
                row,
                anchor: anchor.clone(),
                conflicting: path.clone(),
            });
        }
    }

    Ok(anchor.clone())
}
