//! Stored forms of the item list and the selection.
//!
//! - Item list: JSON array of `{"id": .., "name": ..}` in display order.
//! - Multi selection: set of decimal strings. Entries that do not parse are
//!   dropped; the rest are kept.
//! - Single selection: one integer, `-1` for nothing selected.

use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::error::CodecError;
use crate::item::{Item, Selection};

/// Stored value meaning "no selection" in single mode.
pub const NO_SELECTION: i32 = -1;

pub fn encode_items(items: &[Item]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(items)?)
}

/// Parse a stored item list. Rejects duplicate or negative ids so the
/// uniqueness invariant and the single-mode sentinel both hold.
pub fn decode_items(json: &str) -> Result<Vec<Item>, CodecError> {
    let items: Vec<Item> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if item.id < 0 {
            return Err(CodecError::NegativeId(item.id));
        }
        if !seen.insert(item.id) {
            return Err(CodecError::DuplicateId(item.id));
        }
    }
    Ok(items)
}

pub fn encode_id_set(selection: &Selection) -> BTreeSet<String> {
    selection.iter().map(|id| id.to_string()).collect()
}

pub fn decode_id_set(raw: &BTreeSet<String>) -> Selection {
    raw.iter()
        .filter_map(|entry| match entry.parse::<i32>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("codec: dropping malformed selection entry {:?}", entry);
                None
            }
        })
        .collect()
}

pub fn encode_single(selection: &Selection) -> i32 {
    selection.iter().next().copied().unwrap_or(NO_SELECTION)
}

pub fn decode_single(raw: i32) -> Selection {
    if raw < 0 {
        Selection::new()
    } else {
        Selection::from([raw])
    }
}
