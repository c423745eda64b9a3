use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One row of the list. Immutable once created; `id` is unique within a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: i32,
    pub name: String,
}

impl Item {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The default list: ids `0..count`, named `Item 1..Item count`.
    ///
    /// Ids are `i32`, so `count` is capped at `i32::MAX`.
    pub fn seed(count: usize) -> Vec<Item> {
        seed_ids(count)
            .map(|id| Item::new(id, format!("Item {}", id + 1)))
            .collect()
    }
}

fn seed_ids(count: usize) -> Range<i32> {
    0..i32::try_from(count).unwrap_or(i32::MAX)
}

/// Ids of the currently selected items.
pub type Selection = BTreeSet<i32>;

/// How `toggle_selection` treats an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one id; picking an item replaces the selection.
    Single,
    /// Any number of ids; picking an item flips its membership.
    #[default]
    Multi,
}

impl SelectionMode {
    /// Compute the selection that results from picking `id`.
    pub fn apply(self, current: &Selection, id: i32) -> Selection {
        match self {
            SelectionMode::Single => Selection::from([id]),
            SelectionMode::Multi => {
                let mut next = current.clone();
                if !next.remove(&id) {
                    next.insert(id);
                }
                next
            }
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Single => f.write_str("single"),
            SelectionMode::Multi => f.write_str("multi"),
        }
    }
}
