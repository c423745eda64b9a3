use picklist_kv::KVError;
use thiserror::Error;

/// Errors surfaced by [`SelectionStore`](crate::SelectionStore).
///
/// Malformed stored data is never one of these: the store recovers from it
/// during load (re-seeding the list or dropping bad selection entries).
#[derive(Error, Debug)]
pub enum SelectionError {
    /// The id passed to `toggle_selection` is not in the item list.
    #[error("unknown item id {0}")]
    UnknownItem(i32),

    /// A write to the backing store failed. Nothing was published.
    #[error("failed to persist '{key}': {source}")]
    Persist {
        key: String,
        #[source]
        source: KVError,
    },

    /// The backing store could not be opened or read.
    #[error("failed to load '{key}': {source}")]
    Load {
        key: String,
        #[source]
        source: KVError,
    },
}

/// Why a stored item list was rejected.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("malformed item list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate item id {0}")]
    DuplicateId(i32),

    #[error("negative item id {0}")]
    NegativeId(i32),
}

pub type Result<T> = std::result::Result<T, SelectionError>;
