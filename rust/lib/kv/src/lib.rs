//! Durable key-value backing store for the picklist selection store.
//!
//! Two layers:
//!
//! - [`KVStore`] — raw bytes by string key, implemented by [`RedbStore`]
//!   (single-file embedded database) and [`MemoryStore`] (in-process).
//! - [`Prefs`] — typed strings, string sets and integers on top of any
//!   `KVStore`, in the shape a preferences file exposes them.

pub mod error;
pub mod memory;
pub mod prefs;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use memory::MemoryStore;
pub use prefs::Prefs;
pub use redb::RedbStore;
pub use traits::KVStore;
