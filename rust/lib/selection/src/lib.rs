//! Picklist — a persisted, observable selection over a fixed list of items.
//!
//! The store owns two values and nothing else:
//!
//! - `items` — loaded from the backing store once, or seeded with
//!   `Item 1..Item N` on first run, then read-only.
//! - `selection` — the ids the user has picked, changed only through
//!   [`SelectionStore::toggle_selection`].
//!
//! Every change is written to the backing store before it is published, so a
//! subscriber never sees a selection that would be lost on restart.
//!
//! # Modes
//!
//! - [`SelectionMode::Multi`] — toggling an id adds or removes it.
//! - [`SelectionMode::Single`] — toggling an id makes it the only selection.
//!   Picking the selected item again keeps it selected.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use picklist::{SelectionStore, StoreConfig};
//! use picklist_kv::MemoryStore;
//!
//! let store = SelectionStore::load(Arc::new(MemoryStore::new()), StoreConfig::default()).unwrap();
//! assert_eq!(store.items().get().len(), 20);
//!
//! store.toggle_selection(3).unwrap();
//! store.toggle_selection(7).unwrap();
//! store.toggle_selection(3).unwrap();
//! assert_eq!(store.selection().get().iter().copied().collect::<Vec<_>>(), vec![7]);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod item;
pub mod observable;
pub mod store;

pub use config::{KeyConfig, StoreConfig};
pub use error::{CodecError, Result, SelectionError};
pub use item::{Item, Selection, SelectionMode};
pub use observable::{ChangeHandler, Observable, SubscriptionId};
pub use store::SelectionStore;
