use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use picklist_kv::{KVError, KVStore, Prefs, RedbStore};
use tracing::{debug, info, warn};

use crate::codec;
use crate::config::StoreConfig;
use crate::error::{Result, SelectionError};
use crate::item::{Item, Selection, SelectionMode};
use crate::observable::Observable;

/// Persisted selection over a fixed item list.
///
/// - `load(kv, config)` reads or seeds the list and restores the selection.
/// - `items()` / `selection()` are the observable channels for presentation.
/// - `toggle_selection(id)` is the only mutation. It writes the new selection
///   to the backing store, then publishes it.
///
/// Toggles are linearized by an internal mutex held across write and
/// publish. Selection handlers must therefore not call `toggle_selection`.
pub struct SelectionStore {
    prefs: Prefs,
    config: StoreConfig,
    items: Observable<Vec<Item>>,
    selection: Observable<Selection>,
    /// Item id → position in `items`. Fixed after load.
    index: HashMap<i32, usize>,
    /// Serializes toggles. Selection state lives in the observable, so a
    /// poisoned guard is taken over rather than propagated.
    mutation: Mutex<()>,
}

fn load_err(key: &str) -> impl FnOnce(KVError) -> SelectionError + '_ {
    move |source| SelectionError::Load {
        key: key.to_string(),
        source,
    }
}

fn persist_err(key: &str) -> impl FnOnce(KVError) -> SelectionError + '_ {
    move |source| SelectionError::Persist {
        key: key.to_string(),
        source,
    }
}

impl SelectionStore {
    /// Build the store from a backing KV store.
    ///
    /// Malformed stored data is recovered from: an unreadable item list is
    /// replaced by the seeded default, bad selection entries are dropped, and
    /// ids no longer in the list are filtered out. Each recovery is written
    /// back before this returns.
    pub fn load(kv: Arc<dyn KVStore>, config: StoreConfig) -> Result<Self> {
        let prefs = Prefs::new(kv);

        let items = load_items(&prefs, &config)?;
        let index: HashMap<i32, usize> = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id, pos))
            .collect();
        let selection = load_selection(&prefs, &config, &index)?;

        info!(
            "SelectionStore: loaded {} items, {} selected ({} mode)",
            items.len(),
            selection.len(),
            config.mode
        );

        Ok(Self {
            prefs,
            config,
            items: Observable::new(items),
            selection: Observable::new(selection),
            index,
            mutation: Mutex::new(()),
        })
    }

    /// Open (or create) a redb database at `path` and load from it.
    pub fn open(path: &Path, config: StoreConfig) -> Result<Self> {
        let db = RedbStore::open(path).map_err(|source| SelectionError::Load {
            key: path.display().to_string(),
            source,
        })?;
        Self::load(Arc::new(db), config)
    }

    /// Item list channel. Never changes after load.
    pub fn items(&self) -> Observable<Vec<Item>> {
        self.items.clone()
    }

    /// Selection channel.
    pub fn selection(&self) -> Observable<Selection> {
        self.selection.clone()
    }

    pub fn mode(&self) -> SelectionMode {
        self.config.mode
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Look up an item by id.
    pub fn item(&self, id: i32) -> Option<Item> {
        let pos = *self.index.get(&id)?;
        self.items.get().get(pos).cloned()
    }

    pub fn is_selected(&self, id: i32) -> bool {
        self.selection.get().contains(&id)
    }

    /// Selected items in display order.
    pub fn selected_items(&self) -> Vec<Item> {
        let selection = self.selection.get();
        self.items
            .get()
            .iter()
            .filter(|item| selection.contains(&item.id))
            .cloned()
            .collect()
    }

    /// Apply a pick of `item_id` according to the store's mode.
    ///
    /// Multi mode adds or removes the id. Single mode makes it the only
    /// selected id, even if it already was.
    ///
    /// On `Ok` the new selection is durable and every subscriber has seen
    /// it. On `Err` nothing changed in memory and nothing was published.
    pub fn toggle_selection(&self, item_id: i32) -> Result<()> {
        if !self.index.contains_key(&item_id) {
            warn!("SelectionStore: toggle of unknown item {}", item_id);
            return Err(SelectionError::UnknownItem(item_id));
        }

        let _mutation = self.mutation.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.selection.get();
        let next = self.config.mode.apply(&current, item_id);

        if let Err(e) = write_selection(&self.prefs, &self.config, &next) {
            warn!("SelectionStore: selection not saved: {}", e);
            return Err(e);
        }

        debug!("SelectionStore: toggled {} -> {:?}", item_id, next);
        self.selection.publish(next);
        Ok(())
    }

    /// End the session: release every subscriber of both channels.
    pub fn dispose(self) {
        debug!(
            "SelectionStore: disposing ({} item, {} selection subscribers)",
            self.items.subscriber_count(),
            self.selection.subscriber_count()
        );
    }
}

impl Drop for SelectionStore {
    fn drop(&mut self) {
        self.items.clear();
        self.selection.clear();
    }
}

fn load_items(prefs: &Prefs, config: &StoreConfig) -> Result<Vec<Item>> {
    let key = &config.keys.items;
    match prefs.get_string(key) {
        Ok(Some(json)) => match codec::decode_items(&json) {
            Ok(items) => return Ok(items),
            Err(e) => warn!("SelectionStore: stored item list rejected ({}), re-seeding", e),
        },
        Ok(None) => debug!("SelectionStore: no item list under {:?}, seeding", key),
        Err(KVError::Serialization(e)) => {
            warn!("SelectionStore: stored item list unreadable ({}), re-seeding", e)
        }
        Err(e) => return Err(load_err(key)(e)),
    }

    let items = Item::seed(config.seed_count);
    let json = codec::encode_items(&items)
        .map_err(|e| persist_err(key)(KVError::Serialization(e.to_string())))?;
    prefs.put_string(key, &json).map_err(persist_err(key))?;
    info!("SelectionStore: seeded {} items", items.len());
    Ok(items)
}

fn load_selection(
    prefs: &Prefs,
    config: &StoreConfig,
    index: &HashMap<i32, usize>,
) -> Result<Selection> {
    let key = config.selection_key();
    let stored = match config.mode {
        SelectionMode::Multi => match prefs.get_string_set(key) {
            Ok(Some(raw)) => codec::decode_id_set(&raw),
            Ok(None) => Selection::new(),
            Err(KVError::Serialization(e)) => {
                warn!("SelectionStore: stored selection unreadable ({}), starting empty", e);
                Selection::new()
            }
            Err(e) => return Err(load_err(key)(e)),
        },
        SelectionMode::Single => {
            let raw = prefs
                .get_int(key, codec::NO_SELECTION)
                .map_err(load_err(key))?;
            codec::decode_single(raw)
        }
    };

    let selection: Selection = stored
        .iter()
        .copied()
        .filter(|id| index.contains_key(id))
        .collect();
    if selection.len() != stored.len() {
        let stale: Vec<i32> = stored.difference(&selection).copied().collect();
        warn!("SelectionStore: dropping stale selection ids {:?}", stale);
        write_selection(prefs, config, &selection)?;
    }
    Ok(selection)
}

fn write_selection(prefs: &Prefs, config: &StoreConfig, selection: &Selection) -> Result<()> {
    let key = config.selection_key();
    let written = match config.mode {
        SelectionMode::Multi => prefs.put_string_set(key, &codec::encode_id_set(selection)),
        SelectionMode::Single => prefs.put_int(key, codec::encode_single(selection)),
    };
    written.map_err(persist_err(key))
}
