use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("prefs");

/// RedbStore is a KVStore implementation backed by redb, a pure-Rust embedded
/// key-value database. Every `set` commits its own write transaction, so a
/// value is durable once the call returns.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

fn storage<E: std::fmt::Display>(e: E) -> KVError {
    KVError::Storage(e.to_string())
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    ///
    /// The parent directory is created if it does not exist yet.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(storage)?;
            }
        }
        let db = Database::create(path).map_err(storage)?;

        // Ensure the table exists so the first read does not fail.
        let write_txn = db.begin_write().map_err(storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;

        debug!("RedbStore: opened {:?}", path);
        Ok(Self { db: Arc::new(db) })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(storage(e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            table.remove(key).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(storage)? {
            let (key, value) = entry.map_err(storage)?;
            let key = key.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key, value.value().to_vec()));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_tmp() -> (RedbStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = RedbStore::open(&tmp.path().join("prefs.redb")).unwrap();
        (store, tmp)
    }

    #[test]
    fn get_missing_returns_none() {
        let (store, _tmp) = open_tmp();
        assert!(store.get("ItemList").unwrap().is_none());
    }

    #[test]
    fn set_then_get() {
        let (store, _tmp) = open_tmp();
        store.set("SelectedId", b"7").unwrap();
        assert_eq!(store.get("SelectedId").unwrap(), Some(b"7".to_vec()));
    }

    #[test]
    fn set_overwrites() {
        let (store, _tmp) = open_tmp();
        store.set("k", b"one").unwrap();
        store.set("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn delete_removes_key() {
        let (store, _tmp) = open_tmp();
        store.set("k", b"v").unwrap();
        store.delete("k").unwrap();
        assert!(store.get("k").unwrap().is_none());

        // Deleting again is a no-op.
        store.delete("k").unwrap();
    }

    #[test]
    fn scan_stops_at_prefix_boundary() {
        let (store, _tmp) = open_tmp();
        store.set("Selected:a", b"1").unwrap();
        store.set("Selected:b", b"2").unwrap();
        store.set("SelectedIds", b"[]").unwrap();
        store.set("Z", b"3").unwrap();

        let keys: Vec<String> = store
            .scan("Selected:")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["Selected:a", "Selected:b"]);
    }

    #[test]
    fn values_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("ItemList", b"[]").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("ItemList").unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn open_creates_parent_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/prefs.redb");
        RedbStore::open(&path).unwrap();
        assert!(path.exists());
    }
}
