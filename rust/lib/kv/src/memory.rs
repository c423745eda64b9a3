use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::KVError;
use crate::traits::KVStore;

/// MemoryStore is an in-process KVStore backed by a `BTreeMap`.
///
/// Nothing survives the process, but a single instance can be shared by
/// several consumers (for example a store that is dropped and reconstructed
/// within one test). `fail_writes(true)` makes every mutation return
/// `KVError::Storage` until switched off again.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty MemoryStore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle injected write failures.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self, key: &str) -> Result<(), KVError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KVError::Storage(format!("write to '{}' rejected", key)));
        }
        Ok(())
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.check_writable(key)?;
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.check_writable(key)?;
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.len(), 1);

        store.delete("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
    }

    #[test]
    fn scan_is_sorted_and_prefix_bounded() {
        let store = MemoryStore::new();
        store.set("item:2", b"b").unwrap();
        store.set("item:1", b"a").unwrap();
        store.set("items", b"x").unwrap();

        let keys: Vec<String> = store
            .scan("item:")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["item:1", "item:2"]);
    }

    #[test]
    fn injected_failure_rejects_writes_but_not_reads() {
        let store = MemoryStore::new();
        store.set("k", b"v").unwrap();

        store.fail_writes(true);
        assert!(matches!(store.set("k", b"w"), Err(KVError::Storage(_))));
        assert!(matches!(store.delete("k"), Err(KVError::Storage(_))));
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));

        store.fail_writes(false);
        store.set("k", b"w").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"w".to_vec()));
    }
}
