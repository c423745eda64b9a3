//! Typed preferences over a byte-level [`KVStore`].
//!
//! Encodings:
//!
//! - string: UTF-8 bytes
//! - string set: JSON array of strings, sorted
//! - int: decimal string

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::error::KVError;
use crate::traits::KVStore;

/// Prefs exposes strings, string sets and integers on top of any KVStore.
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct Prefs {
    kv: Arc<dyn KVStore>,
}

impl Prefs {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Get a string value. Returns None if the key does not exist.
    pub fn get_string(&self, key: &str) -> Result<Option<String>, KVError> {
        match self.kv.get(key)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| KVError::Serialization(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn put_string(&self, key: &str, value: &str) -> Result<(), KVError> {
        self.kv.set(key, value.as_bytes())
    }

    /// Get a string set. Returns None if the key does not exist.
    pub fn get_string_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, KVError> {
        match self.kv.get(key)? {
            Some(bytes) => serde_json::from_slice::<BTreeSet<String>>(&bytes)
                .map(Some)
                .map_err(|e| KVError::Serialization(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn put_string_set(&self, key: &str, value: &BTreeSet<String>) -> Result<(), KVError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| KVError::Serialization(format!("{}: {}", key, e)))?;
        self.kv.set(key, &bytes)
    }

    /// Get an integer, or `default` if the key is absent or unparseable.
    pub fn get_int(&self, key: &str, default: i32) -> Result<i32, KVError> {
        let Some(bytes) = self.kv.get(key)? else {
            return Ok(default);
        };
        let parsed = std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.trim().parse::<i32>().ok());
        match parsed {
            Some(v) => Ok(v),
            None => {
                warn!("Prefs: value under {:?} is not an integer, using {}", key, default);
                Ok(default)
            }
        }
    }

    pub fn put_int(&self, key: &str, value: i32) -> Result<(), KVError> {
        self.kv.set(key, value.to_string().as_bytes())
    }

    pub fn contains(&self, key: &str) -> Result<bool, KVError> {
        Ok(self.kv.get(key)?.is_some())
    }

    pub fn remove(&self, key: &str) -> Result<(), KVError> {
        self.kv.delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn prefs() -> (Prefs, Arc<MemoryStore>) {
        let mem = Arc::new(MemoryStore::new());
        (Prefs::new(mem.clone()), mem)
    }

    fn set_of(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ========================================================================
    // Strings
    // ========================================================================

    #[test]
    fn string_absent_then_present() {
        let (prefs, _) = prefs();
        assert_eq!(prefs.get_string("ItemList").unwrap(), None);

        prefs.put_string("ItemList", "[]").unwrap();
        assert_eq!(prefs.get_string("ItemList").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn string_invalid_utf8_is_serialization_error() {
        let (prefs, mem) = prefs();
        mem.set("bad", &[0xff, 0xfe]).unwrap();
        assert!(matches!(
            prefs.get_string("bad"),
            Err(KVError::Serialization(_))
        ));
    }

    // ========================================================================
    // String sets
    // ========================================================================

    #[test]
    fn string_set_stored_as_sorted_json_array() {
        let (prefs, mem) = prefs();
        prefs.put_string_set("SelectedIds", &set_of(&["7", "3"])).unwrap();

        let raw = mem.get("SelectedIds").unwrap().unwrap();
        assert_eq!(raw, br#"["3","7"]"#.to_vec());
        assert_eq!(
            prefs.get_string_set("SelectedIds").unwrap(),
            Some(set_of(&["3", "7"]))
        );
    }

    #[test]
    fn empty_string_set_is_present() {
        let (prefs, _) = prefs();
        prefs.put_string_set("SelectedIds", &BTreeSet::new()).unwrap();
        assert_eq!(prefs.get_string_set("SelectedIds").unwrap(), Some(BTreeSet::new()));
    }

    #[test]
    fn string_set_not_json_is_serialization_error() {
        let (prefs, mem) = prefs();
        mem.set("SelectedIds", b"3,7").unwrap();
        assert!(matches!(
            prefs.get_string_set("SelectedIds"),
            Err(KVError::Serialization(_))
        ));
    }

    // ========================================================================
    // Integers
    // ========================================================================

    #[test]
    fn int_absent_returns_default() {
        let (prefs, _) = prefs();
        assert_eq!(prefs.get_int("SelectedId", -1).unwrap(), -1);
    }

    #[test]
    fn int_round_trips_including_negative() {
        let (prefs, _) = prefs();
        prefs.put_int("SelectedId", 12).unwrap();
        assert_eq!(prefs.get_int("SelectedId", -1).unwrap(), 12);

        prefs.put_int("SelectedId", -1).unwrap();
        assert_eq!(prefs.get_int("SelectedId", 0).unwrap(), -1);
    }

    #[test]
    fn int_unparseable_returns_default() {
        let (prefs, mem) = prefs();
        mem.set("SelectedId", b"seven").unwrap();
        assert_eq!(prefs.get_int("SelectedId", -1).unwrap(), -1);
    }

    // ========================================================================
    // Failures propagate
    // ========================================================================

    #[test]
    fn write_failure_propagates() {
        let (prefs, mem) = prefs();
        mem.fail_writes(true);
        assert!(prefs.put_string("k", "v").is_err());
        assert!(prefs.put_int("k", 1).is_err());
        assert!(prefs.put_string_set("k", &set_of(&["1"])).is_err());
    }

    #[test]
    fn contains_and_remove() {
        let (prefs, _) = prefs();
        prefs.put_int("SelectedId", 1).unwrap();
        assert!(prefs.contains("SelectedId").unwrap());

        prefs.remove("SelectedId").unwrap();
        assert!(!prefs.contains("SelectedId").unwrap());
    }
}
