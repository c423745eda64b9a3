use crate::error::KVError;

/// KVStore provides a durable, synchronous byte-level key-value interface.
///
/// Writes are visible to subsequent reads as soon as the call returns.
/// Higher-level typed access (strings, string sets, integers) lives in
/// [`Prefs`](crate::Prefs).
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. No-op if the key does not exist.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
