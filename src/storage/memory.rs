use super::StoreError;
use bytes::Bytes;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// The four namespaces. Containers are never left empty: the last removal
/// from a list, set or hash drops its key.
#[derive(Debug, Default)]
pub(super) struct Keyspace {
    pub(super) strings: HashMap<Bytes, Bytes>,
    pub(super) lists: HashMap<Bytes, VecDeque<Bytes>>,
    pub(super) sets: HashMap<Bytes, HashSet<Bytes>>,
    pub(super) hashes: HashMap<Bytes, HashMap<Bytes, Bytes>>,
}

/// In-memory store shared by every connection.
///
/// A single coarse `RwLock` guards all namespaces and is held for the whole of
/// each operation, so multi-step operations (push then length, remove then
/// drop-if-empty) are atomic. Reads run in parallel; any write excludes
/// everything else. Values are copied out before the lock is released.
pub struct MemoryStore {
    keyspace: RwLock<Keyspace>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            keyspace: RwLock::new(Keyspace::default()),
        }
    }

    pub(super) fn read(&self) -> RwLockReadGuard<'_, Keyspace> {
        self.keyspace.read()
    }

    pub(super) fn write(&self) -> RwLockWriteGuard<'_, Keyspace> {
        self.keyspace.write()
    }

    /// True if the key is present in any namespace.
    pub fn exists(&self, key: &[u8]) -> bool {
        let keyspace = self.read();
        keyspace.strings.contains_key(key)
            || keyspace.lists.contains_key(key)
            || keyspace.sets.contains_key(key)
            || keyspace.hashes.contains_key(key)
    }

    /// Remove the key from every namespace. Returns true if it was in at least one.
    pub fn delete(&self, key: &[u8]) -> bool {
        let mut keyspace = self.write();
        let string = keyspace.strings.remove(key).is_some();
        let list = keyspace.lists.remove(key).is_some();
        let set = keyspace.sets.remove(key).is_some();
        let hash = keyspace.hashes.remove(key).is_some();
        string || list || set || hash
    }

    /// Number of distinct keys across all namespaces.
    pub fn keys_count(&self) -> usize {
        let keyspace = self.read();
        let mut keys: HashSet<&Bytes> = HashSet::new();
        keys.extend(keyspace.strings.keys());
        keys.extend(keyspace.lists.keys());
        keys.extend(keyspace.sets.keys());
        keys.extend(keyspace.hashes.keys());
        keys.len()
    }

    /// Remove all keys from all namespaces.
    pub fn flush(&self) {
        *self.write() = Keyspace::default();
    }

    /// Persistence hook. Nothing is written anywhere; callers must not assume
    /// any durability.
    pub fn save(&self) -> Result<(), StoreError> {
        debug!(keys = self.keys_count(), "save requested, persistence is not implemented");
        Ok(())
    }
}
