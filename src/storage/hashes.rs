use super::MemoryStore;
use bytes::Bytes;
use std::collections::HashMap;

impl MemoryStore {
    /// Set one field. Returns true if the field did not exist before.
    pub fn hset(&self, key: Bytes, field: Bytes, value: Bytes) -> bool {
        self.write()
            .hashes
            .entry(key)
            .or_default()
            .insert(field, value)
            .is_none()
    }

    pub fn hget(&self, key: &[u8], field: &[u8]) -> Option<Bytes> {
        self.read().hashes.get(key)?.get(field).cloned()
    }

    /// Snapshot of every field and value.
    pub fn hgetall(&self, key: &[u8]) -> HashMap<Bytes, Bytes> {
        self.read().hashes.get(key).cloned().unwrap_or_default()
    }

    /// Remove fields. Returns how many existed. An emptied hash is deleted.
    pub fn hdel<I>(&self, key: &[u8], fields: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut keyspace = self.write();
        let Some(hash) = keyspace.hashes.get_mut(key) else {
            return 0;
        };

        let removed = fields
            .into_iter()
            .filter(|field| hash.remove(field.as_ref()).is_some())
            .count();
        if hash.is_empty() {
            keyspace.hashes.remove(key);
        }
        removed
    }

    pub fn hexists(&self, key: &[u8], field: &[u8]) -> bool {
        self.read()
            .hashes
            .get(key)
            .is_some_and(|hash| hash.contains_key(field))
    }

    pub fn hlen(&self, key: &[u8]) -> usize {
        self.read().hashes.get(key).map_or(0, HashMap::len)
    }
}
