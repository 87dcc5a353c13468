use super::{MemoryStore, StoreError};
use bytes::Bytes;

impl MemoryStore {
    /// Overwrite the string entry unconditionally.
    pub fn set(&self, key: Bytes, value: Bytes) {
        self.write().strings.insert(key, value);
    }

    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.read().strings.get(key).cloned()
    }

    /// Add one. An absent key starts from zero, so the first call returns 1.
    pub fn incr(&self, key: Bytes) -> Result<i64, StoreError> {
        self.incr_by(key, 1)
    }

    /// Subtract one. An absent key starts from zero, so the first call returns -1.
    pub fn decr(&self, key: Bytes) -> Result<i64, StoreError> {
        self.incr_by(key, -1)
    }

    fn incr_by(&self, key: Bytes, delta: i64) -> Result<i64, StoreError> {
        let mut keyspace = self.write();
        let next = match keyspace.strings.get(&key) {
            None => delta,
            Some(current) => parse_integer(current)?
                .checked_add(delta)
                .ok_or(StoreError::NotAnInteger)?,
        };
        keyspace.strings.insert(key, Bytes::from(next.to_string()));
        Ok(next)
    }
}

fn parse_integer(value: &[u8]) -> Result<i64, StoreError> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(StoreError::NotAnInteger)
}
