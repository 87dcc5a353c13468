use super::MemoryStore;
use bytes::Bytes;
use std::collections::HashSet;

impl MemoryStore {
    /// Add members to the set, creating it if needed. Returns how many were
    /// not already present.
    pub fn sadd<I>(&self, key: Bytes, members: I) -> usize
    where
        I: IntoIterator<Item = Bytes>,
    {
        let mut members = members.into_iter().peekable();
        if members.peek().is_none() {
            return 0;
        }

        let mut keyspace = self.write();
        let set = keyspace.sets.entry(key).or_default();
        members.filter(|member| set.insert(member.clone())).count()
    }

    /// All members, in no particular order.
    pub fn smembers(&self, key: &[u8]) -> Vec<Bytes> {
        self.read()
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn sismember(&self, key: &[u8], member: &[u8]) -> bool {
        self.read()
            .sets
            .get(key)
            .is_some_and(|set| set.contains(member))
    }

    /// Remove members. Returns how many were present. An emptied set is deleted.
    pub fn srem<I>(&self, key: &[u8], members: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut keyspace = self.write();
        let Some(set) = keyspace.sets.get_mut(key) else {
            return 0;
        };

        let removed = members
            .into_iter()
            .filter(|member| set.remove(member.as_ref()))
            .count();
        if set.is_empty() {
            keyspace.sets.remove(key);
        }
        removed
    }

    pub fn scard(&self, key: &[u8]) -> usize {
        self.read().sets.get(key).map_or(0, HashSet::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(values: &[&'static str]) -> Vec<Bytes> {
        values.iter().map(|v| Bytes::from(*v)).collect()
    }

    fn sorted(mut values: Vec<Bytes>) -> Vec<Bytes> {
        values.sort();
        values
    }

    #[test]
    fn test_sadd_counts_new_members_only() {
        let store = MemoryStore::new();
        assert_eq!(store.sadd(Bytes::from("s"), members(&["a", "b", "a"])), 2);
        assert_eq!(store.sadd(Bytes::from("s"), members(&["b", "c"])), 1);
        assert_eq!(store.scard(b"s"), 3);
    }

    #[test]
    fn test_sadd_nothing_creates_nothing() {
        let store = MemoryStore::new();
        assert_eq!(store.sadd(Bytes::from("s"), Vec::new()), 0);
        assert!(!store.exists(b"s"));
    }

    #[test]
    fn test_smembers() {
        let store = MemoryStore::new();
        store.sadd(Bytes::from("s"), members(&["b", "a", "c"]));
        assert_eq!(sorted(store.smembers(b"s")), members(&["a", "b", "c"]));
        assert!(store.smembers(b"missing").is_empty());
    }

    #[test]
    fn test_sismember() {
        let store = MemoryStore::new();
        store.sadd(Bytes::from("s"), members(&["a"]));
        assert!(store.sismember(b"s", b"a"));
        assert!(!store.sismember(b"s", b"z"));
        assert!(!store.sismember(b"missing", b"a"));
    }

    #[test]
    fn test_srem_counts_present_members() {
        let store = MemoryStore::new();
        store.sadd(Bytes::from("s"), members(&["a", "b", "c"]));
        assert_eq!(store.srem(b"s", [b"a".as_slice(), b"z".as_slice()]), 1);
        assert_eq!(store.scard(b"s"), 2);
        assert_eq!(store.srem(b"missing", [b"a".as_slice()]), 0);
    }

    #[test]
    fn test_srem_last_member_deletes_set() {
        let store = MemoryStore::new();
        store.sadd(Bytes::from("s"), members(&["a", "b"]));
        assert_eq!(store.srem(b"s", members(&["a", "b"])), 2);
        assert!(!store.exists(b"s"));
        assert_eq!(store.scard(b"s"), 0);
    }
}
