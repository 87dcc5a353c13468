use super::MemoryStore;
use bytes::Bytes;
use std::collections::VecDeque;

impl MemoryStore {
    /// Prepend each value in turn, so a batch ends up reversed at the head:
    /// pushing `a, b` onto `[x]` gives `[b, a, x]`. Returns the new length.
    pub fn lpush<I>(&self, key: Bytes, values: I) -> usize
    where
        I: IntoIterator<Item = Bytes>,
    {
        self.push(key, values, VecDeque::push_front)
    }

    /// Append each value in the given order. Returns the new length.
    pub fn rpush<I>(&self, key: Bytes, values: I) -> usize
    where
        I: IntoIterator<Item = Bytes>,
    {
        self.push(key, values, VecDeque::push_back)
    }

    fn push<I>(&self, key: Bytes, values: I, push: fn(&mut VecDeque<Bytes>, Bytes)) -> usize
    where
        I: IntoIterator<Item = Bytes>,
    {
        let mut values = values.into_iter().peekable();
        let mut keyspace = self.write();
        if values.peek().is_none() {
            return keyspace.lists.get(&key).map_or(0, VecDeque::len);
        }

        let list = keyspace.lists.entry(key).or_default();
        for value in values {
            push(list, value);
        }
        list.len()
    }

    pub fn lpop(&self, key: &[u8]) -> Option<Bytes> {
        self.pop(key, VecDeque::pop_front)
    }

    pub fn rpop(&self, key: &[u8]) -> Option<Bytes> {
        self.pop(key, VecDeque::pop_back)
    }

    fn pop(&self, key: &[u8], pop: fn(&mut VecDeque<Bytes>) -> Option<Bytes>) -> Option<Bytes> {
        let mut keyspace = self.write();
        let list = keyspace.lists.get_mut(key)?;
        let value = pop(list);
        if list.is_empty() {
            keyspace.lists.remove(key);
        }
        value
    }

    /// Inclusive range with negative indices counting from the tail
    /// (`-1` is the last element). Out-of-range bounds are clamped; an empty
    /// window yields an empty vector.
    pub fn lrange(&self, key: &[u8], start: i64, stop: i64) -> Vec<Bytes> {
        let keyspace = self.read();
        let Some(list) = keyspace.lists.get(key) else {
            return Vec::new();
        };

        let len = list.len() as i64;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

        if start > stop || start >= len {
            return Vec::new();
        }

        list.range(start as usize..=stop as usize).cloned().collect()
    }

    pub fn llen(&self, key: &[u8]) -> usize {
        self.read().lists.get(key).map_or(0, VecDeque::len)
    }
}
