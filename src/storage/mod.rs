//! In-memory data store.
//!
//! One [`MemoryStore`] holds four independent namespaces (strings, lists,
//! sets, hashes) behind a single reader/writer lock. A key may live in more
//! than one namespace at once; `DEL` and `EXISTS` look at all of them.

pub mod memory;

mod hashes;
mod lists;
mod sets;
mod strings;

pub use memory::MemoryStore;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The stored string is not a base-10 i64, or the result would overflow.
    #[error("value is not an integer or out of range")]
    NotAnInteger,
}
