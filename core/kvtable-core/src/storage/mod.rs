//! Storage module — the key-value backend abstraction.
//!
//! All backends implement the [`KvStore`] trait.
//! The table engine depends only on this trait (Dependency Inversion
//! Principle), so any backend offering hashes, sets, atomic counters and
//! key scans can be substituted — including an in-process map for testing.

pub mod keys;
pub mod memory;
pub mod sled_store;

use crate::error::TableResult;

/// Core backend interface — exactly the four primitive capabilities the
/// engine composes: hash-maps, sets, atomic counters and key scans.
///
/// # Contract
///
/// - Each method is individually atomic; the engine composes several per
///   logical table operation without any cross-primitive transaction.
/// - `hash_set`: upsert semantics — overwrites an existing field.
/// - `hash_get`: returns `None` for missing keys or fields, never errors.
/// - `set_add` / `set_remove`: return whether membership changed.
/// - `counter_incr`: monotonically increasing, first call returns 1.
/// - `scan_keys`: matches logical key names against a glob pattern where
///   `*` matches any run of characters.
/// - `delete_key`: removes a key of any kind (hash, set or counter).
pub trait KvStore: Send + Sync {
    /// Set one field of a hash record.
    fn hash_set(&self, key: &str, field: &str, value: &str) -> TableResult<()>;

    /// Get one field of a hash record.
    fn hash_get(&self, key: &str, field: &str) -> TableResult<Option<String>>;

    /// Get every (field, value) pair of a hash record.
    fn hash_get_all(&self, key: &str) -> TableResult<Vec<(String, String)>>;

    /// Add a member to a set. Returns `true` if it was not already present.
    fn set_add(&self, key: &str, member: &str) -> TableResult<bool>;

    /// Remove a member from a set. Returns `true` if it was present.
    fn set_remove(&self, key: &str, member: &str) -> TableResult<bool>;

    /// All members of a set (empty for a missing key).
    fn set_members(&self, key: &str) -> TableResult<Vec<String>>;

    /// Membership test.
    fn set_contains(&self, key: &str, member: &str) -> TableResult<bool>;

    /// Atomically increment a counter and return the new value.
    fn counter_incr(&self, key: &str) -> TableResult<u64>;

    /// All logical key names matching a glob pattern (`*` wildcard).
    fn scan_keys(&self, pattern: &str) -> TableResult<Vec<String>>;

    /// Delete a key of any kind. Returns `true` if it existed.
    fn delete_key(&self, key: &str) -> TableResult<bool>;

    /// Whether a key of any kind exists.
    fn key_exists(&self, key: &str) -> TableResult<bool>;
}

pub use memory::MemoryStore;
pub use sled_store::SledStore;
