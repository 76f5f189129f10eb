//! Index Manager — inverted value→row-id-set maintenance.
//!
//! For each indexed column the backend holds one set per distinct value:
//! `{table}:idx:<col>:<value> → {row ids}`. Invariant after every
//! successful mutation (modulo the documented DROP INDEX window): a live
//! row's id is in exactly the value-set matching its stored value, and in
//! no other value-set of that column.
//!
//! Callers (the Mutation Pipeline and DDL) invoke these hooks only for
//! columns the Schema Registry reports as indexed, synchronously within
//! the same logical operation.

use crate::engine::TableEngine;
use crate::error::{TableError, TableResult};
use crate::storage::{KvStore, keys};
use std::collections::BTreeSet;

impl<S: KvStore> TableEngine<S> {
    /// Register a freshly inserted value.
    pub(crate) fn index_on_insert(
        &self,
        full: &str,
        column: &str,
        value: &str,
        row_id: u64,
    ) -> TableResult<()> {
        self.store
            .set_add(&keys::index_key(full, column, value), &row_id.to_string())?;
        Ok(())
    }

    /// Move a row between value-sets after an update. No-op when the value
    /// did not change.
    pub(crate) fn index_on_update(
        &self,
        full: &str,
        column: &str,
        old_value: Option<&str>,
        new_value: &str,
        row_id: u64,
    ) -> TableResult<()> {
        if old_value == Some(new_value) {
            return Ok(());
        }
        let id = row_id.to_string();
        if let Some(old_value) = old_value {
            self.store
                .set_remove(&keys::index_key(full, column, old_value), &id)?;
        }
        self.store
            .set_add(&keys::index_key(full, column, new_value), &id)?;
        Ok(())
    }

    /// Unregister a value of a row being deleted.
    pub(crate) fn index_on_delete(
        &self,
        full: &str,
        column: &str,
        value: &str,
        row_id: u64,
    ) -> TableResult<()> {
        self.store
            .set_remove(&keys::index_key(full, column, value), &row_id.to_string())?;
        Ok(())
    }

    /// Build the index of one column from every live row. Rows without a
    /// value for the column are skipped. Used by ADD INDEX.
    pub(crate) fn build_index(&self, full: &str, column: &str) -> TableResult<()> {
        let row_ids = self.store.set_members(&keys::rows_key(full))?;
        let mut indexed = 0u64;
        for id in &row_ids {
            if let Some(value) = self.store.hash_get(&keys::row_key_str(full, id), column)? {
                self.store
                    .set_add(&keys::index_key(full, column, &value), id)?;
                indexed += 1;
            }
        }
        tracing::debug!(table = full, column, rows = indexed, "index backfilled");
        Ok(())
    }

    /// Erase every value-set of one column. One delete per distinct value;
    /// not atomic as a whole.
    pub(crate) fn drop_index_entries(&self, full: &str, column: &str) -> TableResult<()> {
        for key in self.store.scan_keys(&keys::index_pattern(full, column))? {
            self.store.delete_key(&key)?;
        }
        Ok(())
    }

    /// Indexed equality lookup: the set of row ids holding `value` in
    /// `column`. O(1) amortized in table size.
    pub(crate) fn index_seed(
        &self,
        full: &str,
        column: &str,
        value: &str,
    ) -> TableResult<BTreeSet<u64>> {
        let members = self.store.set_members(&keys::index_key(full, column, value))?;
        parse_row_ids(&members)
    }

    /// Every live row id of a table.
    pub(crate) fn all_row_ids(&self, full: &str) -> TableResult<BTreeSet<u64>> {
        let members = self.store.set_members(&keys::rows_key(full))?;
        parse_row_ids(&members)
    }
}

/// Parse stored row-id members; a non-numeric member means the backend
/// record is corrupt.
fn parse_row_ids(members: &[String]) -> TableResult<BTreeSet<u64>> {
    members
        .iter()
        .map(|m| {
            m.parse::<u64>()
                .map_err(|_| TableError::Storage(format!("corrupt row id '{m}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::storage::MemoryStore;

    fn engine() -> TableEngine<MemoryStore> {
        TableEngine::new(MemoryStore::new(), EngineConfig::default())
    }

    #[test]
    fn test_insert_then_seed() {
        let e = engine();
        e.index_on_insert("t", "city", "paris", 1).unwrap();
        e.index_on_insert("t", "city", "paris", 2).unwrap();
        e.index_on_insert("t", "city", "lyon", 3).unwrap();

        let seed = e.index_seed("t", "city", "paris").unwrap();
        assert_eq!(seed.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_update_moves_between_value_sets() {
        let e = engine();
        e.index_on_insert("t", "city", "paris", 1).unwrap();
        e.index_on_update("t", "city", Some("paris"), "lyon", 1).unwrap();

        assert!(e.index_seed("t", "city", "paris").unwrap().is_empty());
        assert!(e.index_seed("t", "city", "lyon").unwrap().contains(&1));
    }

    #[test]
    fn test_update_same_value_is_noop() {
        let e = engine();
        e.index_on_insert("t", "city", "paris", 1).unwrap();
        e.index_on_update("t", "city", Some("paris"), "paris", 1).unwrap();
        assert!(e.index_seed("t", "city", "paris").unwrap().contains(&1));
    }

    #[test]
    fn test_update_from_missing_value() {
        let e = engine();
        e.index_on_update("t", "city", None, "paris", 1).unwrap();
        assert!(e.index_seed("t", "city", "paris").unwrap().contains(&1));
    }

    #[test]
    fn test_delete_removes() {
        let e = engine();
        e.index_on_insert("t", "city", "paris", 1).unwrap();
        e.index_on_delete("t", "city", "paris", 1).unwrap();
        assert!(e.index_seed("t", "city", "paris").unwrap().is_empty());
    }

    #[test]
    fn test_drop_index_entries() {
        let e = engine();
        e.index_on_insert("t", "city", "paris", 1).unwrap();
        e.index_on_insert("t", "city", "lyon", 2).unwrap();
        e.index_on_insert("t", "age", "30", 1).unwrap();

        e.drop_index_entries("t", "city").unwrap();
        assert!(e.index_seed("t", "city", "paris").unwrap().is_empty());
        assert!(e.index_seed("t", "city", "lyon").unwrap().is_empty());
        // Other columns untouched.
        assert!(e.index_seed("t", "age", "30").unwrap().contains(&1));
    }

    #[test]
    fn test_seed_missing_value_is_empty() {
        let e = engine();
        assert!(e.index_seed("t", "city", "nowhere").unwrap().is_empty());
    }
}
