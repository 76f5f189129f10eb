//! Durable backend — sled-encoded hashes, sets and counters.
//!
//! Logical records are flattened into sled keys:
//!
//! ```text
//! h <NUL> <key> <NUL> <field>   → value bytes       (hash field)
//! s <NUL> <key> <NUL> <member>  → empty             (set member)
//! c <NUL> <key>                 → u64 big-endian    (counter)
//! ```
//!
//! Every primitive maps to a single sled operation, so the per-primitive
//! atomicity the engine relies on holds here too (`counter_incr` uses
//! `update_and_fetch`).

use crate::error::{TableError, TableResult};
use crate::storage::KvStore;
use crate::storage::keys::glob_match;
use std::path::Path;

const HASH_PREFIX: u8 = b'h';
const SET_PREFIX: u8 = b's';
const COUNTER_PREFIX: u8 = b'c';
const SEP: u8 = 0;

/// Durable [`KvStore`] backed by a sled `Db`.
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open (or create) a store at the given directory path.
    pub fn open(path: &Path) -> TableResult<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Open a temporary store (for testing). Data is deleted on drop.
    pub fn open_temporary() -> TableResult<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config.open()?;
        Ok(Self { db })
    }

    fn encode(kind: u8, key: &str, suffix: Option<&str>) -> Vec<u8> {
        let mut out = Vec::with_capacity(key.len() + 8);
        out.push(kind);
        out.push(SEP);
        out.extend_from_slice(key.as_bytes());
        if let Some(suffix) = suffix {
            out.push(SEP);
            out.extend_from_slice(suffix.as_bytes());
        }
        out
    }

    /// Prefix covering every field/member of one hash or set record.
    fn record_prefix(kind: u8, key: &str) -> Vec<u8> {
        let mut out = Self::encode(kind, key, None);
        out.push(SEP);
        out
    }

    fn utf8(bytes: &[u8]) -> TableResult<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| TableError::Storage(format!("non-utf8 record: {e}")))
    }

    /// Suffix (field or member) of a flattened sled key.
    fn suffix_of(full_key: &[u8], prefix_len: usize) -> TableResult<String> {
        Self::utf8(&full_key[prefix_len..])
    }
}

impl KvStore for SledStore {
    fn hash_set(&self, key: &str, field: &str, value: &str) -> TableResult<()> {
        self.db
            .insert(Self::encode(HASH_PREFIX, key, Some(field)), value.as_bytes())?;
        Ok(())
    }

    fn hash_get(&self, key: &str, field: &str) -> TableResult<Option<String>> {
        match self.db.get(Self::encode(HASH_PREFIX, key, Some(field)))? {
            Some(ivec) => Ok(Some(Self::utf8(&ivec)?)),
            None => Ok(None),
        }
    }

    fn hash_get_all(&self, key: &str) -> TableResult<Vec<(String, String)>> {
        let prefix = Self::record_prefix(HASH_PREFIX, key);
        let mut out = Vec::new();
        for item in self.db.scan_prefix(&prefix) {
            let (k, v) = item?;
            out.push((Self::suffix_of(&k, prefix.len())?, Self::utf8(&v)?));
        }
        Ok(out)
    }

    fn set_add(&self, key: &str, member: &str) -> TableResult<bool> {
        let prev = self
            .db
            .insert(Self::encode(SET_PREFIX, key, Some(member)), &[])?;
        Ok(prev.is_none())
    }

    fn set_remove(&self, key: &str, member: &str) -> TableResult<bool> {
        let prev = self.db.remove(Self::encode(SET_PREFIX, key, Some(member)))?;
        Ok(prev.is_some())
    }

    fn set_members(&self, key: &str) -> TableResult<Vec<String>> {
        let prefix = Self::record_prefix(SET_PREFIX, key);
        let mut out = Vec::new();
        for item in self.db.scan_prefix(&prefix) {
            let (k, _) = item?;
            out.push(Self::suffix_of(&k, prefix.len())?);
        }
        Ok(out)
    }

    fn set_contains(&self, key: &str, member: &str) -> TableResult<bool> {
        Ok(self
            .db
            .contains_key(Self::encode(SET_PREFIX, key, Some(member)))?)
    }

    fn counter_incr(&self, key: &str) -> TableResult<u64> {
        let updated = self
            .db
            .update_and_fetch(Self::encode(COUNTER_PREFIX, key, None), |old| {
                let current = old
                    .and_then(|b| b.try_into().ok())
                    .map(u64::from_be_bytes)
                    .unwrap_or(0);
                Some((current + 1).to_be_bytes().to_vec())
            })?;
        let bytes = updated.ok_or_else(|| TableError::Storage("counter vanished".to_string()))?;
        let arr: [u8; 8] = bytes
            .as_ref()
            .try_into()
            .map_err(|_| TableError::Storage("corrupt counter record".to_string()))?;
        Ok(u64::from_be_bytes(arr))
    }

    fn scan_keys(&self, pattern: &str) -> TableResult<Vec<String>> {
        let mut keys = Vec::new();
        for item in self.db.iter() {
            let (k, _) = item?;
            if k.len() < 2 {
                continue;
            }
            let logical = match k[0] {
                HASH_PREFIX | SET_PREFIX => {
                    // Between the first and second separators.
                    let body = &k[2..];
                    match body.iter().position(|&b| b == SEP) {
                        Some(pos) => Self::utf8(&body[..pos])?,
                        None => continue,
                    }
                }
                COUNTER_PREFIX => Self::utf8(&k[2..])?,
                _ => continue,
            };
            if glob_match(pattern, &logical) {
                keys.push(logical);
            }
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    fn delete_key(&self, key: &str) -> TableResult<bool> {
        let mut existed = false;
        for kind in [HASH_PREFIX, SET_PREFIX] {
            let prefix = Self::record_prefix(kind, key);
            let entries: Vec<_> = self
                .db
                .scan_prefix(&prefix)
                .keys()
                .collect::<Result<_, _>>()?;
            for k in entries {
                existed |= self.db.remove(k)?.is_some();
            }
        }
        existed |= self
            .db
            .remove(Self::encode(COUNTER_PREFIX, key, None))?
            .is_some();
        Ok(existed)
    }

    fn key_exists(&self, key: &str) -> TableResult<bool> {
        for kind in [HASH_PREFIX, SET_PREFIX] {
            let prefix = Self::record_prefix(kind, key);
            if self.db.scan_prefix(&prefix).next().transpose()?.is_some() {
                return Ok(true);
            }
        }
        Ok(self
            .db
            .contains_key(Self::encode(COUNTER_PREFIX, key, None))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SledStore {
        SledStore::open_temporary().unwrap()
    }

    #[test]
    fn test_hash_round_trip() {
        let s = store();
        s.hash_set("k", "f1", "v1").unwrap();
        s.hash_set("k", "f2", "v2").unwrap();
        assert_eq!(s.hash_get("k", "f1").unwrap(), Some("v1".to_string()));
        let mut all = s.hash_get_all("k").unwrap();
        all.sort();
        assert_eq!(
            all,
            vec![
                ("f1".to_string(), "v1".to_string()),
                ("f2".to_string(), "v2".to_string())
            ]
        );
    }

    #[test]
    fn test_set_round_trip() {
        let s = store();
        assert!(s.set_add("s", "m1").unwrap());
        assert!(!s.set_add("s", "m1").unwrap());
        assert!(s.set_contains("s", "m1").unwrap());
        assert!(s.set_remove("s", "m1").unwrap());
        assert!(!s.set_contains("s", "m1").unwrap());
    }

    #[test]
    fn test_counter_monotonic() {
        let s = store();
        assert_eq!(s.counter_incr("c").unwrap(), 1);
        assert_eq!(s.counter_incr("c").unwrap(), 2);
    }

    #[test]
    fn test_scan_and_delete() {
        let s = store();
        s.set_add("{t}:idx:a:1", "1").unwrap();
        s.set_add("{t}:idx:a:2", "2").unwrap();
        s.hash_set("{t}:1", "a", "1").unwrap();

        assert_eq!(
            s.scan_keys("{t}:idx:a:*").unwrap(),
            vec!["{t}:idx:a:1", "{t}:idx:a:2"]
        );

        assert!(s.delete_key("{t}:1").unwrap());
        assert!(!s.key_exists("{t}:1").unwrap());
        assert!(s.key_exists("{t}:idx:a:1").unwrap());
    }

    #[test]
    fn test_keys_isolated_by_kind() {
        let s = store();
        s.hash_set("k", "f", "v").unwrap();
        // A set under the same logical key is a distinct record.
        assert!(!s.set_contains("k", "f").unwrap());
    }

    #[test]
    fn test_reopen_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let s = SledStore::open(dir.path()).unwrap();
            s.hash_set("k", "f", "v").unwrap();
        }
        let s = SledStore::open(dir.path()).unwrap();
        assert_eq!(s.hash_get("k", "f").unwrap(), Some("v".to_string()));
    }
}
