//! Key layout and pattern matching.
//!
//! Every key belonging to one table carries the `{namespace.table}` hash
//! tag, the naming discipline that keeps a table's schema, rows and index
//! sets co-located on one partition when the backend is distributed.

/// Namespace marker / table schema record: `schema:{<name>}`.
pub fn schema_key(name: &str) -> String {
    format!("schema:{{{name}}}")
}

/// Row-id counter for a table: `{<full>}:id`.
pub fn id_key(full: &str) -> String {
    format!("{{{full}}}:id")
}

/// Set of live row ids: `{<full>}:rows`.
pub fn rows_key(full: &str) -> String {
    format!("{{{full}}}:rows")
}

/// One row hash: `{<full>}:<id>`.
pub fn row_key(full: &str, row_id: u64) -> String {
    format!("{{{full}}}:{row_id}")
}

/// Row hash key from a stored (string) row id.
pub fn row_key_str(full: &str, row_id: &str) -> String {
    format!("{{{full}}}:{row_id}")
}

/// Index value-set: `{<full>}:idx:<col>:<value>`.
pub fn index_key(full: &str, column: &str, value: &str) -> String {
    format!("{{{full}}}:idx:{column}:{value}")
}

/// Pattern matching every value-set of one indexed column.
pub fn index_pattern(full: &str, column: &str) -> String {
    format!("{{{full}}}:idx:{column}:*")
}

/// Pattern matching every index key of a table.
pub fn index_pattern_all(full: &str) -> String {
    format!("{{{full}}}:idx:*")
}

/// Glob match with `*` as the only wildcard (any run of characters).
///
/// Matches the subset of the backend's MATCH syntax this engine uses.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    fn inner(p: &[u8], k: &[u8]) -> bool {
        match p.first() {
            None => k.is_empty(),
            Some(b'*') => {
                // Try every possible span for the wildcard.
                (0..=k.len()).any(|i| inner(&p[1..], &k[i..]))
            }
            Some(&c) => k.first() == Some(&c) && inner(&p[1..], &k[1..]),
        }
    }
    inner(pattern.as_bytes(), key.as_bytes())
}
