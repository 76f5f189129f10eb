//! Schema Registry — namespaces, table schemas, index metadata.
//!
//! The registry exclusively owns the column→{type, indexed} map. It is
//! persisted as one JSON document in a single hash field of the schema
//! record, so every metadata change (including flipping an indexed flag)
//! is one atomic backend write.

use crate::engine::TableEngine;
use crate::engine::types::{ColumnMeta, ColumnType, IndexMode, SchemaMetadata};
use crate::error::{TableError, TableResult};
use crate::storage::{KvStore, keys};

/// Maximum length of a namespace or table name segment.
pub const MAX_NAME_LEN: usize = 64;

/// Hash field holding the namespace marker.
const NS_FIELD: &str = "ns";

/// Hash field holding the schema JSON.
const META_FIELD: &str = "meta";

/// Split `namespace.table` into its segments, enforcing shape and the
/// per-segment length limit before any mutation.
pub fn split_full_name(full: &str) -> TableResult<(&str, &str)> {
    let (namespace, table) = full
        .split_once('.')
        .ok_or_else(|| TableError::BadTableName(full.to_string()))?;
    if namespace.is_empty() || table.is_empty() {
        return Err(TableError::BadTableName(full.to_string()));
    }
    if namespace.len() > MAX_NAME_LEN {
        return Err(TableError::NameTooLong { kind: "namespace" });
    }
    if table.len() > MAX_NAME_LEN {
        return Err(TableError::NameTooLong { kind: "table" });
    }
    Ok((namespace, table))
}

/// Parse a `name:type[:indexMode]` column spec.
pub fn parse_column_spec(spec: &str) -> TableResult<ColumnMeta> {
    let (name, rest) = spec
        .split_once(':')
        .ok_or_else(|| TableError::BadColumnSpec(spec.to_string()))?;
    if name.is_empty() {
        return Err(TableError::BadColumnSpec(spec.to_string()));
    }
    let (type_str, mode) = match rest.split_once(':') {
        Some((t, m)) => (t, IndexMode::parse(m)?),
        None => (rest, IndexMode::None),
    };
    Ok(ColumnMeta {
        name: name.to_string(),
        column_type: ColumnType::parse(type_str)?,
        indexed: mode.is_indexed(),
    })
}

impl<S: KvStore> TableEngine<S> {
    // ════════════════════════════════════════════
    // Namespace operations
    // ════════════════════════════════════════════

    /// Create a namespace. Fails if it already exists.
    pub fn create_namespace(&self, name: &str) -> TableResult<()> {
        if name.len() > MAX_NAME_LEN {
            return Err(TableError::NameTooLong { kind: "namespace" });
        }
        let key = keys::schema_key(name);
        if self.store.hash_get(&key, NS_FIELD)?.is_some() {
            return Err(TableError::NamespaceAlreadyExists(name.to_string()));
        }
        self.store.hash_set(&key, NS_FIELD, "1")
    }

    /// Whether a namespace exists.
    pub fn namespace_exists(&self, name: &str) -> TableResult<bool> {
        Ok(self
            .store
            .hash_get(&keys::schema_key(name), NS_FIELD)?
            .is_some())
    }

    // ════════════════════════════════════════════
    // Table DDL
    // ════════════════════════════════════════════

    /// Create a table under an existing namespace from `name:type[:mode]`
    /// column specs. A column repeated in the spec list keeps its last
    /// definition.
    pub fn create_table(&self, full: &str, specs: &[String]) -> TableResult<()> {
        let (namespace, _) = split_full_name(full)?;
        if !self.namespace_exists(namespace)? {
            return Err(TableError::NamespaceMissing(namespace.to_string()));
        }
        if self.table_exists(full)? {
            return Err(TableError::TableAlreadyExists(full.to_string()));
        }

        let mut schema = SchemaMetadata::default();
        for spec in specs {
            upsert_column(&mut schema, parse_column_spec(spec)?);
        }
        self.save_schema(full, &schema)?;
        tracing::debug!(table = full, columns = schema.columns.len(), "table created");
        Ok(())
    }

    /// Whether a table's schema record exists.
    pub fn table_exists(&self, full: &str) -> TableResult<bool> {
        Ok(self
            .store
            .hash_get(&keys::schema_key(full), META_FIELD)?
            .is_some())
    }

    /// The ordered column list: (name, type, indexed) per column.
    pub fn view_schema(&self, full: &str) -> TableResult<Vec<ColumnMeta>> {
        Ok(self.load_schema(full)?.columns)
    }

    /// Append a column (`name:type[:mode]`). An existing column of the
    /// same name is updated in place.
    pub fn alter_add_column(&self, full: &str, spec: &str) -> TableResult<()> {
        let mut schema = self.load_schema(full)?;
        let column = parse_column_spec(spec)?;
        let build = column.indexed;
        let name = column.name.clone();
        upsert_column(&mut schema, column);
        self.save_schema(full, &schema)?;
        // A column added as indexed covers rows inserted from now on; for
        // pre-existing rows the column has no values yet, so there is
        // nothing to backfill beyond an empty pass.
        if build {
            self.build_index(full, &name)?;
        }
        Ok(())
    }

    /// Promote a column to indexed and backfill the index from every live
    /// row.
    pub fn alter_add_index(&self, full: &str, column: &str) -> TableResult<()> {
        let mut schema = self.load_schema(full)?;
        let meta = schema
            .columns
            .iter_mut()
            .find(|c| c.name == column)
            .ok_or_else(|| TableError::ColumnNotFound {
                table: full.to_string(),
                column: column.to_string(),
            })?;
        meta.indexed = true;
        self.save_schema(full, &schema)?;
        self.build_index(full, column)
    }

    /// Demote a column from indexed and erase its value-sets.
    ///
    /// The indexed flag is cleared in one atomic write; the value-set
    /// erase that follows is a separate multi-step pass. In the window
    /// between the two, concurrent equality queries on this column observe
    /// "not indexed" and fail fast with `NonIndexedEquality` instead of
    /// reading half-deleted sets.
    pub fn alter_drop_index(&self, full: &str, column: &str) -> TableResult<()> {
        let mut schema = self.load_schema(full)?;
        if let Some(meta) = schema.columns.iter_mut().find(|c| c.name == column) {
            meta.indexed = false;
            self.save_schema(full, &schema)?;
        }
        tracing::warn!(
            table = full,
            column,
            "dropping index; equality queries on this column now fail fast"
        );
        self.drop_index_entries(full, column)
    }

    // ════════════════════════════════════════════
    // Schema record I/O and read helpers
    // ════════════════════════════════════════════

    /// Load a table's schema record, or `TableNotFound`.
    pub(crate) fn load_schema(&self, full: &str) -> TableResult<SchemaMetadata> {
        let json = self
            .store
            .hash_get(&keys::schema_key(full), META_FIELD)?
            .ok_or_else(|| TableError::TableNotFound(full.to_string()))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Persist a table's schema record in one atomic hash write.
    pub(crate) fn save_schema(&self, full: &str, schema: &SchemaMetadata) -> TableResult<()> {
        let json = serde_json::to_string(schema)?;
        self.store
            .hash_set(&keys::schema_key(full), META_FIELD, &json)
    }

    /// Erase a table's schema record.
    pub(crate) fn erase_schema(&self, full: &str) -> TableResult<()> {
        self.store.delete_key(&keys::schema_key(full))?;
        Ok(())
    }
}

/// Insert a column, or replace the definition of an existing one in place.
fn upsert_column(schema: &mut SchemaMetadata, column: ColumnMeta) {
    match schema.columns.iter_mut().find(|c| c.name == column.name) {
        Some(existing) => *existing = column,
        None => schema.columns.push(column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::storage::MemoryStore;

    fn engine() -> TableEngine<MemoryStore> {
        TableEngine::new(MemoryStore::new(), EngineConfig::default())
    }

    fn specs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(split_full_name("shop.users").unwrap(), ("shop", "users"));
        assert!(split_full_name("noseparator").is_err());
        assert!(split_full_name(".users").is_err());
        assert!(split_full_name("shop.").is_err());
    }

    #[test]
    fn test_split_full_name_length_limit() {
        let long = "x".repeat(65);
        assert!(matches!(
            split_full_name(&format!("{long}.users")),
            Err(TableError::NameTooLong { kind: "namespace" })
        ));
        assert!(matches!(
            split_full_name(&format!("shop.{long}")),
            Err(TableError::NameTooLong { kind: "table" })
        ));
        let max = "x".repeat(64);
        assert!(split_full_name(&format!("{max}.{max}")).is_ok());
    }

    #[test]
    fn test_parse_column_spec() {
        let c = parse_column_spec("id:integer:hash").unwrap();
        assert_eq!(c.name, "id");
        assert_eq!(c.column_type, ColumnType::Integer);
        assert!(c.indexed);

        let c = parse_column_spec("age:integer").unwrap();
        assert!(!c.indexed);

        let c = parse_column_spec("created:date:btree").unwrap();
        assert!(c.indexed); // btree degrades to hash behavior

        assert!(parse_column_spec("noseparator").is_err());
        assert!(parse_column_spec(":integer").is_err());
        assert!(parse_column_spec("id:blob").is_err());
        assert!(parse_column_spec("id:integer:bitmap").is_err());
    }

    #[test]
    fn test_create_namespace_twice() {
        let e = engine();
        e.create_namespace("shop").unwrap();
        assert!(matches!(
            e.create_namespace("shop"),
            Err(TableError::NamespaceAlreadyExists(_))
        ));
    }

    #[test]
    fn test_create_table_requires_namespace() {
        let e = engine();
        assert!(matches!(
            e.create_table("shop.users", &specs(&["id:integer"])),
            Err(TableError::NamespaceMissing(_))
        ));
    }

    #[test]
    fn test_create_table_twice() {
        let e = engine();
        e.create_namespace("shop").unwrap();
        e.create_table("shop.users", &specs(&["id:integer"])).unwrap();
        assert!(matches!(
            e.create_table("shop.users", &specs(&["id:integer"])),
            Err(TableError::TableAlreadyExists(_))
        ));
    }

    #[test]
    fn test_view_schema_ordered() {
        let e = engine();
        e.create_namespace("shop").unwrap();
        e.create_table(
            "shop.users",
            &specs(&["id:integer:hash", "name:string", "age:integer:none"]),
        )
        .unwrap();

        let cols = e.view_schema("shop.users").unwrap();
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].name, "id");
        assert!(cols[0].indexed);
        assert_eq!(cols[1].name, "name");
        assert_eq!(cols[2].name, "age");
        assert!(!cols[2].indexed);
    }

    #[test]
    fn test_alter_add_column_appends() {
        let e = engine();
        e.create_namespace("shop").unwrap();
        e.create_table("shop.users", &specs(&["id:integer:hash"])).unwrap();
        e.alter_add_column("shop.users", "email:string").unwrap();

        let cols = e.view_schema("shop.users").unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[1].name, "email");
    }

    #[test]
    fn test_alter_add_column_existing_updates_in_place() {
        let e = engine();
        e.create_namespace("shop").unwrap();
        e.create_table("shop.users", &specs(&["id:integer:hash", "age:integer"]))
            .unwrap();
        e.alter_add_column("shop.users", "age:float").unwrap();

        let cols = e.view_schema("shop.users").unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[1].name, "age");
        assert_eq!(cols[1].column_type, ColumnType::Float);
    }

    #[test]
    fn test_alter_add_index_unknown_column() {
        let e = engine();
        e.create_namespace("shop").unwrap();
        e.create_table("shop.users", &specs(&["id:integer"])).unwrap();
        assert!(matches!(
            e.alter_add_index("shop.users", "nope"),
            Err(TableError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_ddl_on_missing_table() {
        let e = engine();
        assert!(matches!(
            e.view_schema("shop.users"),
            Err(TableError::TableNotFound(_))
        ));
        assert!(matches!(
            e.alter_add_column("shop.users", "a:string"),
            Err(TableError::TableNotFound(_))
        ));
    }
}
