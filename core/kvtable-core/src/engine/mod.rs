//! Table engine module.
//!
//! [`TableEngine`] is the single entry point; its operations are split
//! across submodules by concern:
//!
//! - [`schema`] — namespaces, table schemas, index metadata (DDL)
//! - [`mutation`] — insert/update/delete/drop with synchronous index upkeep
//! - [`query`] — the WHERE planner/executor and the scan governor
//! - [`index`] — inverted-index maintenance primitives
//! - [`condition`] / [`validate`] — pure parsing and value semantics

pub mod condition;
pub mod index;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;
pub mod validate;

use crate::config::EngineConfig;
use crate::storage::KvStore;

pub use types::{
    ColumnMeta, ColumnType, Combinator, CompareOp, Condition, ConditionStep, IndexMode, Row,
    SchemaMetadata,
};

/// The table engine: schemas, rows, equality indexes and a restricted
/// WHERE-clause query language over a generic key-value backend.
///
/// The engine composes multiple backend primitives per logical operation
/// without cross-primitive transactions; any isolation between concurrent
/// table operations must come from the backend or the caller.
///
/// # Example
///
/// ```rust
/// use kvtable_core::config::EngineConfig;
/// use kvtable_core::engine::TableEngine;
/// use kvtable_core::storage::MemoryStore;
///
/// # fn main() -> kvtable_core::TableResult<()> {
/// let engine = TableEngine::new(MemoryStore::new(), EngineConfig::default());
/// engine.create_namespace("shop")?;
/// engine.create_table(
///     "shop.users",
///     &["id:integer:hash".to_string(), "age:integer:none".to_string()],
/// )?;
/// let id = engine.insert("shop.users", &["id=1".to_string(), "age=30".to_string()])?;
/// assert_eq!(id, 1);
/// # Ok(())
/// # }
/// ```
pub struct TableEngine<S: KvStore> {
    pub(crate) store: S,
    pub(crate) config: EngineConfig,
}

impl<S: KvStore> TableEngine<S> {
    /// Create an engine over the given backend with the given
    /// configuration.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The configured scan ceiling.
    pub fn max_scan_rows(&self) -> u64 {
        self.config.max_scan_rows
    }
}
