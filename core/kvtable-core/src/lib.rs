//! # kvtable-core
//!
//! A SQL-like table engine layered over a generic key-value backend.
//!
//! The backend ([`storage::KvStore`]) offers only four primitives — field
//! hashes, member sets, atomic counters and key scans — and the engine
//! builds namespaces, typed schemas, rows, per-column equality indexes and
//! a restricted WHERE-clause query language on top of them.
//!
//! ## Architecture
//!
//! - [`storage`] — the `KvStore` trait, the key layout, an in-memory
//!   implementation ([`storage::MemoryStore`]) and a durable sled-backed
//!   one ([`storage::SledStore`])
//! - [`engine`] — [`engine::TableEngine`]: schema DDL, the mutation
//!   pipeline with synchronous index maintenance, and the query planner
//!   with its scan governor
//! - [`api`] — a closed command vocabulary for frontends
//! - [`config`] / [`error`] / [`logging`] — engine configuration, the
//!   error taxonomy, optional tracing-subscriber setup
//!
//! ## Quick start
//!
//! ```rust
//! use kvtable_core::{EngineConfig, MemoryStore, TableEngine};
//!
//! # fn main() -> kvtable_core::TableResult<()> {
//! let engine = TableEngine::new(MemoryStore::new(), EngineConfig::default());
//!
//! engine.create_namespace("shop")?;
//! engine.create_table(
//!     "shop.users",
//!     &["id:integer:hash".to_string(), "age:integer:none".to_string()],
//! )?;
//! engine.insert("shop.users", &["id=1".to_string(), "age=30".to_string()])?;
//!
//! let rows = engine.select("shop.users", &["id=1".to_string()])?;
//! assert_eq!(rows[0].fields["age"], "30");
//! # Ok(())
//! # }
//! ```
//!
//! ## Consistency model
//!
//! Each backend primitive is atomic on its own; a logical operation that
//! composes several of them is not. The one deliberately visible window is
//! index removal: the indexed flag is cleared atomically first, so
//! concurrent equality queries fail fast instead of reading half-deleted
//! index sets.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod storage;

pub use api::{Command, Reply};
pub use config::EngineConfig;
pub use engine::{
    ColumnMeta, ColumnType, Combinator, CompareOp, Condition, ConditionStep, IndexMode, Row,
    SchemaMetadata, TableEngine,
};
pub use error::{TableError, TableResult};
pub use storage::{KvStore, MemoryStore, SledStore};
