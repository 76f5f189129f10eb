//! Engine types — column types, index modes, conditions, rows.

use crate::error::{TableError, TableResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a column. Governs write-time validation and query-time
/// comparison semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Unconstrained text; byte-lexicographic comparison.
    String,
    /// Optional sign, decimal digits; numeric comparison.
    Integer,
    /// Optional sign, digits, at most one dot; numeric comparison.
    Float,
    /// Fixed-format `YYYY-MM-DD`; lexicographic comparison (correct because
    /// the format is fixed-width and zero-padded).
    Date,
}

impl ColumnType {
    /// Parse a type keyword (case-insensitive).
    pub fn parse(s: &str) -> TableResult<Self> {
        if s.eq_ignore_ascii_case("string") {
            Ok(ColumnType::String)
        } else if s.eq_ignore_ascii_case("integer") {
            Ok(ColumnType::Integer)
        } else if s.eq_ignore_ascii_case("float") {
            Ok(ColumnType::Float)
        } else if s.eq_ignore_ascii_case("date") {
            Ok(ColumnType::Date)
        } else {
            Err(TableError::BadColumnType(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index mode keyword of a column spec.
///
/// `btree` is accepted for forward compatibility but behaves exactly like
/// `hash`: callers must not assume range-query acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    Hash,
    Btree,
    None,
}

impl IndexMode {
    /// Parse an index-mode keyword (case-insensitive), including the
    /// deprecated `true`/`false` aliases.
    pub fn parse(s: &str) -> TableResult<Self> {
        if s.eq_ignore_ascii_case("hash") || s.eq_ignore_ascii_case("true") {
            Ok(IndexMode::Hash)
        } else if s.eq_ignore_ascii_case("btree") {
            Ok(IndexMode::Btree)
        } else if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("false") {
            Ok(IndexMode::None)
        } else {
            Err(TableError::BadIndexMode(s.to_string()))
        }
    }

    /// Whether this mode maintains an inverted index.
    pub fn is_indexed(&self) -> bool {
        !matches!(self, IndexMode::None)
    }
}

/// One column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub indexed: bool,
}

/// The persisted schema record: the ordered column list of one table.
///
/// Stored as JSON in a single hash field of the schema key, so updating it
/// (including flipping an indexed flag) is one atomic backend write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub columns: Vec<ColumnMeta>,
}

impl SchemaMetadata {
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }
}

/// AND/OR combinator between two conditions. Evaluation is strictly
/// left-to-right; there is no precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// Parse a combinator keyword (case-insensitive); `None` for anything
    /// that is not AND/OR.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("AND") {
            Some(Combinator::And)
        } else if s.eq_ignore_ascii_case("OR") {
            Some(Combinator::Or)
        } else {
            None
        }
    }
}

/// One parsed condition: `column <op> value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    pub value: String,
}

/// One step of a WHERE clause: the condition plus the combinator linking it
/// to the preceding step (`None` for the first step).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionStep {
    pub combinator: Option<Combinator>,
    pub condition: Condition,
}

/// A materialized row: its id plus every stored column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u64,
    pub fields: BTreeMap<String, String>,
}
