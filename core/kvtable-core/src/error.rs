//! Error types for the kvtable engine.
//!
//! All public APIs return `TableResult<T>` — no panics in library code.

use thiserror::Error;

/// Unified error type for all table operations.
#[derive(Debug, Error)]
pub enum TableError {
    /// Backend storage error (I/O, corruption, encoding)
    #[error("storage error: {0}")]
    Storage(String),

    /// sled embedded database error
    #[error("sled error: {source}")]
    Sled {
        #[from]
        source: sled::Error,
    },

    /// Schema metadata serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Namespace does not exist
    #[error("namespace '{0}' does not exist")]
    NamespaceMissing(String),

    /// Namespace already exists (on create)
    #[error("namespace '{0}' already exists")]
    NamespaceAlreadyExists(String),

    /// Requested table does not exist
    #[error("table schema '{0}' does not exist")]
    TableNotFound(String),

    /// Table already exists (on create)
    #[error("table schema '{0}' already exists")]
    TableAlreadyExists(String),

    /// Column not declared in the table schema
    #[error("column '{column}' does not exist in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Table name is not of the form namespace.table
    #[error("table name '{0}' must be namespace.table")]
    BadTableName(String),

    /// Namespace or table segment exceeds the 64-character limit
    #[error("incorrect {kind} name, it exceeds the limit of 64 characters")]
    NameTooLong { kind: &'static str },

    /// Column specification could not be parsed as name:type[:indexMode]
    #[error("bad column spec '{0}': format is <col:type> or <col:type:index>")]
    BadColumnSpec(String),

    /// Unknown column type keyword
    #[error("unknown column type '{0}': must be string, integer, float or date")]
    BadColumnType(String),

    /// Unknown index mode keyword
    #[error("bad index mode '{0}': must be 'hash', 'btree', 'none' (or deprecated 'true'/'false')")]
    BadIndexMode(String),

    /// Condition token has no operator, or the operator sits at an end
    #[error("malformed condition '{0}': expected <col><op><value>")]
    MalformedCondition(String),

    /// Field assignment token is not <col>=<value>
    #[error("bad assignment '{0}': each field must be <col>=<value>")]
    BadAssignment(String),

    /// AND/OR combinator with nothing following it
    #[error("dangling operator: combinator must be followed by a condition")]
    DanglingOperator,

    /// Value fails validation for the declared column type
    #[error("value '{value}' is not a valid {expected} for column '{column}'")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        value: String,
    },

    /// Equality requested on a non-indexed column (deliberately rejected)
    #[error("equality search cannot be done on non-indexed column '{0}'")]
    NonIndexedEquality(String),

    /// A non-indexed filter pass inspected more rows than allowed
    #[error(
        "query scan limit exceeded (max {limit} rows); use indexed columns or add more specific conditions"
    )]
    ScanLimitExceeded { limit: u64 },

    /// Destructive drop attempted without explicit confirmation
    #[error("this operation is irreversible, use FORCE to remove the table")]
    DropNotConfirmed,

    /// Destructive drop attempted with a wrong confirmation token
    #[error("invalid parameter '{0}': use FORCE to confirm table removal")]
    BadForceToken(String),

    /// Command token vector does not match any known command shape
    #[error("bad command: {0}")]
    BadCommand(String),
}

/// Result type alias for all table operations.
pub type TableResult<T> = Result<T, TableError>;

impl From<serde_json::Error> for TableError {
    fn from(err: serde_json::Error) -> Self {
        TableError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_storage() {
        let err = TableError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn error_display_table_not_found() {
        let err = TableError::TableNotFound("shop.users".to_string());
        assert_eq!(err.to_string(), "table schema 'shop.users' does not exist");
    }

    #[test]
    fn error_display_type_mismatch() {
        let err = TableError::TypeMismatch {
            column: "age".to_string(),
            expected: "integer",
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "value 'abc' is not a valid integer for column 'age'"
        );
    }

    #[test]
    fn error_display_scan_limit() {
        let err = TableError::ScanLimitExceeded { limit: 100_000 };
        assert!(err.to_string().contains("100000"));
        assert!(err.to_string().contains("indexed columns"));
    }

    #[test]
    fn error_display_non_indexed_equality() {
        let err = TableError::NonIndexedEquality("age".to_string());
        assert!(err.to_string().contains("non-indexed column 'age'"));
    }

    #[test]
    fn table_result_err() {
        let result: TableResult<i32> = Err(TableError::DropNotConfirmed);
        assert!(result.is_err());
    }
}
