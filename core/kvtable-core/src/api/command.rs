//! Token-vector command parser and dispatcher.
//!
//! Commands form a closed enum; adding a command means adding a variant
//! and the compiler walks every `match` that must handle it. Command words
//! and the WHERE/SET/FORCE keywords are case-insensitive; table names,
//! column specs, assignments and condition values are passed through
//! verbatim.

use crate::engine::TableEngine;
use crate::engine::types::{ColumnMeta, Row};
use crate::error::{TableError, TableResult};
use crate::storage::KvStore;

/// Static usage text returned by `HELP`.
pub const HELP_TEXT: &[&str] = &[
    "NAMESPACE.CREATE <namespace>",
    "SCHEMA.CREATE <namespace.table> <col:type[:index]> [<col:type[:index]> ...]",
    "SCHEMA.VIEW <namespace.table>",
    "SCHEMA.ALTER <namespace.table> ADD COLUMN <col:type[:index]>",
    "SCHEMA.ALTER <namespace.table> ADD INDEX <col>",
    "SCHEMA.ALTER <namespace.table> DROP INDEX <col>",
    "INSERT <namespace.table> <col=value> [<col=value> ...]",
    "SELECT <namespace.table> [WHERE <col><op><value> [AND|OR ...]]",
    "UPDATE <namespace.table> [WHERE ...] SET <col=value> [<col=value> ...]",
    "DELETE <namespace.table> [WHERE ...]",
    "DROP <namespace.table> FORCE",
    "HELP",
    "types: string | integer | float | date; index: hash | btree | none",
    "operators: = > < >= <= (equality requires an indexed column)",
];

/// A schema-altering sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterAction {
    /// `ADD COLUMN <col:type[:index]>`
    AddColumn(String),
    /// `ADD INDEX <col>`
    AddIndex(String),
    /// `DROP INDEX <col>`
    DropIndex(String),
}

/// One fully parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NamespaceCreate {
        name: String,
    },
    SchemaCreate {
        table: String,
        columns: Vec<String>,
    },
    SchemaView {
        table: String,
    },
    SchemaAlter {
        table: String,
        action: AlterAction,
    },
    Insert {
        table: String,
        assignments: Vec<String>,
    },
    Select {
        table: String,
        conditions: Vec<String>,
    },
    Update {
        table: String,
        conditions: Vec<String>,
        assignments: Vec<String>,
    },
    Delete {
        table: String,
        conditions: Vec<String>,
    },
    Drop {
        table: String,
    },
    Help,
}

/// Typed result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Operation completed with nothing to report.
    Ok,
    /// Row id allocated by an insert.
    RowId(u64),
    /// Rows matched by a select.
    Rows(Vec<Row>),
    /// Rows affected by an update or delete.
    Count(u64),
    /// Ordered column list of a schema view.
    Schema(Vec<ColumnMeta>),
    /// Usage lines.
    Help(&'static [&'static str]),
}

fn keyword(token: &str, word: &str) -> bool {
    token.eq_ignore_ascii_case(word)
}

fn bad(msg: impl Into<String>) -> TableError {
    TableError::BadCommand(msg.into())
}

/// Parse a token vector into a [`Command`].
pub fn parse(tokens: &[String]) -> TableResult<Command> {
    let (word, rest) = tokens
        .split_first()
        .ok_or_else(|| bad("empty command"))?;

    if keyword(word, "NAMESPACE.CREATE") {
        match rest {
            [name] => Ok(Command::NamespaceCreate { name: name.clone() }),
            _ => Err(bad("NAMESPACE.CREATE takes exactly one namespace name")),
        }
    } else if keyword(word, "SCHEMA.CREATE") {
        let (table, columns) = rest
            .split_first()
            .ok_or_else(|| bad("SCHEMA.CREATE requires a table name"))?;
        if columns.is_empty() {
            return Err(bad("SCHEMA.CREATE requires at least one column spec"));
        }
        Ok(Command::SchemaCreate {
            table: table.clone(),
            columns: columns.to_vec(),
        })
    } else if keyword(word, "SCHEMA.VIEW") {
        match rest {
            [table] => Ok(Command::SchemaView {
                table: table.clone(),
            }),
            _ => Err(bad("SCHEMA.VIEW takes exactly one table name")),
        }
    } else if keyword(word, "SCHEMA.ALTER") {
        parse_alter(rest)
    } else if keyword(word, "INSERT") {
        let (table, assignments) = rest
            .split_first()
            .ok_or_else(|| bad("INSERT requires a table name"))?;
        if assignments.is_empty() {
            return Err(bad("INSERT requires at least one col=value assignment"));
        }
        Ok(Command::Insert {
            table: table.clone(),
            assignments: assignments.to_vec(),
        })
    } else if keyword(word, "SELECT") {
        let (table, conditions) = parse_table_where(rest, "SELECT")?;
        Ok(Command::Select { table, conditions })
    } else if keyword(word, "UPDATE") {
        parse_update(rest)
    } else if keyword(word, "DELETE") {
        let (table, conditions) = parse_table_where(rest, "DELETE")?;
        Ok(Command::Delete { table, conditions })
    } else if keyword(word, "DROP") {
        parse_drop(rest)
    } else if keyword(word, "HELP") {
        if rest.is_empty() {
            Ok(Command::Help)
        } else {
            Err(bad("HELP takes no arguments"))
        }
    } else {
        Err(bad(format!("unknown command '{word}'")))
    }
}

/// `<table> ADD COLUMN <spec> | ADD INDEX <col> | DROP INDEX <col>`
fn parse_alter(rest: &[String]) -> TableResult<Command> {
    match rest {
        [table, verb, noun, arg] => {
            let action = if keyword(verb, "ADD") && keyword(noun, "COLUMN") {
                AlterAction::AddColumn(arg.clone())
            } else if keyword(verb, "ADD") && keyword(noun, "INDEX") {
                AlterAction::AddIndex(arg.clone())
            } else if keyword(verb, "DROP") && keyword(noun, "INDEX") {
                AlterAction::DropIndex(arg.clone())
            } else {
                return Err(bad(format!("unknown alter action '{verb} {noun}'")));
            };
            Ok(Command::SchemaAlter {
                table: table.clone(),
                action,
            })
        }
        _ => Err(bad(
            "SCHEMA.ALTER requires <table> ADD COLUMN <spec> | ADD INDEX <col> | DROP INDEX <col>",
        )),
    }
}

/// `<table> [WHERE <cond> ...]` for SELECT and DELETE.
fn parse_table_where(rest: &[String], cmd: &str) -> TableResult<(String, Vec<String>)> {
    let (table, tail) = rest
        .split_first()
        .ok_or_else(|| bad(format!("{cmd} requires a table name")))?;
    match tail.split_first() {
        None => Ok((table.clone(), Vec::new())),
        Some((w, conditions)) if keyword(w, "WHERE") => {
            if conditions.is_empty() {
                return Err(bad("WHERE requires at least one condition"));
            }
            Ok((table.clone(), conditions.to_vec()))
        }
        Some((w, _)) => Err(bad(format!("expected WHERE, got '{w}'"))),
    }
}

/// `<table> [WHERE <cond> ...] SET <col=value> ...`
fn parse_update(rest: &[String]) -> TableResult<Command> {
    let (table, tail) = rest
        .split_first()
        .ok_or_else(|| bad("UPDATE requires a table name"))?;
    let set_pos = tail
        .iter()
        .position(|t| keyword(t, "SET"))
        .ok_or_else(|| bad("UPDATE requires a SET clause"))?;
    let (before_set, after) = tail.split_at(set_pos);
    let assignments = &after[1..];
    if assignments.is_empty() {
        return Err(bad("SET requires at least one col=value assignment"));
    }

    let conditions = match before_set.split_first() {
        None => Vec::new(),
        Some((w, conditions)) if keyword(w, "WHERE") => {
            if conditions.is_empty() {
                return Err(bad("WHERE requires at least one condition"));
            }
            conditions.to_vec()
        }
        Some((w, _)) => return Err(bad(format!("expected WHERE, got '{w}'"))),
    };

    Ok(Command::Update {
        table: table.clone(),
        conditions,
        assignments: assignments.to_vec(),
    })
}

/// `<table> FORCE` — the confirmation token is mandatory and checked here
/// so a refused drop never reaches the engine.
fn parse_drop(rest: &[String]) -> TableResult<Command> {
    match rest {
        [_] => Err(TableError::DropNotConfirmed),
        [table, token] if keyword(token, "FORCE") => Ok(Command::Drop {
            table: table.clone(),
        }),
        [_, token] => Err(TableError::BadForceToken(token.clone())),
        _ => Err(bad("DROP requires <table> FORCE")),
    }
}

/// Run a parsed command against an engine.
pub fn dispatch<S: KvStore>(engine: &TableEngine<S>, command: Command) -> TableResult<Reply> {
    match command {
        Command::NamespaceCreate { name } => {
            engine.create_namespace(&name)?;
            Ok(Reply::Ok)
        }
        Command::SchemaCreate { table, columns } => {
            engine.create_table(&table, &columns)?;
            Ok(Reply::Ok)
        }
        Command::SchemaView { table } => Ok(Reply::Schema(engine.view_schema(&table)?)),
        Command::SchemaAlter { table, action } => {
            match action {
                AlterAction::AddColumn(spec) => engine.alter_add_column(&table, &spec)?,
                AlterAction::AddIndex(column) => engine.alter_add_index(&table, &column)?,
                AlterAction::DropIndex(column) => engine.alter_drop_index(&table, &column)?,
            }
            Ok(Reply::Ok)
        }
        Command::Insert { table, assignments } => {
            Ok(Reply::RowId(engine.insert(&table, &assignments)?))
        }
        Command::Select { table, conditions } => {
            Ok(Reply::Rows(engine.select(&table, &conditions)?))
        }
        Command::Update {
            table,
            conditions,
            assignments,
        } => Ok(Reply::Count(engine.update(&table, &conditions, &assignments)?)),
        Command::Delete { table, conditions } => {
            Ok(Reply::Count(engine.delete(&table, &conditions)?))
        }
        Command::Drop { table } => {
            engine.drop_table(&table, true)?;
            Ok(Reply::Ok)
        }
        Command::Help => Ok(Reply::Help(HELP_TEXT)),
    }
}
