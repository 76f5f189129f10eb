//! Command surface: a closed command vocabulary over the engine.
//!
//! Frontends (a server, a CLI, a test harness) tokenize their input and
//! hand the token vector to [`command::parse`]; [`command::dispatch`] runs
//! the parsed command against a [`TableEngine`](crate::engine::TableEngine)
//! and returns a typed [`command::Reply`].

pub mod command;

pub use command::{AlterAction, Command, Reply, dispatch, parse};
