//! Database module
//!
//! SQLite-backed key-value storage for the app state.

pub mod connection;
pub mod migrations;
pub mod state;

pub use connection::{Database, DbError, DbResult};
