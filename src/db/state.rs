//! Persisted application state
//!
//! Each part of the app state lives under its own key as a JSON document.
//! Writes replace the whole document.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::connection::DbResult;

/// Day board cards
pub const DAY_KEY: &str = "day";
/// Food library
pub const LIBRARY_KEY: &str = "library";
/// Daily targets
pub const TARGETS_KEY: &str = "targets";
/// Cooking pot
pub const POT_KEY: &str = "pot";

/// Raw stored text for `key`
pub fn load_raw(conn: &Connection, key: &str) -> DbResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

/// Stored document for `key` as untyped JSON
pub fn load_value(conn: &Connection, key: &str) -> DbResult<Option<Value>> {
    match load_raw(conn, key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Stored document for `key` as `T`
pub fn load_state<T: DeserializeOwned>(conn: &Connection, key: &str) -> DbResult<Option<T>> {
    match load_raw(conn, key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Replace the document stored under `key`
pub fn save_state<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> DbResult<()> {
    let text = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, text],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::DailyTargets;
    use serde_json::json;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_missing_key_is_none() {
        let conn = conn();
        assert!(load_value(&conn, DAY_KEY).unwrap().is_none());
        assert!(load_state::<DailyTargets>(&conn, TARGETS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let conn = conn();
        save_state(&conn, POT_KEY, &json!({"lines": []})).unwrap();
        save_state(&conn, POT_KEY, &json!({"lines": [{"id": "a", "amount": 100}]})).unwrap();
        let v = load_value(&conn, POT_KEY).unwrap().unwrap();
        assert_eq!(v["lines"][0]["id"], "a");
    }

    #[test]
    fn test_typed_round_trip() {
        let conn = conn();
        save_state(&conn, TARGETS_KEY, &DailyTargets::default()).unwrap();
        let t: DailyTargets = load_state(&conn, TARGETS_KEY).unwrap().unwrap();
        assert_eq!(t, DailyTargets::default());
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let conn = conn();
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)",
            params![DAY_KEY, "{not json"],
        )
        .unwrap();
        assert!(load_value(&conn, DAY_KEY).is_err());
        save_state(&conn, DAY_KEY, &json!({"cards": []})).unwrap();
        assert_eq!(load_value(&conn, DAY_KEY).unwrap(), Some(json!({"cards": []})));
    }
}
