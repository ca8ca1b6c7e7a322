//! UI preference store (key-value) backed by the local database

use chrono::Utc;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// Key under which the light/dark preference is persisted
pub const THEME_KEY: &str = "theme";

/// Data access object for persisted UI preferences
#[derive(Clone)]
pub struct PreferenceStore {
    conn: Arc<Mutex<Connection>>,
}

impl PreferenceStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Set a value (insert or update)
    pub fn set(&self, key: &str, value: &str) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO app_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> SqliteResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM app_state WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;

        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    /// Delete a key
    pub fn delete(&self, key: &str) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;
    use tempfile::tempdir;

    fn setup_db() -> (tempfile::TempDir, Database, PreferenceStore) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        let prefs = PreferenceStore::new(db.connection());
        (dir, db, prefs)
    }

    #[test]
    fn test_theme_set_and_get() {
        let (_dir, _db, prefs) = setup_db();

        prefs.set(THEME_KEY, "dark").unwrap();
        assert_eq!(prefs.get(THEME_KEY).unwrap(), Some("dark".to_string()));

        prefs.set(THEME_KEY, "light").unwrap();
        assert_eq!(prefs.get(THEME_KEY).unwrap(), Some("light".to_string()));
    }

    #[test]
    fn test_get_nonexistent() {
        let (_dir, _db, prefs) = setup_db();
        assert_eq!(prefs.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let (_dir, _db, prefs) = setup_db();

        prefs.set("to_delete", "value").unwrap();
        prefs.delete("to_delete").unwrap();

        assert_eq!(prefs.get("to_delete").unwrap(), None);
    }
}
