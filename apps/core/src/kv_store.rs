use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension};

use crate::config::Config;
use crate::history::LaunchHistory;

pub const LAUNCH_COUNTS_KEY: &str = "launch_counts";
pub const RECENT_ITEMS_KEY: &str = "recent_items";

#[derive(Debug)]
pub enum StoreError {
    Sql(rusqlite::Error),
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sql(error) => write!(f, "sqlite error: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Encode(error) => write!(f, "encode error: {error}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

pub fn open_file(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Opens the configured history database. A file SQLite cannot use is moved
/// aside and replaced with a fresh one; if that also fails, history lives in
/// memory for this session.
pub fn open_from_config(cfg: &Config) -> Result<Connection, StoreError> {
    let path = &cfg.history_db_path;
    let error = match open_file(path) {
        Ok(conn) => return Ok(conn),
        Err(error) => error,
    };
    crate::logging::warn(&format!(
        "[history] unusable database {}: {error}",
        path.display()
    ));

    if path.is_file() {
        let aside = quarantine_path(path);
        match std::fs::rename(path, &aside) {
            Ok(()) => crate::logging::warn(&format!(
                "[history] moved unreadable database to {}",
                aside.display()
            )),
            Err(error) => crate::logging::warn(&format!(
                "[history] could not move unreadable database: {error}"
            )),
        }
    }

    open_file(path).or_else(|error| {
        crate::logging::warn(&format!(
            "[history] falling back to in-memory history: {error}"
        ));
        open_memory()
    })
}

fn quarantine_path(path: &Path) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{stamp}"));
    path.with_file_name(name)
}

fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
        [],
    )?;
    Ok(())
}

fn get_raw(db: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let value = db
        .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    Ok(value)
}

fn set_raw(db: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    db.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Missing or undecodable values read as an empty map.
pub fn get_count_map(db: &Connection, key: &str) -> Result<HashMap<String, u64>, StoreError> {
    let Some(raw) = get_raw(db, key)? else {
        return Ok(HashMap::new());
    };
    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

pub fn set_count_map(
    db: &Connection,
    key: &str,
    value: &HashMap<String, u64>,
) -> Result<(), StoreError> {
    set_raw(db, key, &serde_json::to_string(value)?)
}

/// Missing or undecodable values read as an empty list.
pub fn get_string_list(db: &Connection, key: &str) -> Result<Vec<String>, StoreError> {
    let Some(raw) = get_raw(db, key)? else {
        return Ok(Vec::new());
    };
    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

pub fn set_string_list(db: &Connection, key: &str, value: &[String]) -> Result<(), StoreError> {
    set_raw(db, key, &serde_json::to_string(value)?)
}

/// Never fails: any read error yields an empty history.
pub fn load_history(db: &Connection, recent_capacity: usize) -> LaunchHistory {
    let counts = match get_count_map(db, LAUNCH_COUNTS_KEY) {
        Ok(counts) => counts,
        Err(error) => {
            crate::logging::warn(&format!("[history] launch counts unreadable: {error}"));
            HashMap::new()
        }
    };
    let recent = match get_string_list(db, RECENT_ITEMS_KEY) {
        Ok(recent) => recent,
        Err(error) => {
            crate::logging::warn(&format!("[history] recent list unreadable: {error}"));
            Vec::new()
        }
    };
    LaunchHistory::from_persisted(counts, recent, recent_capacity)
}

/// Writes counts and the recency list together or not at all.
pub fn save_history(db: &Connection, history: &LaunchHistory) -> Result<(), StoreError> {
    let tx = db.unchecked_transaction()?;
    set_count_map(&tx, LAUNCH_COUNTS_KEY, history.counts())?;
    set_string_list(&tx, RECENT_ITEMS_KEY, history.recent_ids())?;
    tx.commit()?;
    Ok(())
}
