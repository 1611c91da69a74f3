use directories::ProjectDirs;
use rusqlite::{Connection, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::api::models::{CallRecord, ConversationRecord, UserRecord};
use crate::error::Error;

const KIND_USER: &str = "user";
const KIND_CONVERSATION: &str = "conversation";
const KIND_CALL: &str = "call";

fn db_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "example", "CommHub")?;
    Some(proj.data_dir().join("cache.sqlite"))
}

fn ensure_dir(path: &PathBuf) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn open_conn() -> Result<Connection, Error> {
    let path = db_path()
        .ok_or_else(|| Error::Config("no data dir for record cache".into()))?;
    ensure_dir(&path)?;
    Ok(Connection::open(path)?)
}

// Record ids are only unique per kind, hence the composite key. `position`
// preserves the backend's ordering across cache reads.
fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS records (
            kind TEXT NOT NULL,
            id TEXT NOT NULL,
            name TEXT NOT NULL,
            position INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            raw_json TEXT NOT NULL,
            PRIMARY KEY (kind, id)
        );
        "#,
    )?;
    Ok(())
}

/// Cache of backend-fetched records, so a cold or offline start can still
/// show the last known inbox.
pub fn init() -> Result<(), Error> {
    let conn = open_conn()?;
    init_schema(&conn)
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

fn upsert_kind<T: Serialize>(
    conn: &mut Connection,
    kind: &str,
    ids_names: impl Iterator<Item = (String, String)>,
    items: &[T],
) -> Result<(), Error> {
    let now = now_secs();
    let tx = conn.transaction()?;
    for (position, ((id, name), item)) in ids_names.zip(items).enumerate() {
        let raw = serde_json::to_string(item)?;
        tx.execute(
            r#"
            INSERT INTO records (kind, id, name, position, updated_at, raw_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(kind, id) DO UPDATE SET
                name=excluded.name,
                position=excluded.position,
                updated_at=excluded.updated_at,
                raw_json=excluded.raw_json
            "#,
            params![kind, id, name, position as i64, now, raw],
        )?;
    }
    tx.commit()?;
    Ok(())
}

fn get_kind<T: DeserializeOwned>(
    conn: &Connection,
    kind: &str,
    limit: Option<usize>,
) -> Result<Vec<T>, Error> {
    let mut stmt = conn.prepare(
        "SELECT raw_json FROM records WHERE kind = ?1 ORDER BY position ASC LIMIT ?2",
    )?;
    let lim = limit.unwrap_or(500) as i64;
    let rows = stmt.query_map(params![kind, lim], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for raw in rows {
        match serde_json::from_str::<T>(&raw?) {
            Ok(item) => out.push(item),
            // Rows written by an older schema just get skipped.
            Err(e) => log::debug!("skipping stale cache row: {e}"),
        }
    }
    Ok(out)
}

pub fn upsert_users(users: &[UserRecord]) -> Result<(), Error> {
    let mut conn = open_conn()?;
    init_schema(&conn)?;
    let ids = users.iter().map(|u| (u.id.clone(), u.name.clone()));
    upsert_kind(&mut conn, KIND_USER, ids, users)
}

pub fn upsert_conversations(convs: &[ConversationRecord]) -> Result<(), Error> {
    let mut conn = open_conn()?;
    init_schema(&conn)?;
    let ids = convs.iter().map(|c| (c.id.clone(), c.name.clone()));
    upsert_kind(&mut conn, KIND_CONVERSATION, ids, convs)
}

pub fn upsert_calls(calls: &[CallRecord]) -> Result<(), Error> {
    let mut conn = open_conn()?;
    init_schema(&conn)?;
    let ids = calls.iter().map(|c| (c.id.clone(), c.name.clone()));
    upsert_kind(&mut conn, KIND_CALL, ids, calls)
}

pub fn get_users(limit: Option<usize>) -> Result<Vec<UserRecord>, Error> {
    let conn = open_conn()?;
    init_schema(&conn)?;
    get_kind(&conn, KIND_USER, limit)
}

pub fn get_conversations(limit: Option<usize>) -> Result<Vec<ConversationRecord>, Error> {
    let conn = open_conn()?;
    init_schema(&conn)?;
    get_kind(&conn, KIND_CONVERSATION, limit)
}

pub fn get_calls(limit: Option<usize>) -> Result<Vec<CallRecord>, Error> {
    let conn = open_conn()?;
    init_schema(&conn)?;
    get_kind(&conn, KIND_CALL, limit)
}
