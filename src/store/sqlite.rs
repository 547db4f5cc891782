use super::traits::{joined, parse_counter, SessionField, SessionStore, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// SQLite-backed session store.
///
/// One row per `(session_id, field)` plus an optional expiry row per
/// session. Calls run on the blocking pool; the connection mutex makes
/// every read-modify-write a single critical section, and each one runs
/// inside a transaction. Every write first deletes all expired sessions.
pub struct SqliteSessionStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl SqliteSessionStore {
    pub fn open(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn init_schema(conn: &Connection) -> anyhow::Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session_fields (
                session_id  TEXT NOT NULL,
                field       TEXT NOT NULL,
                value       TEXT NOT NULL,
                PRIMARY KEY (session_id, field)
            );
            CREATE TABLE IF NOT EXISTS session_expiry (
                session_id  TEXT PRIMARY KEY,
                expires_at  INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_session_expiry_expires_at
                ON session_expiry(expires_at);",
        )?;
        Ok(())
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            f(&mut conn)
        })
        .await?
    }

    /// Delete every expired session; returns how many were removed.
    pub async fn purge_expired(&self) -> Result<usize, StoreError> {
        self.run(|conn| {
            let tx = conn.transaction()?;
            let removed = purge_expired(&tx)?;
            tx.commit()?;
            Ok(removed)
        })
        .await
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Drop every session whose expiry has passed.
fn purge_expired(conn: &Connection) -> rusqlite::Result<usize> {
    let now = now_unix();
    conn.execute(
        "DELETE FROM session_fields WHERE session_id IN
            (SELECT session_id FROM session_expiry WHERE expires_at <= ?1)",
        params![now],
    )?;
    conn.execute(
        "DELETE FROM session_expiry WHERE expires_at <= ?1",
        params![now],
    )
}

/// Drop the session if its expiry has passed.
fn purge_if_expired(conn: &Connection, session_id: &str) -> rusqlite::Result<()> {
    let expired: bool = conn
        .query_row(
            "SELECT expires_at <= ?2 FROM session_expiry WHERE session_id = ?1",
            params![session_id, now_unix()],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(false);
    if expired {
        delete_session(conn, session_id)?;
    }
    Ok(())
}

fn delete_session(conn: &Connection, session_id: &str) -> rusqlite::Result<usize> {
    let removed = conn.execute(
        "DELETE FROM session_fields WHERE session_id = ?1",
        params![session_id],
    )?;
    conn.execute(
        "DELETE FROM session_expiry WHERE session_id = ?1",
        params![session_id],
    )?;
    Ok(removed)
}

fn read_field(
    conn: &Connection,
    session_id: &str,
    field: SessionField,
) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM session_fields WHERE session_id = ?1 AND field = ?2",
        params![session_id, field.as_str()],
        |row| row.get(0),
    )
    .optional()
}

fn write_field(
    conn: &Connection,
    session_id: &str,
    field: SessionField,
    value: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO session_fields (session_id, field, value) VALUES (?1, ?2, ?3)
         ON CONFLICT(session_id, field) DO UPDATE SET value = excluded.value",
        params![session_id, field.as_str(), value],
    )?;
    Ok(())
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn set(
        &self,
        session_id: &str,
        field: SessionField,
        value: &str,
    ) -> Result<(), StoreError> {
        let (sid, value) = (session_id.to_string(), value.to_string());
        self.run(move |conn| {
            let tx = conn.transaction()?;
            purge_expired(&tx)?;
            write_field(&tx, &sid, field, &value)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn set_many(
        &self,
        session_id: &str,
        fields: &[(SessionField, &str)],
    ) -> Result<(), StoreError> {
        let sid = session_id.to_string();
        let owned: Vec<(SessionField, String)> = fields
            .iter()
            .map(|(field, value)| (*field, (*value).to_string()))
            .collect();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            purge_expired(&tx)?;
            for (field, value) in &owned {
                write_field(&tx, &sid, *field, value)?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn get(
        &self,
        session_id: &str,
        field: SessionField,
    ) -> Result<Option<String>, StoreError> {
        let sid = session_id.to_string();
        self.run(move |conn| {
            purge_if_expired(conn, &sid)?;
            Ok(read_field(conn, &sid, field)?)
        })
        .await
    }

    async fn get_all(&self, session_id: &str) -> Result<HashMap<String, String>, StoreError> {
        let sid = session_id.to_string();
        self.run(move |conn| {
            purge_if_expired(conn, &sid)?;
            let mut stmt =
                conn.prepare("SELECT field, value FROM session_fields WHERE session_id = ?1")?;
            let rows = stmt
                .query_map(params![sid], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<HashMap<_, _>, _>>()?;
            Ok(rows)
        })
        .await
    }

    async fn increment(
        &self,
        session_id: &str,
        field: SessionField,
        delta: i64,
    ) -> Result<i64, StoreError> {
        let sid = session_id.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            purge_expired(&tx)?;
            let current = read_field(&tx, &sid, field)?;
            let next = parse_counter(field, current.as_deref())? + delta;
            write_field(&tx, &sid, field, &next.to_string())?;
            tx.commit()?;
            Ok(next)
        })
        .await
    }

    async fn append(
        &self,
        session_id: &str,
        field: SessionField,
        token: &str,
    ) -> Result<(), StoreError> {
        let (sid, token) = (session_id.to_string(), token.to_string());
        self.run(move |conn| {
            let tx = conn.transaction()?;
            purge_expired(&tx)?;
            let current = read_field(&tx, &sid, field)?;
            write_field(&tx, &sid, field, &joined(current.as_deref(), &token))?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn expire(&self, session_id: &str, ttl: Duration) -> Result<(), StoreError> {
        let sid = session_id.to_string();
        let expires_at = now_unix() + i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX / 2);
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO session_expiry (session_id, expires_at) VALUES (?1, ?2)
                 ON CONFLICT(session_id) DO UPDATE SET expires_at = excluded.expires_at",
                params![sid, expires_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        let sid = session_id.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let removed = delete_session(&tx, &sid)?;
            tx.commit()?;
            Ok(removed > 0)
        })
        .await
    }

    async fn health_check(&self) -> bool {
        self.run(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
        .is_ok()
    }
}
