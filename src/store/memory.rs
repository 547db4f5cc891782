use super::traits::{joined, parse_counter, SessionField, SessionStore, StoreError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct SessionEntry {
    fields: HashMap<SessionField, String>,
    expires_at: Option<Instant>,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process session store.
///
/// Sessions live in a single map behind a `RwLock`. Reads skip expired
/// sessions and every write evicts all of them, so abandoned sessions do not
/// accumulate. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired session; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        evict_expired(&mut sessions, Instant::now())
    }

    fn with_entry<T>(&self, session_id: &str, f: impl FnOnce(&mut SessionEntry) -> T) -> T {
        let mut sessions = self.sessions.write();
        evict_expired(&mut sessions, Instant::now());
        f(sessions.entry(session_id.to_string()).or_default())
    }

    fn read_entry<T>(&self, session_id: &str, f: impl FnOnce(Option<&SessionEntry>) -> T) -> T {
        let sessions = self.sessions.read();
        let now = Instant::now();
        f(sessions.get(session_id).filter(|e| !e.is_expired(now)))
    }
}

fn evict_expired(sessions: &mut HashMap<String, SessionEntry>, now: Instant) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_expired(now));
    before - sessions.len()
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn set(
        &self,
        session_id: &str,
        field: SessionField,
        value: &str,
    ) -> Result<(), StoreError> {
        self.with_entry(session_id, |entry| {
            entry.fields.insert(field, value.to_string());
        });
        Ok(())
    }

    async fn set_many(
        &self,
        session_id: &str,
        fields: &[(SessionField, &str)],
    ) -> Result<(), StoreError> {
        self.with_entry(session_id, |entry| {
            for (field, value) in fields {
                entry.fields.insert(*field, (*value).to_string());
            }
        });
        Ok(())
    }

    async fn get(
        &self,
        session_id: &str,
        field: SessionField,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.read_entry(session_id, |entry| {
            entry.and_then(|e| e.fields.get(&field).cloned())
        }))
    }

    async fn get_all(&self, session_id: &str) -> Result<HashMap<String, String>, StoreError> {
        Ok(self.read_entry(session_id, |entry| {
            entry
                .map(|e| {
                    e.fields
                        .iter()
                        .map(|(k, v)| (k.as_str().to_string(), v.clone()))
                        .collect()
                })
                .unwrap_or_default()
        }))
    }

    async fn increment(
        &self,
        session_id: &str,
        field: SessionField,
        delta: i64,
    ) -> Result<i64, StoreError> {
        self.with_entry(session_id, |entry| {
            let next = parse_counter(field, entry.fields.get(&field).map(String::as_str))? + delta;
            entry.fields.insert(field, next.to_string());
            Ok(next)
        })
    }

    async fn append(
        &self,
        session_id: &str,
        field: SessionField,
        token: &str,
    ) -> Result<(), StoreError> {
        self.with_entry(session_id, |entry| {
            let next = joined(entry.fields.get(&field).map(String::as_str), token);
            entry.fields.insert(field, next);
        });
        Ok(())
    }

    async fn expire(&self, session_id: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get_mut(session_id) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.write().remove(session_id).is_some())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
