use super::traits::{SessionField, SessionStore, StoreError, TOKEN_SEPARATOR};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

/// Server-side append so concurrent submissions for one session cannot
/// overwrite each other's tokens.
static APPEND_SCRIPT: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r"
local current = redis.call('HGET', KEYS[1], ARGV[1])
if current and current ~= '' then
    current = current .. ARGV[3] .. ARGV[2]
else
    current = ARGV[2]
end
redis.call('HSET', KEYS[1], ARGV[1], current)
return string.len(current)
",
    )
});

/// Redis-backed session store: one hash per session.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisSessionStore {
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key(&self, session_id: &str) -> String {
        session_key(&self.key_prefix, session_id)
    }
}

fn session_key(prefix: &str, session_id: &str) -> String {
    if prefix.is_empty() {
        session_id.to_string()
    } else {
        format!("{prefix}:{session_id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    fn name(&self) -> &str {
        "redis"
    }

    async fn set(
        &self,
        session_id: &str,
        field: SessionField,
        value: &str,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.hset(self.key(session_id), field.as_str(), value).await?;
        Ok(())
    }

    async fn set_many(
        &self,
        session_id: &str,
        fields: &[(SessionField, &str)],
    ) -> Result<(), StoreError> {
        if fields.is_empty() {
            return Ok(());
        }
        let items: Vec<(&str, &str)> = fields
            .iter()
            .map(|(field, value)| (field.as_str(), *value))
            .collect();
        let mut conn = self.conn.clone();
        let _: () = conn.hset_multiple(self.key(session_id), &items).await?;
        Ok(())
    }

    async fn get(
        &self,
        session_id: &str,
        field: SessionField,
    ) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(self.key(session_id), field.as_str()).await?;
        Ok(value)
    }

    async fn get_all(&self, session_id: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.conn.clone();
        let all: HashMap<String, String> = conn.hgetall(self.key(session_id)).await?;
        Ok(all)
    }

    async fn increment(
        &self,
        session_id: &str,
        field: SessionField,
        delta: i64,
    ) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let next: i64 = conn.hincr(self.key(session_id), field.as_str(), delta).await?;
        Ok(next)
    }

    async fn append(
        &self,
        session_id: &str,
        field: SessionField,
        token: &str,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _len: i64 = APPEND_SCRIPT
            .key(self.key(session_id))
            .arg(field.as_str())
            .arg(token)
            .arg(TOKEN_SEPARATOR.to_string())
            .invoke_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn expire(&self, session_id: &str, ttl: Duration) -> Result<(), StoreError> {
        let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let mut conn = self.conn.clone();
        let _: bool = conn.expire(self.key(session_id), secs).await?;
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(self.key(session_id)).await?;
        Ok(removed > 0)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }
}
