use super::traits::{SessionField, SessionStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Bounds every call on the wrapped store by a fixed deadline.
///
/// An elapsed deadline surfaces as [`StoreError::Timeout`]; the call is not
/// retried.
pub struct DeadlineStore {
    inner: Arc<dyn SessionStore>,
    deadline: Duration,
}

impl DeadlineStore {
    pub fn new(inner: Arc<dyn SessionStore>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.deadline, call)
            .await
            .map_err(|_| StoreError::Timeout(self.deadline))?
    }
}

#[async_trait]
impl SessionStore for DeadlineStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn set(
        &self,
        session_id: &str,
        field: SessionField,
        value: &str,
    ) -> Result<(), StoreError> {
        self.bounded(self.inner.set(session_id, field, value)).await
    }

    async fn set_many(
        &self,
        session_id: &str,
        fields: &[(SessionField, &str)],
    ) -> Result<(), StoreError> {
        self.bounded(self.inner.set_many(session_id, fields)).await
    }

    async fn get(
        &self,
        session_id: &str,
        field: SessionField,
    ) -> Result<Option<String>, StoreError> {
        self.bounded(self.inner.get(session_id, field)).await
    }

    async fn get_all(&self, session_id: &str) -> Result<HashMap<String, String>, StoreError> {
        self.bounded(self.inner.get_all(session_id)).await
    }

    async fn increment(
        &self,
        session_id: &str,
        field: SessionField,
        delta: i64,
    ) -> Result<i64, StoreError> {
        self.bounded(self.inner.increment(session_id, field, delta))
            .await
    }

    async fn append(
        &self,
        session_id: &str,
        field: SessionField,
        token: &str,
    ) -> Result<(), StoreError> {
        self.bounded(self.inner.append(session_id, field, token)).await
    }

    async fn expire(&self, session_id: &str, ttl: Duration) -> Result<(), StoreError> {
        self.bounded(self.inner.expire(session_id, ttl)).await
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        self.bounded(self.inner.delete(session_id)).await
    }

    async fn health_check(&self) -> bool {
        tokio::time::timeout(self.deadline, self.inner.health_check())
            .await
            .unwrap_or(false)
    }
}
