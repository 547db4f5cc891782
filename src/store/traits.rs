use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Separator between tokens of an accumulated multi-select field.
pub const TOKEN_SEPARATOR: char = ',';

/// Fields of a session record, with their on-store names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionField {
    Phone,
    SessionId,
    Language,
    AgeBracket,
    AerialCases,
    ContactWithCovid,
    Contacts,
    Symptoms,
    Illness,
    Risk,
}

impl SessionField {
    pub const ALL: [SessionField; 10] = [
        Self::Phone,
        Self::SessionId,
        Self::Language,
        Self::AgeBracket,
        Self::AerialCases,
        Self::ContactWithCovid,
        Self::Contacts,
        Self::Symptoms,
        Self::Illness,
        Self::Risk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::SessionId => "sessionId",
            Self::Language => "lang",
            Self::AgeBracket => "ageBracket",
            Self::AerialCases => "aerialCases",
            Self::ContactWithCovid => "contactWithCOVID",
            Self::Contacts => "contacts",
            Self::Symptoms => "symptoms",
            Self::Illness => "illness",
            Self::Risk => "risk",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl std::fmt::Display for SessionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("field `{field}` is not set for session {session_id}")]
    MissingField {
        session_id: String,
        field: &'static str,
    },
    #[error("field `{field}` holds a non-integer value {value:?}")]
    NotAnInteger { field: &'static str, value: String },
    #[error("session store call timed out after {0:?}")]
    Timeout(Duration),
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("session store worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Per-session field storage, implemented by every key-value backend.
///
/// Every operation is scoped to one session id. `increment` and `append`
/// must be atomic with respect to concurrent calls on the same field.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Set a single field, overwriting any previous value
    async fn set(&self, session_id: &str, field: SessionField, value: &str)
        -> Result<(), StoreError>;

    /// Set several fields in one call
    async fn set_many(
        &self,
        session_id: &str,
        fields: &[(SessionField, &str)],
    ) -> Result<(), StoreError>;

    /// Read a field; `None` when the field (or the session) does not exist
    async fn get(&self, session_id: &str, field: SessionField)
        -> Result<Option<String>, StoreError>;

    /// Read every field of a session, keyed by on-store field name
    async fn get_all(&self, session_id: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Atomically add `delta` to an integer field (missing = 0); returns the new value
    async fn increment(
        &self,
        session_id: &str,
        field: SessionField,
        delta: i64,
    ) -> Result<i64, StoreError>;

    /// Atomically append `token` to a token-list field, separated by
    /// [`TOKEN_SEPARATOR`]
    async fn append(&self, session_id: &str, field: SessionField, token: &str)
        -> Result<(), StoreError>;

    /// Expire the whole session after `ttl`
    async fn expire(&self, session_id: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Remove the whole session; `true` if something was removed
    async fn delete(&self, session_id: &str) -> Result<bool, StoreError>;

    /// Health check
    async fn health_check(&self) -> bool;

    /// Read a field that must exist.
    async fn require(&self, session_id: &str, field: SessionField) -> Result<String, StoreError> {
        self.get(session_id, field)
            .await?
            .ok_or_else(|| StoreError::MissingField {
                session_id: session_id.to_string(),
                field: field.as_str(),
            })
    }
}

/// Join an existing token list with a new token.
pub(crate) fn joined(existing: Option<&str>, token: &str) -> String {
    match existing {
        Some(current) if !current.is_empty() => format!("{current}{TOKEN_SEPARATOR}{token}"),
        _ => token.to_string(),
    }
}

/// Parse a stored integer, treating a missing value as zero.
pub(crate) fn parse_counter(field: SessionField, raw: Option<&str>) -> Result<i64, StoreError> {
    match raw {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|_| StoreError::NotAnInteger {
                field: field.as_str(),
                value: value.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_match_record_layout() {
        assert_eq!(SessionField::Language.as_str(), "lang");
        assert_eq!(SessionField::ContactWithCovid.as_str(), "contactWithCOVID");
        assert_eq!(SessionField::Illness.as_str(), "illness");
        for field in SessionField::ALL {
            assert_eq!(SessionField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(SessionField::from_name("nope"), None);
    }

    #[test]
    fn joined_inserts_separator_only_between_tokens() {
        assert_eq!(joined(None, "cough"), "cough");
        assert_eq!(joined(Some(""), "cough"), "cough");
        assert_eq!(joined(Some("fever"), "cough"), "fever,cough");
    }

    #[test]
    fn counters_default_to_zero() {
        assert_eq!(parse_counter(SessionField::Risk, None).unwrap(), 0);
        assert_eq!(parse_counter(SessionField::Risk, Some(" 4 ")).unwrap(), 4);
        assert!(matches!(
            parse_counter(SessionField::Risk, Some("x")),
            Err(StoreError::NotAnInteger { .. })
        ));
    }
}
