//! Risk ledger classification.

use crate::store::{SessionField, SessionStore, StoreError};
use serde::Serialize;

/// Risk band derived from the cumulative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Classify a cumulative score.
    ///
    /// The medium band is the open interval `(5, 10)`: a score of exactly 10
    /// classifies as [`RiskBand::Low`].
    pub fn classify(risk: i64) -> Self {
        if risk > 10 {
            Self::High
        } else if risk > 5 && risk < 10 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Result of scoring one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub score: i64,
    pub band: RiskBand,
}

impl RiskAssessment {
    pub fn from_score(score: i64) -> Self {
        Self {
            score,
            band: RiskBand::classify(score),
        }
    }
}

/// Read the session's risk ledger and classify it. A missing ledger is a
/// store failure, not a zero score.
pub async fn assess(
    store: &dyn SessionStore,
    session_id: &str,
) -> Result<RiskAssessment, StoreError> {
    let raw = store.require(session_id, SessionField::Risk).await?;
    let score = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| StoreError::NotAnInteger {
            field: SessionField::Risk.as_str(),
            value: raw.clone(),
        })?;
    Ok(RiskAssessment::from_score(score))
}
