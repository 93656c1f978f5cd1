use analysis_core::SavedAnalysis;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub token_hash: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SavedAnalysisRecord {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub name: String,
    pub recommendation: String,
    pub notes: String,
    /// Factor list as a JSON document, stored verbatim.
    pub factors: String,
    pub timestamp: DateTime<Utc>,
}

impl SavedAnalysisRecord {
    /// Wire shape: the numeric row id is stringified and the factors JSON is
    /// inlined, matching the public API contract.
    pub fn into_api(self) -> SavedAnalysis {
        let factors = serde_json::from_str(&self.factors)
            .unwrap_or(serde_json::Value::Array(Vec::new()));
        SavedAnalysis {
            id: self.id.to_string(),
            symbol: self.symbol,
            name: self.name,
            recommendation: self.recommendation,
            notes: self.notes,
            factors,
            timestamp: self.timestamp,
        }
    }
}

/// Caller-supplied fields for a save. `None` leaves the stored value
/// untouched on update (and takes the documented default on first insert).
#[derive(Debug, Clone, Default)]
pub struct SaveAnalysisFields {
    pub name: Option<String>,
    pub recommendation: Option<String>,
    pub notes: Option<String>,
    pub factors: Option<serde_json::Value>,
}
