//! SQLite persistence for users, sessions and saved analyses.
//!
//! The upsert is a single `INSERT … ON CONFLICT DO UPDATE` statement keyed on
//! (user_id, symbol), so concurrent saves for the same user and symbol cannot
//! produce duplicate rows.

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use thiserror::Error;

pub mod models;
pub use models::{SaveAnalysisFields, SavedAnalysisRecord, SessionRecord, UserRecord};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct AnalysisStore {
    pool: SqlitePool,
}

impl AnalysisStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        // One connection: SQLite serializes writers anyway, and a shared
        // `sqlite::memory:` pool would otherwise hand out separate databases.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token_hash TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                expires_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS saved_analyses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                symbol TEXT NOT NULL,
                name TEXT NOT NULL,
                recommendation TEXT NOT NULL,
                notes TEXT NOT NULL,
                factors TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                UNIQUE(user_id, symbol)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // --- users ---

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        let result: Result<UserRecord, sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO users (email, name, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        result.map_err(|err| match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(format!("user {} already exists", email))
            }
            _ => StoreError::Database(err),
        })
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // --- sessions ---

    pub async fn create_session(
        &self,
        user_id: i64,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, StoreError> {
        let expires_at = Utc::now() + ttl;
        sqlx::query(
            "INSERT OR REPLACE INTO sessions (token_hash, user_id, expires_at) VALUES (?, ?, ?)",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(expires_at)
    }

    /// Resolve a session to its user. Expired sessions are treated as absent
    /// and reaped on the way out.
    pub async fn find_session_user(&self, token_hash: &str) -> Result<Option<UserRecord>, StoreError> {
        let session: Option<SessionRecord> =
            sqlx::query_as("SELECT * FROM sessions WHERE token_hash = ?")
                .bind(token_hash)
                .fetch_optional(&self.pool)
                .await?;

        let session = match session {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.expires_at <= Utc::now() {
            tracing::debug!(user_id = session.user_id, "reaping expired session");
            self.delete_session(token_hash).await?;
            return Ok(None);
        }

        self.find_user_by_id(session.user_id).await
    }

    pub async fn delete_session(&self, token_hash: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // --- saved analyses ---

    /// Upsert keyed on (user_id, symbol). First save creates the row with
    /// the documented defaults; later saves update only the supplied fields
    /// and refresh the timestamp.
    pub async fn upsert_analysis(
        &self,
        user_id: i64,
        symbol: &str,
        fields: SaveAnalysisFields,
    ) -> Result<SavedAnalysisRecord, StoreError> {
        let factors_json = match &fields.factors {
            Some(value) => Some(serde_json::to_string(value)?),
            None => None,
        };

        let record = sqlx::query_as(
            r#"
            INSERT INTO saved_analyses (user_id, symbol, name, recommendation, notes, factors, timestamp)
            VALUES (?1, ?2, COALESCE(?3, ?2), COALESCE(?4, 'HOLD'), COALESCE(?5, ''), COALESCE(?6, '[]'), ?7)
            ON CONFLICT(user_id, symbol) DO UPDATE SET
                name = COALESCE(?3, saved_analyses.name),
                recommendation = COALESCE(?4, saved_analyses.recommendation),
                notes = COALESCE(?5, saved_analyses.notes),
                factors = COALESCE(?6, saved_analyses.factors),
                timestamp = ?7
            RETURNING id, user_id, symbol, name, recommendation, notes, factors, timestamp
            "#,
        )
        .bind(user_id)
        .bind(symbol)
        .bind(fields.name)
        .bind(fields.recommendation)
        .bind(fields.notes)
        .bind(factors_json)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list_analyses(&self, user_id: i64) -> Result<Vec<SavedAnalysisRecord>, StoreError> {
        let records = sqlx::query_as(
            "SELECT * FROM saved_analyses WHERE user_id = ? ORDER BY timestamp DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Owner-scoped delete. A missing id and a foreign-owned id are the same
    /// NotFound; nothing distinguishes the two to the caller.
    pub async fn delete_analysis(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM saved_analyses WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("saved analysis {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn memory_store() -> AnalysisStore {
        AnalysisStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store")
    }

    #[tokio::test]
    async fn test_create_user_and_duplicate_email() {
        let store = memory_store().await;

        let user = store.create_user("a@b.c", "Ada", "hash").await.unwrap();
        assert_eq!(user.email, "a@b.c");

        let err = store.create_user("a@b.c", "Ada Again", "hash2").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_per_owner_symbol() {
        let store = memory_store().await;
        let user = store.create_user("a@b.c", "Ada", "hash").await.unwrap();

        let first = store
            .upsert_analysis(
                user.id,
                "AAPL",
                SaveAnalysisFields {
                    notes: Some("first take".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let second = store
            .upsert_analysis(
                user.id,
                "AAPL",
                SaveAnalysisFields {
                    notes: Some("second take".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Same row updated in place, latest notes win, timestamp refreshed.
        assert_eq!(first.id, second.id);
        assert_eq!(second.notes, "second take");
        assert!(second.timestamp >= first.timestamp);

        let all = store.list_analyses(user.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].notes, "second take");
    }

    #[tokio::test]
    async fn test_upsert_defaults_and_partial_update() {
        let store = memory_store().await;
        let user = store.create_user("a@b.c", "Ada", "hash").await.unwrap();

        let created = store
            .upsert_analysis(user.id, "TSLA", SaveAnalysisFields::default())
            .await
            .unwrap();
        assert_eq!(created.name, "TSLA");
        assert_eq!(created.recommendation, "HOLD");
        assert_eq!(created.notes, "");
        assert_eq!(created.factors, "[]");

        let updated = store
            .upsert_analysis(
                user.id,
                "TSLA",
                SaveAnalysisFields {
                    recommendation: Some("BUY".to_string()),
                    factors: Some(json!([{"name": "Market Trend", "impact": 0.6}])),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Untouched fields keep their stored values.
        assert_eq!(updated.name, "TSLA");
        assert_eq!(updated.recommendation, "BUY");
        assert!(updated.factors.contains("Market Trend"));
    }

    #[tokio::test]
    async fn test_list_is_timestamp_descending() {
        let store = memory_store().await;
        let user = store.create_user("a@b.c", "Ada", "hash").await.unwrap();

        store
            .upsert_analysis(user.id, "AAPL", SaveAnalysisFields::default())
            .await
            .unwrap();
        store
            .upsert_analysis(user.id, "MSFT", SaveAnalysisFields::default())
            .await
            .unwrap();

        let all = store.list_analyses(user.id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].symbol, "MSFT");
        assert!(all[0].timestamp >= all[1].timestamp);
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let store = memory_store().await;
        let owner = store.create_user("o@b.c", "Owner", "hash").await.unwrap();
        let other = store.create_user("x@b.c", "Other", "hash").await.unwrap();

        let saved = store
            .upsert_analysis(owner.id, "AAPL", SaveAnalysisFields::default())
            .await
            .unwrap();

        // A foreign owner gets NotFound and the record survives.
        let err = store.delete_analysis(other.id, saved.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.list_analyses(owner.id).await.unwrap().len(), 1);

        store.delete_analysis(owner.id, saved.id).await.unwrap();
        assert!(store.list_analyses(owner.id).await.unwrap().is_empty());

        let err = store.delete_analysis(owner.id, saved.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sessions_expire() {
        let store = memory_store().await;
        let user = store.create_user("a@b.c", "Ada", "hash").await.unwrap();

        store
            .create_session(user.id, "livehash", Duration::hours(1))
            .await
            .unwrap();
        store
            .create_session(user.id, "deadhash", Duration::seconds(-1))
            .await
            .unwrap();

        let live = store.find_session_user("livehash").await.unwrap();
        assert_eq!(live.map(|u| u.id), Some(user.id));

        let dead = store.find_session_user("deadhash").await.unwrap();
        assert!(dead.is_none());

        store.delete_session("livehash").await.unwrap();
        assert!(store.find_session_user("livehash").await.unwrap().is_none());
    }
}
