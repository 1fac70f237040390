//! SQLite score store
//!
//! Keeps the leaderboard in an embedded database, one row per record keyed
//! by its position. Saves replace every row inside a single transaction.

use super::persistence::{ScoreStore, StoreError};
use super::score::ScoreRecord;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

/// Database row for a stored score
#[derive(Debug, sqlx::FromRow)]
struct ScoreRow {
    name: String,
    alerts: i64,
    meters: String,
    date: String,
}

impl TryFrom<ScoreRow> for ScoreRecord {
    type Error = StoreError;

    fn try_from(row: ScoreRow) -> Result<Self, Self::Error> {
        Ok(ScoreRecord {
            name: row.name,
            alerts: row.alerts,
            meters: serde_json::from_str(&row.meters)?,
            date: row.date,
        })
    }
}

/// Score store backed by a SQLite database file
pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    /// Open (creating if needed) the database at `db_path` and run migrations
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Connected to SQLite database at: {}", db_path.display());

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), StoreError> {
        let migration_sql = include_str!("../../migrations/001_create_scores.sql");

        // Drop comments, then execute each statement separately
        let cleaned_sql: String = migration_sql
            .lines()
            .map(|line| line.split("--").next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        for statement in cleaned_sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        debug!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn load(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ScoreRow>(
            "SELECT name, alerts, meters, date FROM scores ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ScoreRecord::try_from).collect()
    }

    async fn save(&self, scores: &[ScoreRecord]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM scores").execute(&mut *tx).await?;

        for (position, score) in scores.iter().enumerate() {
            let meters = serde_json::to_string(&score.meters)?;
            sqlx::query(
                "INSERT INTO scores (position, name, alerts, meters, date) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(position as i64)
            .bind(&score.name)
            .bind(score.alerts)
            .bind(meters)
            .bind(&score.date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(count = scores.len(), "Saved scores to database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_database_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let store = SqliteScoreStore::new(dir.path().join("scores.db"))
            .await
            .unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_preserves_order_and_replaces_rows() {
        let dir = TempDir::new().unwrap();
        let store = SqliteScoreStore::new(dir.path().join("scores.db"))
            .await
            .unwrap();

        let first = vec![
            ScoreRecord::new("b".to_string(), 5, json!({"noise": 2}), Utc::now()),
            ScoreRecord::new("a".to_string(), 9, json!({}), Utc::now()),
        ];
        store.save(&first).await.unwrap();
        assert_eq!(store.load().await.unwrap(), first);

        let second = vec![ScoreRecord::new(
            "c".to_string(),
            1,
            json!("not an object"),
            Utc::now(),
        )];
        store.save(&second).await.unwrap();
        assert_eq!(store.load().await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.db");
        let record = ScoreRecord::new("keep".to_string(), 3, json!({}), Utc::now());

        {
            let store = SqliteScoreStore::new(&path).await.unwrap();
            store.save(std::slice::from_ref(&record)).await.unwrap();
            store.pool.close().await;
        }

        let store = SqliteScoreStore::new(&path).await.unwrap();
        assert_eq!(store.load().await.unwrap(), vec![record]);
    }
}
