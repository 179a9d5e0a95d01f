//! Append-only storage of submitted answers.
use serde::Serialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::{path::Path, time::Duration};
use tracing::info;

const CREATE_ANSWERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        answer INTEGER NOT NULL,
        timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
    )
"#;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub average: f64,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct AnswerRepository {
    pool: SqlitePool,
}

impl AnswerRepository {
    /// Opens the database at `path`, creating the file and table when missing.
    pub async fn connect(path: &Path) -> Result<Self, sqlx::Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;
        info!(path = %path.display(), "Connected to answers database");

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and makes sure the table exists.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(CREATE_ANSWERS_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Stores one answer and returns its id. The timestamp is filled in by SQLite.
    pub async fn record(&self, answer: i64) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO answers (answer) VALUES (?1)")
            .bind(answer)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn stats(&self) -> Result<Stats, sqlx::Error> {
        let (average, count): (Option<f64>, i64) =
            sqlx::query_as("SELECT AVG(answer), COUNT(*) FROM answers")
                .fetch_one(&self.pool)
                .await?;
        Ok(Stats {
            average: average.unwrap_or(0.0),
            count,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Answers database closed");
    }
}

#[cfg(test)]
pub(crate) async fn memory_repository() -> AnswerRepository {
    // every in-memory connection is its own database, so pin the pool to one
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    AnswerRepository::from_pool(pool).await.expect("create table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stats_on_empty_store_are_zero() {
        let repo = memory_repository().await;
        let stats = repo.stats().await.expect("stats");
        assert_eq!(
            stats,
            Stats {
                average: 0.0,
                count: 0
            }
        );
    }

    #[tokio::test]
    async fn stats_average_recorded_answers() {
        let repo = memory_repository().await;
        for a in [10, 20, 30] {
            repo.record(a).await.expect("record");
        }
        let stats = repo.stats().await.expect("stats");
        assert_eq!(stats.count, 3);
        assert!((stats.average - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn record_returns_increasing_ids() {
        let repo = memory_repository().await;
        let first = repo.record(50_000).await.expect("record");
        let second = repo.record(1).await.expect("record");
        assert!(first > 0);
        assert!(second > first);
    }

    #[tokio::test]
    async fn record_sets_timestamp() {
        let repo = memory_repository().await;
        let id = repo.record(7).await.expect("record");
        let (timestamp,): (Option<chrono::NaiveDateTime>,) =
            sqlx::query_as("SELECT timestamp FROM answers WHERE id = ?1")
                .bind(id)
                .fetch_one(&repo.pool)
                .await
                .expect("select");
        assert!(timestamp.is_some(), "timestamp should default to now");
    }

    #[tokio::test]
    async fn connect_creates_database_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("answers.db");

        let repo = AnswerRepository::connect(&path).await.expect("connect");
        repo.record(12).await.expect("record");
        repo.close().await;
        assert!(path.exists());

        // data survives a reopen
        let reopened = AnswerRepository::connect(&path).await.expect("reopen");
        assert_eq!(reopened.stats().await.expect("stats").count, 1);
        reopened.close().await;
    }
}
