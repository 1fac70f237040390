// Score persistence module
// Storage interface for the leaderboard plus the file and in-memory backends

use super::db::SqliteScoreStore;
use super::score::ScoreRecord;
use crate::config::{StorageBackend, StorageConfig};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Error types for persistence operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database error from the SQLite backend
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Whole-sequence storage for the leaderboard
///
/// Implementations always read and write the complete ordered sequence.
/// Ordering and capacity are the caller's responsibility.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Load every stored record, in stored order
    async fn load(&self) -> Result<Vec<ScoreRecord>, StoreError>;

    /// Replace the stored sequence with `scores`
    async fn save(&self, scores: &[ScoreRecord]) -> Result<(), StoreError>;
}

/// Open the store selected by the configuration
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ScoreStore>, StoreError> {
    let store: Arc<dyn ScoreStore> = match config.backend {
        StorageBackend::File => {
            info!("Using score file {}", config.scores_file.display());
            Arc::new(FileScoreStore::new(&config.scores_file))
        }
        StorageBackend::Sqlite => Arc::new(SqliteScoreStore::new(&config.database_path).await?),
        StorageBackend::Memory => {
            info!("Using in-memory score store; scores are lost on restart");
            Arc::new(MemoryScoreStore::new())
        }
    };
    Ok(store)
}

/// Scores kept as a pretty-printed JSON array in a single file
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Create a store backed by the file at `path`
    ///
    /// The file does not need to exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "scores.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ScoreStore for FileScoreStore {
    async fn load(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.path).await?;
        let scores: Vec<ScoreRecord> = serde_json::from_str(&json)?;
        Ok(scores)
    }

    async fn save(&self, scores: &[ScoreRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(scores)?;

        // Write beside the target, then swap it in so readers never see half a file
        let temp_path = self.temp_path();
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(count = scores.len(), path = %self.path.display(), "Saved scores");
        Ok(())
    }
}

/// Scores held in process memory
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    scores: RwLock<Vec<ScoreRecord>>,
}

impl MemoryScoreStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `scores`
    pub fn with_scores(scores: Vec<ScoreRecord>) -> Self {
        Self {
            scores: RwLock::new(scores),
        }
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn load(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(self.scores.read().await.clone())
    }

    async fn save(&self, scores: &[ScoreRecord]) -> Result<(), StoreError> {
        *self.scores.write().await = scores.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(name: &str, alerts: i64) -> ScoreRecord {
        ScoreRecord::new(name.to_string(), alerts, json!({"noise": 1}), Utc::now())
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let store = FileScoreStore::new(dir.path().join("scores.json"));

        // Should return empty sequence for non-existent file
        let scores = store.load().await.unwrap();
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_from_file() {
        let dir = TempDir::new().unwrap();
        let store = FileScoreStore::new(dir.path().join("scores.json"));

        let scores = vec![record("Player 1", 9), record("Player 2", 4)];
        store.save(&scores).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, scores);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("scores.json");
        let store = FileScoreStore::new(&path);

        store.save(&[record("deep", 1)]).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_array() {
        let dir = TempDir::new().unwrap();
        let store = FileScoreStore::new(dir.path().join("scores.json"));
        store.save(&[record("a", 1)]).await.unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.starts_with("[\n  {"));
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(value.is_array());
    }

    #[tokio::test]
    async fn test_load_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let result = FileScoreStore::new(&path).load().await;
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[tokio::test]
    async fn test_load_file_with_float_alerts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(
            &path,
            r#"[{"name": "max", "alerts": 1e+23, "meters": {}, "date": "2024-01-01T00:00:00.000Z"}]"#,
        )
        .unwrap();

        let scores = FileScoreStore::new(&path).load().await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].alerts, i64::MAX);
    }

    #[tokio::test]
    async fn test_memory_store_replaces_contents() {
        let store = MemoryScoreStore::with_scores(vec![record("old", 1)]);
        store.save(&[record("new", 2)]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "new");
    }

    #[tokio::test]
    async fn test_open_file_store_from_config() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            scores_file: dir.path().join("scores.json"),
            ..StorageConfig::default()
        };

        let store = open_store(&config).await.unwrap();
        store.save(&[record("cfg", 3)]).await.unwrap();
        assert!(config.scores_file.exists());
    }
}
