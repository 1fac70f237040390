//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Default leaderboard capacity
pub const DEFAULT_MAX_SCORES: usize = 1000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Which persistence mechanism backs the score store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Single pretty-printed JSON file
    File,
    /// Embedded SQLite database
    Sqlite,
    /// Process memory only (lost on restart)
    Memory,
}

impl StorageBackend {
    /// Parse a backend name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Some(StorageBackend::File),
            "sqlite" => Some(StorageBackend::Sqlite),
            "memory" => Some(StorageBackend::Memory),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Selected backend
    pub backend: StorageBackend,
    /// Path of the JSON scores file (file backend)
    pub scores_file: PathBuf,
    /// Path of the SQLite database (sqlite backend)
    pub database_path: PathBuf,
    /// Maximum number of records kept on the leaderboard
    pub max_scores: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            scores_file: PathBuf::from("/data/scores.json"),
            database_path: PathBuf::from("/data/scores.db"),
            max_scores: DEFAULT_MAX_SCORES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = StorageConfig::default();

        let backend = match env::var("SCORE_STORE") {
            Ok(name) => StorageBackend::parse(&name).unwrap_or_else(|| {
                tracing::warn!(
                    backend = %name,
                    "Unknown SCORE_STORE value, falling back to file storage"
                );
                StorageBackend::File
            }),
            Err(_) => defaults.backend,
        };

        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            storage: StorageConfig {
                backend,
                scores_file: env::var_os("SCORES_FILE")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.scores_file),
                database_path: env::var_os("SCORES_DB")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.database_path),
                max_scores: env::var("MAX_SCORES")
                    .ok()
                    .and_then(|m| m.parse().ok())
                    .filter(|m: &usize| *m > 0)
                    .unwrap_or(defaults.max_scores),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "HOST",
        "PORT",
        "SCORE_STORE",
        "SCORES_FILE",
        "SCORES_DB",
        "MAX_SCORES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.scores_file, PathBuf::from("/data/scores.json"));
        assert_eq!(config.storage.max_scores, 1000);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("PORT", "8081");
        env::set_var("HOST", "127.0.0.1");
        env::set_var("SCORE_STORE", "SQLite");
        env::set_var("SCORES_DB", "/tmp/board.db");
        env::set_var("MAX_SCORES", "50");

        let config = Config::from_env();
        assert_eq!(config.server_addr(), "127.0.0.1:8081");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/board.db"));
        assert_eq!(config.storage.max_scores, 50);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        env::set_var("SCORE_STORE", "postgres");
        env::set_var("MAX_SCORES", "0");

        let config = Config::from_env();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.max_scores, DEFAULT_MAX_SCORES);
        clear_env();
    }
}
