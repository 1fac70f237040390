// State management module
// Handles score records, submission coercion, the shared application state, and persistence

pub mod app_state;
pub mod db;
pub mod persistence;
pub mod score;
pub mod submission;

pub use app_state::{AppState, SharedState};
pub use db::SqliteScoreStore;
pub use persistence::{open_store, FileScoreStore, MemoryScoreStore, ScoreStore, StoreError};
pub use score::ScoreRecord;
pub use submission::{ScoreSubmission, SubmissionError};
