//! Score Server Library
//!
//! A small leaderboard service: game results are submitted over HTTP, kept
//! in a capped, alert-ranked store, and served back as a list or as
//! aggregate statistics. The binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
/// Business logic independent of HTTP and storage
pub mod services;
/// Application state management
///
/// Handles score records, submission coercion, and persistence.
pub mod state;
