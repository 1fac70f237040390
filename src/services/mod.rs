//! Services module
//!
//! Business logic layer, kept independent of HTTP handling

pub mod leaderboard;
