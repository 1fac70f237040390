//! Leaderboard service
//!
//! Pure ranking and statistics over a score sequence. Nothing here touches
//! storage; callers load and save around these functions.

use crate::state::score::ScoreRecord;
use serde::Serialize;
use std::collections::HashSet;

/// Aggregate statistics over all stored scores
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStats {
    /// Number of stored records
    pub total_games: usize,
    /// Number of distinct names (case-sensitive)
    pub unique_players: usize,
    /// Mean alert count, one decimal place
    pub average_alerts: f64,
    /// Mean of each named meter, one decimal place
    pub average_meters: AverageMeters,
}

/// Per-meter averages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AverageMeters {
    /// Mean `noise` meter
    pub noise: f64,
    /// Mean `damage` meter
    pub damage: f64,
    /// Mean `risk` meter
    pub risk: f64,
    /// Mean `career` meter
    pub career: f64,
}

/// Leaderboard operations
pub struct Leaderboard;

impl Leaderboard {
    /// Insert `record`, re-sort by descending alerts and cut to `capacity`
    ///
    /// The sort is stable: among equal alert counts, records already on the
    /// board stay ahead of the newcomer. Returns the records dropped by the cut.
    pub fn insert(
        scores: &mut Vec<ScoreRecord>,
        record: ScoreRecord,
        capacity: usize,
    ) -> Vec<ScoreRecord> {
        scores.push(record);
        scores.sort_by(|a, b| b.alerts.cmp(&a.alerts));
        if scores.len() > capacity {
            scores.split_off(capacity)
        } else {
            Vec::new()
        }
    }

    /// Compute aggregate statistics
    pub fn stats(scores: &[ScoreRecord]) -> ScoreStats {
        let unique_players = scores
            .iter()
            .map(|s| s.name.as_str())
            .collect::<HashSet<_>>()
            .len();

        ScoreStats {
            total_games: scores.len(),
            unique_players,
            average_alerts: average(scores, |s| s.alerts as f64),
            average_meters: AverageMeters {
                noise: average(scores, |s| s.meter("noise")),
                damage: average(scores, |s| s.meter("damage")),
                risk: average(scores, |s| s.meter("risk")),
                career: average(scores, |s| s.meter("career")),
            },
        }
    }
}

/// Mean of `value` over `scores`, rounded to one decimal; 0 when empty
fn average<F>(scores: &[ScoreRecord], value: F) -> f64
where
    F: Fn(&ScoreRecord) -> f64,
{
    if scores.is_empty() {
        return 0.0;
    }
    let total: f64 = scores.iter().map(value).sum();
    round_to_tenth(total / scores.len() as f64)
}

/// Round to one decimal using the exact binary value of `value`
///
/// Decides on the full decimal expansion, so 0.35 (stored just below
/// 0.35) rounds down. Exact halves such as 0.25 round away from zero.
/// Magnitudes of 1e21 and above are returned unchanged.
fn round_to_tenth(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e21 {
        return value;
    }

    // Every f64 has a finite decimal expansion of at most 1074 fractional digits
    let exact = format!("{:.1100}", value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), "0"));
    let mut digits = fraction.bytes().map(|b| u128::from(b - b'0'));
    let tenths_digit = digits.next().unwrap_or(0);
    let round_up = digits.next().unwrap_or(0) >= 5;

    let whole: u128 = whole.parse().unwrap_or(0);
    let tenths = whole * 10 + tenths_digit + u128::from(round_up);
    if tenths == 0 {
        return 0.0;
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, tenths / 10, tenths % 10)
        .parse()
        .unwrap_or(value)
}
