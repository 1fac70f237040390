// Score record types
// One persisted game result as stored on the leaderboard

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Names of the meters averaged by the statistics endpoint
pub const METER_NAMES: [&str; 4] = ["noise", "damage", "risk", "career"];

/// One submitted game result
///
/// Missing fields default when a stored document is read back, so that
/// hand-edited or older files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Player name, at most 20 characters when created by the server
    #[serde(default)]
    pub name: String,
    /// Number of alerts raised during the game (the ranking key)
    #[serde(default, deserialize_with = "lenient_alerts")]
    pub alerts: i64,
    /// Named sub-scores; usually an object of numbers, shape not enforced
    #[serde(default = "empty_meters")]
    pub meters: Value,
    /// Server-assigned ISO-8601 insertion time
    #[serde(default)]
    pub date: String,
}

/// An empty meters object
pub fn empty_meters() -> Value {
    Value::Object(Map::new())
}

/// Read any stored number (or `null`) as an alert count
///
/// Older files may hold floats such as `1e+23`; fractions truncate and
/// out-of-range values saturate.
fn lenient_alerts<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<Number>::deserialize(deserializer)?;
    Ok(number.as_ref().map(alerts_from_number).unwrap_or(0))
}

fn alerts_from_number(number: &Number) -> i64 {
    if let Some(i) = number.as_i64() {
        i
    } else if number.is_u64() {
        i64::MAX
    } else {
        // `as` saturates at the i64 bounds
        number.as_f64().map(|f| f as i64).unwrap_or(0)
    }
}

/// Format a timestamp the way records store it (`2024-01-01T00:00:00.000Z`)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ScoreRecord {
    /// Create a record stamped with the given time
    pub fn new(name: String, alerts: i64, meters: Value, at: DateTime<Utc>) -> Self {
        Self {
            name,
            alerts,
            meters,
            date: format_timestamp(at),
        }
    }

    /// Numeric value of a named meter, 0 when missing or not a number
    pub fn meter(&self, key: &str) -> f64 {
        self.meters
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }
}
