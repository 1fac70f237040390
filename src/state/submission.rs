//! Score submission input schema
//!
//! Submissions are never rejected for their field values. Each field goes
//! through a lenient coercion rule instead:
//!
//! * `name`: stringified, then cut to [`MAX_NAME_CHARS`] characters
//! * `alerts`: stringified, then parsed as a leading integer (0 when none)
//! * `meters`: kept when truthy, otherwise an empty object
//!
//! Only a body that is not JSON at all (or is `null`) fails.

use super::score::{empty_meters, ScoreRecord};
use chrono::{DateTime, Utc};
use serde_json::{Number, Value};
use thiserror::Error;

/// Maximum length of a stored player name, in characters
pub const MAX_NAME_CHARS: usize = 20;

/// Reasons a submission body cannot be turned into a score
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// Body is not parseable as JSON
    #[error("request body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Body parsed to `null`, which has no fields to read
    #[error("request body is null")]
    Null,
}

/// A coerced score submission, ready to be stamped and stored
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSubmission {
    /// Player name after truncation
    pub name: String,
    /// Alert count after integer coercion
    pub alerts: i64,
    /// Meters value, `{}` when the client sent nothing usable
    pub meters: Value,
}

impl ScoreSubmission {
    /// Parse and coerce a raw request body
    pub fn from_slice(body: &[u8]) -> Result<Self, SubmissionError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(&value)
    }

    /// Coerce an already-parsed JSON value
    ///
    /// Non-object values are accepted; all their fields count as missing.
    pub fn from_value(value: &Value) -> Result<Self, SubmissionError> {
        if value.is_null() {
            return Err(SubmissionError::Null);
        }
        let field = |key: &str| value.as_object().and_then(|fields| fields.get(key));

        Ok(Self {
            name: coerce_name(field("name")),
            alerts: coerce_alerts(field("alerts")),
            meters: coerce_meters(field("meters")),
        })
    }

    /// Turn the submission into a record stamped with `submitted_at`
    pub fn into_record(self, submitted_at: DateTime<Utc>) -> ScoreRecord {
        ScoreRecord::new(self.name, self.alerts, self.meters, submitted_at)
    }
}

/// Stringify a name and keep its first [`MAX_NAME_CHARS`] characters
pub fn coerce_name(value: Option<&Value>) -> String {
    loose_string(value).chars().take(MAX_NAME_CHARS).collect()
}

/// Parse the leading integer of the stringified value, or 0
pub fn coerce_alerts(value: Option<&Value>) -> i64 {
    parse_int_prefix(&loose_string(value)).unwrap_or(0)
}

/// Keep truthy meters as-is, replace anything else with `{}`
pub fn coerce_meters(value: Option<&Value>) -> Value {
    match value {
        Some(meters) if is_truthy(meters) => meters.clone(),
        _ => empty_meters(),
    }
}

/// Stringify a possibly-missing JSON value with loose scripting-language
/// rules (`undefined`, `null`, `[object Object]`, comma-joined arrays)
fn loose_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => value_string(value),
    }
}

fn value_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_string(n: &Number) -> String {
    // JSON numbers are doubles on the client side, integers included
    n.as_f64().map(double_string).unwrap_or_default()
}

/// Shortest round-trip decimal form of a double, switching to exponent
/// notation (`1e+21`, `5e-7`) below 1e-6 and from 1e21 up
fn double_string(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (whole, fraction) = digits.split_at(n as usize);
        format!("{}.{}", whole, fraction)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat(n.unsigned_abs() as usize), digits)
    } else {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            format!("{}e{}{}", head, exp_sign, exponent.unsigned_abs())
        } else {
            format!("{}.{}e{}{}", head, tail, exp_sign, exponent.unsigned_abs())
        }
    };
    format!("{}{}", sign, body)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse the integer at the start of `input`
///
/// Leading whitespace and a sign are skipped, a `0x` prefix switches to
/// hexadecimal, and parsing stops at the first non-digit. Returns `None`
/// when no digit was consumed. Values beyond `i64` saturate.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let (radix, digits) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, rest),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        seen_digit = true;
        value = value
            .saturating_mul(i64::from(radix))
            .saturating_add(i64::from(digit));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { value.saturating_neg() } else { value })
}
