//! Human Duration Strings
//!
//! `<n><unit>` with unit one of `ms`, `s`, `m`, `h`, `d` (e.g. `15m`,
//! `7d`). A bare number is read as milliseconds.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("Duration is empty")]
    Empty,

    #[error("Invalid duration amount in {0:?}")]
    InvalidAmount(String),

    #[error("Unknown duration unit {unit:?} in {input:?}")]
    UnknownUnit { input: String, unit: String },

    #[error("Duration {0:?} overflows")]
    Overflow(String),
}

pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (amount, unit) = trimmed.split_at(split);

    let amount: u64 = amount
        .parse()
        .map_err(|_| DurationParseError::InvalidAmount(trimmed.to_string()))?;

    let millis_per_unit: u64 = match unit.trim() {
        "" | "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        other => {
            return Err(DurationParseError::UnknownUnit {
                input: trimmed.to_string(),
                unit: other.to_string(),
            });
        }
    };

    amount
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| DurationParseError::Overflow(trimmed.to_string()))
}

/// Shortest exact rendering in the same syntax (`900s` -> `15m`).
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    const UNITS: [(u128, &str); 4] = [
        (86_400_000, "d"),
        (3_600_000, "h"),
        (60_000, "m"),
        (1_000, "s"),
    ];

    if millis == 0 {
        return "0s".to_string();
    }
    for (size, suffix) in UNITS {
        if millis % size == 0 {
            return format!("{}{}", millis / size, suffix);
        }
    }
    format!("{millis}ms")
}
