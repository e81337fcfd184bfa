//! ISO-8601 durations for indexer schedules.
//!
//! The service expresses schedule intervals as ISO-8601 durations restricted to
//! days, hours, minutes and whole seconds (`P1D`, `PT2H`, `PT5M`).

use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Format a duration as an ISO-8601 duration string.
///
/// Sub-second precision is dropped.
///
/// ```
/// use std::time::Duration;
/// use search_provisioner_shared::types::interval::format_interval;
///
/// assert_eq!(format_interval(Duration::from_secs(86_400)), "P1D");
/// assert_eq!(format_interval(Duration::from_secs(90 * 60)), "PT1H30M");
/// ```
pub fn format_interval(duration: Duration) -> String {
    let total = duration.as_secs();
    if total == 0 {
        return "PT0S".to_string();
    }

    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{}D", days));
    }
    if hours > 0 || minutes > 0 || seconds > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if seconds > 0 {
            out.push_str(&format!("{}S", seconds));
        }
    }
    out
}

/// Parse an ISO-8601 duration made of day, hour, minute and second components.
pub fn parse_interval(value: &str) -> Result<Duration, String> {
    let rest = value
        .strip_prefix('P')
        .ok_or_else(|| format!("interval '{}' must start with 'P'", value))?;
    if rest.is_empty() {
        return Err(format!("interval '{}' has no components", value));
    }

    let mut total: u64 = 0;
    let mut number = String::new();
    let mut in_time = false;
    let mut seen_component = false;

    for c in rest.chars() {
        match c {
            '0'..='9' => number.push(c),
            'T' if !in_time && number.is_empty() => in_time = true,
            'D' | 'H' | 'M' | 'S' => {
                if number.is_empty() {
                    return Err(format!("interval '{}' has a unit without a number", value));
                }
                let n: u64 = number
                    .parse()
                    .map_err(|_| format!("interval '{}' is too large", value))?;
                number.clear();
                let unit = match (c, in_time) {
                    ('D', false) => SECS_PER_DAY,
                    ('H', true) => SECS_PER_HOUR,
                    ('M', true) => SECS_PER_MINUTE,
                    ('S', true) => 1,
                    _ => return Err(format!("interval '{}' has a misplaced '{}'", value, c)),
                };
                total = n
                    .checked_mul(unit)
                    .and_then(|secs| total.checked_add(secs))
                    .ok_or_else(|| format!("interval '{}' is too large", value))?;
                seen_component = true;
            }
            _ => return Err(format!("interval '{}' contains unexpected '{}'", value, c)),
        }
    }

    if !number.is_empty() || !seen_component {
        return Err(format!("interval '{}' is incomplete", value));
    }
    Ok(Duration::from_secs(total))
}

/// Serde adapter for `Duration` fields carried as ISO-8601 strings.
pub mod iso8601 {
    use std::time::Duration;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_interval(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_interval(&raw).map_err(D::Error::custom)
    }
}
