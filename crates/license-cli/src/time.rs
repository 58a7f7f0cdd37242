//! Parsing and formatting of durations and instants given on the command line.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use license_core::error::AppError;

/// Parse a duration such as `30d`, `2w`, or `1h30m`.
///
/// Segments are `<number><unit>` with units `w`, `d`, `h`, `m`, `s`, and
/// are summed.
pub fn parse_duration(input: &str) -> Result<TimeDelta, AppError> {
    let invalid = || AppError::constraint_violation(format!("Invalid duration '{input}'"));

    let input_trimmed = input.trim();
    if input_trimmed.is_empty() {
        return Err(invalid());
    }

    let mut total = TimeDelta::zero();
    let mut digits = String::new();

    for ch in input_trimmed.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        let amount: i64 = digits.parse().map_err(|_| invalid())?;
        digits.clear();

        let segment = match ch {
            'w' => TimeDelta::try_weeks(amount),
            'd' => TimeDelta::try_days(amount),
            'h' => TimeDelta::try_hours(amount),
            'm' => TimeDelta::try_minutes(amount),
            's' => TimeDelta::try_seconds(amount),
            _ => None,
        }
        .ok_or_else(invalid)?;

        total = total.checked_add(&segment).ok_or_else(invalid)?;
    }

    // trailing number without unit
    if !digits.is_empty() {
        return Err(invalid());
    }

    Ok(total)
}

/// Parse an instant given as RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC), or
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>, AppError> {
    let input = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    Err(AppError::constraint_violation(format!(
        "Invalid date '{input}', expected RFC 3339 or YYYY-MM-DD"
    )))
}

/// Format a duration as `Nd Nh Nm`.
pub fn format_duration(duration: TimeDelta) -> String {
    format!(
        "{}d {}h {}m",
        duration.num_days(),
        duration.num_hours() % 24,
        duration.num_minutes() % 60
    )
}

/// Format an instant for table output.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
