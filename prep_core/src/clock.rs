//! 12-hour / 24-hour procedure time handling.
//!
//! The form offers half-hour slots in `h:mm AM|PM` form. They are converted
//! to 24-hour `HH:MM` before validation, so the validator and calculator only
//! ever see one representation.

use crate::error::ClockError;
use crate::validation::parse_time_24h;
use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;

/// Number of selectable procedure times (every 30 minutes)
pub const SLOTS_PER_DAY: usize = 48;

static TIME_OPTIONS: Lazy<Vec<String>> = Lazy::new(|| {
    (0..SLOTS_PER_DAY)
        .map(|i| {
            let minutes = (i * 30) as u32;
            let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
                .unwrap_or_default();
            to_12_hour(time)
        })
        .collect()
});

/// The selectable procedure times, `"12:00 AM"` through `"11:30 PM"`
pub fn time_options() -> &'static [String] {
    &TIME_OPTIONS
}

/// Normalize a procedure time to 24-hour `HH:MM`.
///
/// Accepts `h:mm AM|PM` (meridiem case-insensitive, hour 1-12) or a time
/// that is already `HH:MM`.
pub fn to_24_hour(input: &str) -> Result<String, ClockError> {
    let trimmed = input.trim();
    if parse_time_24h(trimmed).is_some() {
        return Ok(trimmed.to_string());
    }

    let time = parse_12_hour(trimmed).ok_or_else(|| ClockError {
        input: input.to_string(),
    })?;
    Ok(time.format("%H:%M").to_string())
}

/// Format a time of day as `h:mm AM|PM`
pub fn to_12_hour(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if pm { "PM" } else { "AM" }
    )
}

fn parse_12_hour(text: &str) -> Option<NaiveTime> {
    let (clock, meridiem) = text.split_once(char::is_whitespace)?;
    let pm = match meridiem.trim().to_ascii_uppercase().as_str() {
        "AM" => false,
        "PM" => true,
        _ => return None,
    };

    let (hours, minutes) = clock.split_once(':')?;
    if hours.is_empty()
        || hours.len() > 2
        || minutes.len() != 2
        || !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if !(1..=12).contains(&hours) {
        return None;
    }

    let hours = match (hours, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    NaiveTime::from_hms_opt(hours, minutes, 0)
}
