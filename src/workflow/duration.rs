//! `1h 30m` style escalation delays

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EditError, EditResult};

const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;

static HOURS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*h").unwrap());
static MINUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*m").unwrap());

pub fn format_duration(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Parse `2h`, `45m` or `1h 30m` into milliseconds
pub fn parse_duration(text: &str) -> EditResult<u64> {
    let capture = |re: &Regex| -> EditResult<Option<u64>> {
        re.captures(text)
            .map(|c| c[1].parse::<u64>().map_err(|_| EditError::InvalidDuration(text.to_string())))
            .transpose()
    };

    let hours = capture(&HOURS)?;
    let minutes = capture(&MINUTES)?;
    if hours.is_none() && minutes.is_none() {
        return Err(EditError::InvalidDuration(text.to_string()));
    }

    hours
        .unwrap_or(0)
        .checked_mul(MS_PER_HOUR)
        .zip(minutes.unwrap_or(0).checked_mul(MS_PER_MINUTE))
        .and_then(|(h, m)| h.checked_add(m))
        .ok_or_else(|| EditError::InvalidDuration(text.to_string()))
}
