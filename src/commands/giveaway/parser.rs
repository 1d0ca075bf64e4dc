use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

pub const INVALID_DURATION_MESSAGE: &str = "Please enter a valid duration (e.g. '10 minutes')";

const SECOND: u64 = 1;
const MINUTE: u64 = 60;
const HOUR: u64 = 3600;
const DAY: u64 = 86400;

// Checked in this order against the end of the whole input.
const UNITS: [(&[&str], u64); 4] = [
    (&["sec", "second", "seconds"], SECOND),
    (&["mn", "min", "minute", "minutes"], MINUTE),
    (&["h", "hour", "hours"], HOUR),
    (&["d", "day", "days"], DAY),
];

lazy_static! {
    static ref AMOUNT_REGEX: Regex = Regex::new(r"^(?P<amount>[0-9]+)(?:\s|$)").unwrap();
}

// Converts a free-text duration like "10 minutes" or "2 d" into seconds.
pub fn parse_duration(text: &str) -> Result<u64> {
    let lowered = text.trim().to_lowercase();
    let invalid = || Error::Validation(INVALID_DURATION_MESSAGE.to_string());

    let amount = AMOUNT_REGEX
        .captures(&lowered)
        .and_then(|captures| captures.name("amount"))
        .and_then(|amount| amount.as_str().parse::<u64>().ok())
        .ok_or_else(invalid)?;

    let multiplier = UNITS
        .iter()
        .find(|(suffixes, _)| suffixes.iter().any(|suffix| lowered.ends_with(suffix)))
        .map(|(_, multiplier)| *multiplier)
        .ok_or_else(invalid)?;

    amount.checked_mul(multiplier).ok_or_else(invalid)
}

// Human readable form of the duration, using the largest unit that fits.
pub fn humanize_duration(seconds: u64) -> String {
    if seconds < MINUTE {
        format!("{} seconds", seconds)
    } else if seconds < HOUR {
        format!("{} minutes", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{} hours", seconds / HOUR)
    } else {
        format!("{} days", seconds / DAY)
    }
}
