use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;

lazy_static! {
    // Older rows stored mentions like <@123> or <@!123> instead of bare identifiers
    static ref USER_ID_REGEX: Regex =
        Regex::new(r"^(?:<@!?(?P<mention>[0-9]+)>|(?P<plain>[0-9]+))$").unwrap();
}

// Serializes the identifiers as a JSON array of strings.
pub fn encode_ids(ids: &[u64]) -> Result<String> {
    let values = ids.iter().map(|id| id.to_string()).collect::<Vec<String>>();
    Ok(serde_json::to_string(&values)?)
}

// Reads a list of user identifiers. Accepts a JSON array of strings or numbers and
// falls back to a loosely formatted list for the legacy rows. Tokens that are
// not user references are skipped.
pub fn decode_ids(raw: &str) -> Vec<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return vec![];
    }

    let tokens = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(values) => values
            .into_iter()
            .map(|value| match value {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect::<Vec<String>>(),
        Err(_) => raw
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(|token| token.trim_matches(|c| c == '"' || c == '\'').to_string())
            .filter(|token| !token.is_empty())
            .collect(),
    };

    tokens
        .iter()
        .filter_map(|token| {
            let user_id = parse_user_id(token);
            if user_id.is_none() {
                warn!("Skipped the malformed user reference: {}", token);
            }
            user_id
        })
        .collect()
}

pub fn parse_user_id(token: &str) -> Option<u64> {
    let captures = USER_ID_REGEX.captures(token.trim())?;
    captures
        .name("mention")
        .or_else(|| captures.name("plain"))
        .and_then(|id| id.as_str().parse::<u64>().ok())
}
