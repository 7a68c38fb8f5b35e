// src/extract.rs
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use crate::errors::{AnalyzeError, Result};

/// Greedy: spans from the first `{` to the last `}` in the text.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("JSON object pattern is valid"));

/// Pulls the first brace-delimited block out of free-form model output and parses it.
///
/// Models like to wrap their answer in prose or code fences, so the block is
/// located before parsing. Because the match is greedy, trailing prose that
/// contains a stray `}` makes the candidate invalid JSON.
pub fn extract_first_json_object(text: &str) -> Result<Value> {
    let candidate = JSON_OBJECT
        .find(text)
        .ok_or(AnalyzeError::NoJsonFound)?;

    serde_json::from_str(candidate.as_str()).map_err(AnalyzeError::InvalidJson)
}
