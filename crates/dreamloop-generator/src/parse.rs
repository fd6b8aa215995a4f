//! Defensive decoding of the model's free-text reply.
//!
//! Decoding never fails. Text that yields no usable object becomes an empty
//! result with default category and theme; callers treat empty `lines` as a
//! generation failure.

use std::sync::LazyLock;

use dreamloop_core::{Category, DEFAULT_VISUAL_THEME};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Number of lines a daily card carries.
pub const LINES_PER_CARD: usize = 2;

static GREEDY_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex"));

/// Structured result of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedContent {
    /// Exactly two trimmed lines, or empty when the reply was unusable.
    pub lines: Vec<String>,
    pub category: Category,
    pub visual_theme: String,
}

impl GeneratedContent {
    #[must_use]
    pub fn has_lines(&self) -> bool {
        self.lines.len() == LINES_PER_CARD
    }
}

/// Decode an untrusted model reply into [`GeneratedContent`].
///
/// Tries, in order: the whole text as a JSON object, each balanced `{...}`
/// region from left to right, and the span from the first `{` to the last `}`.
#[must_use]
pub fn decode_generation(text: &str) -> GeneratedContent {
    let object = extract_object(text).unwrap_or_else(|| {
        tracing::warn!(len = text.len(), "model reply contained no JSON object");
        Map::new()
    });

    GeneratedContent {
        lines: coerce_lines(object.get("lines")),
        category: Category::coerce(&value_text(object.get("category"))),
        visual_theme: coerce_visual_theme(object.get("visual_theme")),
    }
}

fn extract_object(text: &str) -> Option<Map<String, Value>> {
    parse_object(text)
        .or_else(|| {
            text.match_indices('{')
                .filter_map(|(start, _)| balanced_object_at(text, start))
                .find_map(parse_object)
        })
        .or_else(|| GREEDY_OBJECT.find(text).and_then(|m| parse_object(m.as_str())))
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Return the slice from the `{` at `start` up to its matching `}`.
///
/// Braces inside JSON string literals are ignored.
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

fn coerce_lines(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let strings: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
    let Some(strings) = strings else {
        return Vec::new();
    };

    let lines: Vec<String> = strings
        .into_iter()
        .take(LINES_PER_CARD)
        .map(|s| s.trim().to_string())
        .collect();

    if lines.len() == LINES_PER_CARD && lines.iter().all(|l| !l.is_empty()) {
        lines
    } else {
        Vec::new()
    }
}

/// Render a JSON value as text: strings verbatim, absent/null as empty,
/// anything else as its JSON encoding.
fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn coerce_visual_theme(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => DEFAULT_VISUAL_THEME.to_string(),
        other => value_text(other),
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
