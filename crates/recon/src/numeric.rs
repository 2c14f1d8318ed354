//! Loose numeric coercion and the reductions used at finalization.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ROBUX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*robux").unwrap());

/// Coerce a JSON value to an integer when it is numeric-coercible.
///
/// Numbers round ties-to-even, booleans map to 0/1, strings are parsed after
/// stripping whitespace and thousands separators and then truncated.
/// Null, unparsable strings, arrays and objects yield `None`.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.round_ties_even() as i64)
            }
        }
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Like [`coerce_int`] but never fails: anything non-coercible is 0.
pub fn to_int_loose(value: &Value) -> i64 {
    coerce_int(value).unwrap_or(0)
}

/// Strict variant used for gamepasses: only JSON numbers count.
pub fn numeric_only(value: &Value) -> Option<i64> {
    match value {
        Value::Number(_) => coerce_int(value),
        _ => None,
    }
}

/// Rounded arithmetic mean; 0 for an empty set.
pub fn mean_rounded(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let sum: i128 = values.iter().map(|v| i128::from(*v)).sum();
    let mean = sum as f64 / values.len() as f64;
    mean.round_ties_even() as i64
}

/// Most frequent non-empty value, ties broken by first occurrence.
pub fn most_frequent_nonempty(values: &[String]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().filter(|v| !v.is_empty()) {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }
    let Some(max) = counts.values().copied().max() else {
        return String::new();
    };
    values
        .iter()
        .find(|v| counts.get(v.as_str()) == Some(&max))
        .cloned()
        .unwrap_or_default()
}

/// First `<digits> robux` amount mentioned in free text.
pub fn robux_from_text(text: &str) -> Option<i64> {
    ROBUX_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn mentions_trading(text: &str) -> bool {
    text.to_lowercase().contains("trading")
}
