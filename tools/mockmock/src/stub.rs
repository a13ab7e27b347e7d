//! Deep stubbing (redaction) of structured values.
//!
//! The result is always a freshly built copy with the same shape as the
//! input. Primitives are replaced by two different policies depending on
//! where they sit:
//!
//! - bare array elements use [`first_match_wins`]: the first accepting
//!   matcher supplies the replacement;
//! - keyed object members use [`last_match_wins`]: every accepting matcher
//!   overwrites the slot in order, so the last one sticks.

use crate::matcher::StubMatcher;
use serde_json::{Map, Value};

pub fn stub(matchers: &[StubMatcher], source: &Value) -> Value {
    match source {
        Value::Array(items) => Value::Array(stub_array(matchers, items)),
        Value::Object(map) => Value::Object(stub_object(matchers, map)),
        primitive => first_match_wins(matchers, primitive),
    }
}

fn stub_array(matchers: &[StubMatcher], items: &[Value]) -> Vec<Value> {
    items
        .iter()
        .map(|item| match item {
            Value::Array(_) | Value::Object(_) => stub(matchers, item),
            primitive => first_match_wins(matchers, primitive),
        })
        .collect()
}

fn stub_object(matchers: &[StubMatcher], map: &Map<String, Value>) -> Map<String, Value> {
    let mut copy = Map::new();
    for (key, value) in map {
        let stubbed = match value {
            Value::Array(_) | Value::Object(_) => stub(matchers, value),
            primitive => last_match_wins(matchers, primitive, key),
        };
        copy.insert(key.clone(), stubbed);
    }
    copy
}

/// Replacement from the first matcher that accepts the bare value.
pub fn first_match_wins(matchers: &[StubMatcher], value: &Value) -> Value {
    matchers
        .iter()
        .find(|matcher| matcher.matches(value, None))
        .map_or_else(|| value.clone(), |matcher| matcher.replacement.clone())
}

/// Sequential overwrite: every matcher accepting `(value, key)` replaces the
/// slot. Each matcher is tested against the original value.
pub fn last_match_wins(matchers: &[StubMatcher], value: &Value, key: &str) -> Value {
    let mut slot = value.clone();
    for matcher in matchers {
        if matcher.matches(value, Some(key)) {
            slot = matcher.replacement.clone();
        }
    }
    slot
}
