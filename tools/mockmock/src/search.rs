//! Greedy deep search over recorded entries.
//!
//! Each [`Matcher`] is a search term. An entry matches when every term is
//! consumed by a distinct primitive somewhere inside its `mock` object.
//! Terms are consumed in a single depth-first pass without backtracking, so
//! overlapping terms can miss an assignment that a full bipartite matching
//! would find.

use crate::errors::MockmockError;
use crate::matcher::Matcher;
use crate::replay::fixture::{Mock, MockFixture};
use crate::types::MockKind;
use serde_json::Value;

/// A matching entry and where it lives in the fixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub context: &'a str,
    pub kind: MockKind,
    pub id: &'a str,
    pub index: usize,
    pub mock: &'a Mock,
}

/// First entry, in context/kind/id/list order, that satisfies every term.
pub fn search<'a>(
    terms: &[Matcher],
    fixture: &'a MockFixture,
    kinds: &[MockKind],
    contexts: &[String],
) -> Result<SearchHit<'a>, MockmockError> {
    for context_id in contexts {
        let Some((context, groups)) = fixture.get_key_value(context_id.as_str()) else {
            continue;
        };
        for &kind in kinds {
            for (id, mocks) in groups.get(kind) {
                for (index, mock) in mocks.iter().enumerate() {
                    if entry_matches(terms, mock) {
                        return Ok(SearchHit {
                            context,
                            kind,
                            id,
                            index,
                            mock,
                        });
                    }
                }
            }
        }
    }

    Err(MockmockError::NotFound(format!(
        "no entry satisfies all {} search term(s) in context(s) [{}] for kind(s) [{}]",
        terms.len(),
        contexts.join(", "),
        kinds
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

/// True when every term is consumed by a distinct primitive of `mock`.
pub fn entry_matches(terms: &[Matcher], mock: &Mock) -> bool {
    let mut remaining: Vec<&Matcher> = terms.iter().collect();
    if remaining.is_empty() {
        return true;
    }
    for (key, value) in &mock.mock {
        if consume(&mut remaining, value, Some(key.as_str())) {
            return true;
        }
    }
    false
}

// Returns true once `remaining` is empty.
fn consume(remaining: &mut Vec<&Matcher>, value: &Value, key: Option<&str>) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .any(|(child_key, child)| consume(remaining, child, Some(child_key.as_str()))),
        Value::Array(items) => items.iter().any(|item| consume(remaining, item, None)),
        primitive => {
            if let Some(pos) = remaining.iter().position(|term| term.matches(primitive, key)) {
                remaining.remove(pos);
            }
            remaining.is_empty()
        }
    }
}
