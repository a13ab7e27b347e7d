//! Serializable fixture document types.
//!
//! A fixture is one JSON document: context name -> `{data, sync, async}` ->
//! id -> ordered list of `{ "mock": {..} }` entries.

use crate::errors::MockmockError;
use crate::types::{KindMap, MockKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const FIXTURE_EXTENSION: &str = ".fixture.json";

// ── Mock ──────────────────────────────────────────────────────────────────────

/// One recorded data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mock {
    pub mock: Map<String, Value>,
}

impl Mock {
    pub fn new(mock: Map<String, Value>) -> Self {
        Self { mock }
    }

    /// Wrap a JSON value; only objects can be recorded.
    pub fn from_value(value: Value) -> Result<Self, MockmockError> {
        match value {
            Value::Object(mock) => Ok(Self { mock }),
            other => Err(MockmockError::InvalidInput(format!(
                "expected a JSON object, got {}",
                crate::classify::classify(&other).as_str()
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.mock.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.mock.clone())
    }
}

// ── Fixture shape ─────────────────────────────────────────────────────────────

/// Id -> recorded entries, in recording order.
pub type MockGroup = BTreeMap<String, Vec<Mock>>;

/// All three kinds of recordings for one context.
pub type MockContext = KindMap<MockGroup>;

/// Context name -> [`MockContext`].
pub type MockFixture = BTreeMap<String, MockContext>;

/// The entry list for `(context, kind, id)`, if recorded.
pub fn entries_for<'a>(
    fixture: &'a MockFixture,
    context: &str,
    kind: MockKind,
    id: &str,
) -> Option<&'a [Mock]> {
    fixture
        .get(context)
        .and_then(|ctx| ctx.get(kind).get(id))
        .map(Vec::as_slice)
}

/// Parse and validate a fixture document. `origin` names the source in errors.
pub fn parse_fixture(text: &str, origin: &str) -> Result<MockFixture, MockmockError> {
    serde_json::from_str::<MockFixture>(text).map_err(|e| {
        MockmockError::InvalidFixture(format!(
            "{origin}: {e} (expected context -> {{data, sync, async}} -> id -> [{{\"mock\": {{..}}}}])"
        ))
    })
}

pub fn render_fixture(fixture: &MockFixture) -> Result<String, MockmockError> {
    serde_json::to_string_pretty(fixture).map_err(|e| MockmockError::Io(e.to_string()))
}

pub fn fixture_file_name(name: &str) -> String {
    format!("{name}{FIXTURE_EXTENSION}")
}
