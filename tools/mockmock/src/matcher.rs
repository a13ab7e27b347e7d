//! Declarative predicates over a primitive value and the key it sits under.
//!
//! Every facet left unset is a wildcard. Search consumes plain [`Matcher`]s
//! as terms; stubbing pairs a matcher with a replacement in [`StubMatcher`].

use crate::classify::{classify, TypeTag};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Matcher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<TypeTag>>,
}

impl Matcher {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::any().with_keys(keys)
    }

    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::any().with_values(values)
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = TypeTag>,
    {
        self.types = Some(types.into_iter().collect());
        self
    }

    /// Conjunction of the type, key and value facets.
    ///
    /// A missing `key` satisfies the key facet, so value/type matchers also
    /// apply to bare array elements.
    pub fn matches(&self, value: &Value, key: Option<&str>) -> bool {
        self.matches_type(value) && self.matches_key(key) && self.matches_value(value)
    }

    fn matches_type(&self, value: &Value) -> bool {
        match &self.types {
            None => true,
            Some(types) => types.contains(&classify(value)),
        }
    }

    fn matches_key(&self, key: Option<&str>) -> bool {
        match (&self.keys, key) {
            (None, _) | (_, None) => true,
            (Some(keys), Some(key)) => keys.iter().any(|candidate| candidate == key),
        }
    }

    fn matches_value(&self, value: &Value) -> bool {
        match &self.values {
            None => true,
            Some(values) => values.iter().any(|candidate| primitive_eq(candidate, value)),
        }
    }
}

/// A matcher plus the primitive that replaces whatever it accepts.
///
/// Reads as one flat object, `{"stub": .., "keys": .., "values": .., "types": ..}`.
/// Unknown members are rejected like they are for [`Matcher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStubMatcher")]
pub struct StubMatcher {
    #[serde(rename = "stub")]
    pub replacement: Value,
    #[serde(flatten)]
    pub matcher: Matcher,
}

impl StubMatcher {
    pub fn new(replacement: impl Into<Value>, matcher: Matcher) -> Self {
        Self {
            replacement: replacement.into(),
            matcher,
        }
    }

    pub fn matches(&self, value: &Value, key: Option<&str>) -> bool {
        self.matcher.matches(value, key)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStubMatcher {
    #[serde(rename = "stub", alias = "replacement")]
    replacement: Value,
    #[serde(default)]
    keys: Option<Vec<String>>,
    #[serde(default)]
    values: Option<Vec<Value>>,
    #[serde(default)]
    types: Option<Vec<TypeTag>>,
}

impl From<RawStubMatcher> for StubMatcher {
    fn from(raw: RawStubMatcher) -> Self {
        Self {
            replacement: raw.replacement,
            matcher: Matcher {
                keys: raw.keys,
                values: raw.values,
                types: raw.types,
            },
        }
    }
}

/// Exact equality, except numbers compare by their `f64` reading.
pub fn primitive_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if a == b {
                return true;
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        _ => left == right,
    }
}
