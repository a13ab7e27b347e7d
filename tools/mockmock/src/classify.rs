//! Type tags for matcher `types` facets.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Null,
    /// An absent slot. JSON documents never produce it.
    Undefined,
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    pub fn is_structured(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Null => TypeTag::Null,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Number(_) => TypeTag::Number,
        Value::String(_) => TypeTag::String,
        Value::Array(_) => TypeTag::Array,
        Value::Object(_) => TypeTag::Object,
    }
}

pub fn classify_slot(value: Option<&Value>) -> TypeTag {
    value.map_or(TypeTag::Undefined, classify)
}

pub fn is_structured(value: &Value) -> bool {
    classify(value).is_structured()
}
