use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// An opaque scope value a right can be restricted to.
///
/// Scopes are compared for equality only; the engine never interprets them.
/// Strings are the common case (e.g. a project id), but any
/// JSON-representable value works, which keeps scopes persistable alongside
/// the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(JsonValue);

impl Scope {
    pub fn new(value: impl Into<JsonValue>) -> Self {
        Self(value.into())
    }

    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }

    /// The scope as a string slice, if it is a plain string value.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Self(JsonValue::from(value))
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Self(JsonValue::from(value))
    }
}

impl From<JsonValue> for Scope {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0.as_str() {
            Some(s) => f.write_str(s),
            None => write!(f, "{}", self.0),
        }
    }
}
