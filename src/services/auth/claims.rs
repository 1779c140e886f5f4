//! Decoded JWT claim set.
//!
//! Claims are kept as a JSON object so the configured roles/scope claim names
//! can be looked up at request time and the full payload can be handed to
//! downstream handlers unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// `sub`, if present and a non-empty string. Whitespace is not trimmed.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `aud` as a list. A token may carry a single string or an array of strings;
    /// anything else yields an empty list.
    pub fn audiences(&self) -> Vec<&str> {
        string_set(self.get("aud"))
    }

    /// Values of the given claim interpreted as a set of strings.
    ///
    /// Absent claim => empty set. A bare string counts as a single entry.
    pub fn string_set(&self, name: &str) -> Vec<&str> {
        string_set(self.get(name))
    }

    /// Value of the given claim when it is a string.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

fn string_set(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(arr)) => arr.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}
