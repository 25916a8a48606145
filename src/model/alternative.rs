//! Per-alternative value storage.

use std::collections::BTreeMap;

use crate::value::Value;

/// One alternative: a named assignment of values to attribute ids.
///
/// Attributes without an entry are treated as [`Value::Unknown`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alternative {
    pub name: String,
    pub description: String,
    values: BTreeMap<String, Value>,
}

impl Alternative {
    pub fn new(name: impl Into<String>) -> Alternative {
        Alternative {
            name: name.into(),
            ..Alternative::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Alternative {
        self.description = description.into();
        self
    }

    /// Assigns a value during construction.
    pub fn with_value(mut self, id: impl Into<String>, value: Value) -> Alternative {
        self.values.insert(id.into(), value);
        self
    }

    /// The value stored under `id`, `Unknown` when absent.
    pub fn get(&self, id: &str) -> Value {
        self.values.get(id).cloned().unwrap_or(Value::Unknown)
    }

    pub fn set(&mut self, id: impl Into<String>, value: Value) {
        self.values.insert(id.into(), value);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Iterates over the stored (id, value) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
