//! Per-attribute option metadata.
//!
//! Options are opaque to the registry: it stores them but never looks
//! inside. The initialization strategies read the `default` key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{kind_of, Error, Result};

/// The option key holding an attribute's default value.
pub const DEFAULT_KEY: &str = "default";

/// Option metadata attached to a declared attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying only a default value.
    pub fn with_default(value: impl Into<Value>) -> Self {
        Self::new().set(DEFAULT_KEY, value)
    }

    /// Builder-style insert.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The declared default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.0.get(DEFAULT_KEY)
    }

    pub fn has_default(&self) -> bool {
        self.0.contains_key(DEFAULT_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses options from a JSON value, which must be an object.
    pub fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Options(map)),
            Value::Null => Ok(Options::new()),
            other => {
                tracing::debug!(attribute = name, found = kind_of(&other), "rejected options");
                Err(Error::InvalidOptions {
                    name: name.to_string(),
                })
            }
        }
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Options(map)
    }
}

impl From<Options> for Value {
    fn from(options: Options) -> Self {
        Value::Object(options.0)
    }
}
