//! Hook for external validation.
//!
//! The crate does not validate values itself. A schema that selects the
//! validations feature runs its registered [`Validator`]s once, right after
//! an instance is constructed, and keeps the collected messages on the
//! instance. Validation failures never abort construction.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::instance::Attributes;

/// External validation logic attached to a schema.
pub trait Validator: Send + Sync {
    fn validate(&self, attrs: &Attributes, errors: &mut ValidationErrors);
}

impl<F> Validator for F
where
    F: Fn(&Attributes, &mut ValidationErrors) + Send + Sync,
{
    fn validate(&self, attrs: &Attributes, errors: &mut ValidationErrors) {
        self(attrs, errors)
    }
}

/// Messages collected per attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    messages: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn on(&self, attribute: &str) -> &[String] {
        self.messages
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().flat_map(|(attribute, messages)| {
            messages
                .iter()
                .map(move |message| (attribute.as_str(), message.as_str()))
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (attribute, message) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{attribute} {message}")?;
            first = false;
        }
        Ok(())
    }
}
