//! Change tracking.
//!
//! When a schema selects the `diff` feature, every instance records which
//! attributes ended up different from their declared defaults. Two instances
//! of the same schema can also be compared directly with
//! [`Changes::between`].

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::instance::Attributes;
use crate::keys::AttributeMap;
use crate::schema::Schema;

/// One attribute's before and after values. Absent values read as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub from: Value,
    pub to: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Changes {
    differences: IndexMap<String, Change>,
}

impl Changes {
    /// Compares `values` against the schema's declared defaults.
    pub(crate) fn from_defaults(schema: &Schema, values: &AttributeMap) -> Self {
        let defaults: AttributeMap = schema
            .definitions()
            .filter_map(|def| {
                def.options()
                    .default_value()
                    .map(|value| (def.name().to_string(), value.clone()))
            })
            .collect();
        Changes::compute(schema.attribute_names(), &defaults, values)
    }

    /// Compares two instances of the same schema.
    pub fn between(from: &Attributes, to: &Attributes) -> Result<Self> {
        if !Arc::ptr_eq(from.schema(), to.schema()) {
            return Err(Error::SchemaMismatch {
                left: from.schema().name().to_string(),
                right: to.schema().name().to_string(),
            });
        }
        Ok(Changes::compute(
            from.schema().attribute_names(),
            from.attributes(),
            to.attributes(),
        ))
    }

    fn compute<'a>(
        names: impl IntoIterator<Item = &'a str>,
        from: &AttributeMap,
        to: &AttributeMap,
    ) -> Self {
        let mut differences = IndexMap::new();
        for name in names {
            let before = from.get(name).unwrap_or(&Value::Null);
            let after = to.get(name).unwrap_or(&Value::Null);
            if before != after {
                differences.insert(
                    name.to_string(),
                    Change {
                        from: before.clone(),
                        to: after.clone(),
                    },
                );
            }
        }
        Changes { differences }
    }

    /// Whether anything changed.
    pub fn changed(&self) -> bool {
        !self.differences.is_empty()
    }

    pub fn changed_attribute(&self, name: &str) -> bool {
        self.differences.contains_key(name)
    }

    /// Whether `name` changed exactly from `from` to `to`.
    pub fn changed_from_to(&self, name: &str, from: &Value, to: &Value) -> bool {
        self.differences
            .get(name)
            .is_some_and(|change| &change.from == from && &change.to == to)
    }

    pub fn get(&self, name: &str) -> Option<&Change> {
        self.differences.get(name)
    }

    pub fn differences(&self) -> &IndexMap<String, Change> {
        &self.differences
    }

    /// The new values of every changed attribute.
    pub fn changed_values(&self) -> AttributeMap {
        self.differences
            .iter()
            .map(|(name, change)| (name.clone(), change.to.clone()))
            .collect()
    }
}
