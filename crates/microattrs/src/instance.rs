//! The per-instance attribute store.
//!
//! [`Attributes`] holds the values assigned to one instance of a schema.
//! It is populated once, through [`Attributes::assign_all`], and frozen as
//! soon as that call returns; every later write fails with
//! [`Error::Frozen`]. Keys the schema does not declare are dropped on the
//! way in, so the store only ever contains declared names.
//!
//! ## Reading
//!
//! | Method | Undeclared name | Declared, unassigned |
//! |--------|-----------------|----------------------|
//! | [`attribute`](Attributes::attribute) | `None` | `None` |
//! | [`attribute_with`](Attributes::attribute_with) | `None` | transform of `null` |
//! | [`select`](Attributes::select) | omitted | `null` |
//! | [`require`](Attributes::require) | `Err(UndefinedAttribute)` | `null` |

use std::sync::Arc;

use serde_json::Value;

use crate::diff::Changes;
use crate::error::{Error, Result};
use crate::keys::{with_string_keys, AttributeMap, IntoAttributeMap};
use crate::schema::Schema;
use crate::validation::ValidationErrors;

static NULL: Value = Value::Null;

#[derive(Debug, Clone)]
pub struct Attributes {
    schema: Arc<Schema>,
    values: AttributeMap,
    frozen: bool,
    pub(crate) changes: Option<Changes>,
    pub(crate) errors: Option<ValidationErrors>,
}

impl Attributes {
    pub(crate) fn empty(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            values: AttributeMap::new(),
            frozen: false,
            changes: None,
            errors: None,
        }
    }

    /// Assigns `input` as-is, without defaults or strictness, and freezes.
    ///
    /// This works for every schema, including ones that selected no
    /// initialization feature.
    pub fn assign(schema: &Arc<Schema>, input: impl IntoAttributeMap) -> Result<Self> {
        let mut attrs = Attributes::empty(Arc::clone(schema));
        attrs.assign_all(input)?;
        Ok(attrs)
    }

    /// Stores every declared entry of `input`, drops the rest, then freezes.
    pub fn assign_all(&mut self, input: impl IntoAttributeMap) -> Result<()> {
        if self.frozen {
            return Err(Error::Frozen(self.schema.name().to_string()));
        }

        for (name, value) in with_string_keys(input)? {
            if self.schema.has_attribute(&name) {
                self.values.insert(name, value);
            } else {
                tracing::trace!(
                    schema = self.schema.name(),
                    attribute = %name,
                    "dropped undeclared attribute"
                );
            }
        }

        self.frozen = true;
        tracing::debug!(
            schema = self.schema.name(),
            assigned = self.values.len(),
            "assigned attributes"
        );
        Ok(())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn has_attribute(&self, name: impl AsRef<str>) -> bool {
        self.schema.has_attribute(name)
    }

    /// The value of a declared attribute, if one was assigned.
    pub fn attribute(&self, name: impl AsRef<str>) -> Option<&Value> {
        let name = name.as_ref();
        if !self.schema.has_attribute(name) {
            return None;
        }
        self.values.get(name)
    }

    /// Passes a declared attribute's value (or `null`) through `transform`.
    pub fn attribute_with<T>(
        &self,
        name: impl AsRef<str>,
        transform: impl FnOnce(&Value) -> T,
    ) -> Option<T> {
        let name = name.as_ref();
        if !self.schema.has_attribute(name) {
            return None;
        }
        Some(transform(self.values.get(name).unwrap_or(&NULL)))
    }

    /// Every assigned attribute.
    pub fn attributes(&self) -> &AttributeMap {
        &self.values
    }

    /// The requested declared attributes. Undeclared names are skipped.
    pub fn select<I>(&self, names: I) -> AttributeMap
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut selected = AttributeMap::new();
        for name in names {
            let name: &str = name.as_ref();
            if self.schema.has_attribute(name) {
                let value = self.values.get(name).unwrap_or(&NULL).clone();
                selected.insert(name.to_string(), value);
            }
        }
        selected
    }

    /// The value of a declared attribute, `null` when unassigned.
    ///
    /// Fails with [`Error::UndefinedAttribute`] for a name the schema does
    /// not declare.
    pub fn require(&self, name: impl AsRef<str>) -> Result<&Value> {
        let name = name.as_ref();
        if !self.schema.has_attribute(name) {
            return Err(Error::UndefinedAttribute(name.to_string()));
        }
        Ok(self.values.get(name).unwrap_or(&NULL))
    }

    /// Like [`require`](Self::require), passing the value through
    /// `transform`. The transform is not called for undeclared names.
    pub fn require_with<T>(
        &self,
        name: impl AsRef<str>,
        transform: impl FnOnce(&Value) -> T,
    ) -> Result<T> {
        self.require(name).map(transform)
    }

    /// Changes against declared defaults, when the schema tracks them.
    pub fn changes(&self) -> Option<&Changes> {
        self.changes.as_ref()
    }

    /// What differs between this instance and `other`.
    pub fn diff(&self, other: &Attributes) -> Result<Changes> {
        Changes::between(self, other)
    }

    /// Validation messages, when the schema runs validators.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    /// False only when validators ran and reported something.
    pub fn is_valid(&self) -> bool {
        self.errors.as_ref().is_none_or(ValidationErrors::is_empty)
    }
}
