//! Generated read accessors.
//!
//! Every attribute name gets exactly one [`Reader`] the first time it is
//! declared on a schema. Re-declaring the name keeps the existing reader, so
//! handles taken early stay valid for the lifetime of the schema.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::instance::Attributes;

/// A read accessor bound to one attribute name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Reader {
    name: Arc<str>,
}

impl Reader {
    pub(crate) fn generate(name: &str) -> Self {
        tracing::trace!(attribute = name, "generated reader");
        Self { name: Arc::from(name) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the attribute from `attrs`.
    ///
    /// Returns `None` when the value was never assigned, or when `attrs`
    /// belongs to a schema that does not declare this attribute.
    pub fn get<'a>(&self, attrs: &'a Attributes) -> Option<&'a Value> {
        attrs.attribute(&self.name)
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reader({})", self.name)
    }
}
