//! Key normalization for attribute input.
//!
//! Every mapping that reaches an instance or a registry goes through
//! [`with_string_keys`] first, so the rest of the crate only ever deals with
//! `String` keys. Entry order is kept; when two input keys stringify to the
//! same name the later entry wins, in the position of the first.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{kind_of, Error, Result};

/// A mapping from attribute name to value.
pub type AttributeMap = Map<String, Value>;

/// Anything that can be turned into an [`AttributeMap`].
pub trait IntoAttributeMap {
    fn into_attribute_map(self) -> Result<AttributeMap>;
}

/// Converts any mapping-like input into a map with string keys.
///
/// ```
/// use microattrs::keys::with_string_keys;
/// use serde_json::json;
///
/// let map = with_string_keys(vec![(1, json!("one")), (2, json!("two"))]).unwrap();
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["1", "2"]);
///
/// assert!(with_string_keys(json!([1, 2])).is_err());
/// ```
pub fn with_string_keys(input: impl IntoAttributeMap) -> Result<AttributeMap> {
    input.into_attribute_map()
}

fn collect<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> AttributeMap
where
    K: ToString,
    V: Into<Value>,
{
    let mut map = AttributeMap::new();
    for (key, value) in entries {
        map.insert(key.to_string(), value.into());
    }
    map
}

impl IntoAttributeMap for AttributeMap {
    fn into_attribute_map(self) -> Result<AttributeMap> {
        Ok(self)
    }
}

impl IntoAttributeMap for &AttributeMap {
    fn into_attribute_map(self) -> Result<AttributeMap> {
        Ok(self.clone())
    }
}

impl IntoAttributeMap for Value {
    fn into_attribute_map(self) -> Result<AttributeMap> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(Error::NotAMapping {
                found: kind_of(&other),
            }),
        }
    }
}

impl IntoAttributeMap for &Value {
    fn into_attribute_map(self) -> Result<AttributeMap> {
        self.clone().into_attribute_map()
    }
}

impl<K, V, S> IntoAttributeMap for HashMap<K, V, S>
where
    K: ToString + Eq + Hash,
    V: Into<Value>,
{
    fn into_attribute_map(self) -> Result<AttributeMap> {
        Ok(collect(self))
    }
}

impl<K, V> IntoAttributeMap for BTreeMap<K, V>
where
    K: ToString + Ord,
    V: Into<Value>,
{
    fn into_attribute_map(self) -> Result<AttributeMap> {
        Ok(collect(self))
    }
}

impl<K, V, S> IntoAttributeMap for IndexMap<K, V, S>
where
    K: ToString + Eq + Hash,
    V: Into<Value>,
{
    fn into_attribute_map(self) -> Result<AttributeMap> {
        Ok(collect(self))
    }
}

impl<K, V> IntoAttributeMap for Vec<(K, V)>
where
    K: ToString,
    V: Into<Value>,
{
    fn into_attribute_map(self) -> Result<AttributeMap> {
        Ok(collect(self))
    }
}

impl<K, V, const N: usize> IntoAttributeMap for [(K, V); N]
where
    K: ToString,
    V: Into<Value>,
{
    fn into_attribute_map(self) -> Result<AttributeMap> {
        Ok(collect(self))
    }
}
