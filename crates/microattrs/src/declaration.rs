//! Bulk declaration arguments.
//!
//! A bulk declaration can be a single name, a list of names, a mapping of
//! names to options, or any nesting of those. [`Declaration::flatten`]
//! reduces it to the ordered `(name, options)` entries the registry applies.

use serde_json::Value;

use crate::error::Result;
use crate::options::Options;

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// A bare attribute name with empty options.
    Name(String),
    /// A nested group of declarations.
    List(Vec<Declaration>),
    /// Names paired with their options.
    Map(Vec<(String, Options)>),
}

impl Declaration {
    pub fn name(name: impl ToString) -> Self {
        Declaration::Name(name.to_string())
    }

    pub fn with_options(name: impl ToString, options: Options) -> Self {
        Declaration::Map(vec![(name.to_string(), options)])
    }

    /// Ordered `(name, options)` entries, depth first.
    pub fn flatten(self) -> Vec<(String, Options)> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<(String, Options)>) {
        match self {
            Declaration::Name(name) => out.push((name, Options::new())),
            Declaration::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            Declaration::Map(entries) => out.extend(entries),
        }
    }

    /// Parses a JSON description: strings are names, arrays nest, objects map
    /// names to options. Other scalars are stringified into names.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(match value {
            Value::Null => Declaration::List(Vec::new()),
            Value::String(name) => Declaration::Name(name),
            Value::Array(items) => Declaration::List(
                items
                    .into_iter()
                    .map(Declaration::from_value)
                    .collect::<Result<_>>()?,
            ),
            Value::Object(map) => Declaration::Map(
                map.into_iter()
                    .map(|(name, options)| {
                        let options = Options::from_value(&name, options)?;
                        Ok((name, options))
                    })
                    .collect::<Result<_>>()?,
            ),
            other => Declaration::Name(other.to_string()),
        })
    }
}

impl From<&str> for Declaration {
    fn from(name: &str) -> Self {
        Declaration::Name(name.to_string())
    }
}

impl From<String> for Declaration {
    fn from(name: String) -> Self {
        Declaration::Name(name)
    }
}

impl From<&String> for Declaration {
    fn from(name: &String) -> Self {
        Declaration::Name(name.clone())
    }
}

impl<N: ToString> From<(N, Options)> for Declaration {
    fn from((name, options): (N, Options)) -> Self {
        Declaration::with_options(name, options)
    }
}

impl<D: Into<Declaration>> From<Vec<D>> for Declaration {
    fn from(items: Vec<D>) -> Self {
        Declaration::List(items.into_iter().map(Into::into).collect())
    }
}

impl<D: Into<Declaration>, const N: usize> From<[D; N]> for Declaration {
    fn from(items: [D; N]) -> Self {
        Declaration::List(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for Declaration {
    type Error = crate::error::Error;

    fn try_from(value: Value) -> Result<Self> {
        Declaration::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn names(decl: Declaration) -> Vec<String> {
        decl.flatten().into_iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn nested_lists_flatten_in_order() {
        let decl = Declaration::from(vec![
            Declaration::from("a"),
            Declaration::from(vec!["b", "c"]),
            Declaration::from(("d", Options::with_default(1))),
        ]);
        assert_eq!(names(decl), ["a", "b", "c", "d"]);
    }

    #[test]
    fn mapping_entries_keep_their_options() {
        let decl = Declaration::from_value(json!({"a": {"default": 1}, "b": null})).unwrap();
        let entries = decl.flatten();
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[0].1.default_value(), Some(&json!(1)));
        assert_eq!(entries[1].0, "b");
        assert!(entries[1].1.is_empty());
    }

    #[test]
    fn mixed_json_arrays_are_accepted() {
        let decl = Declaration::from_value(json!(["a", ["b", {"c": {}}], 7])).unwrap();
        assert_eq!(names(decl), ["a", "b", "c", "7"]);
    }

    #[test]
    fn scalar_options_are_rejected() {
        let err = Declaration::from_value(json!({"a": 1})).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { name } if name == "a"));
    }
}
