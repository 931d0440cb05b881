//! The per-schema attribute registry.
//!
//! Names and their options live in one ordered map, so the set of declared
//! names and the options table can never drift apart. The registry only
//! grows: there is no way to remove a declaration.
//!
//! ## Overwrite Rule
//!
//! [`Registry::declare`] takes a `can_overwrite` flag. Without it, the first
//! declaration of a name wins and later ones only keep the reader alive.
//! With it, the new options replace the stored ones. Which callers get the
//! flag is decided by the schema builders: only derived schemas do.

use indexmap::IndexMap;
use serde_json::Value;

use crate::accessor::Reader;
use crate::keys::AttributeMap;
use crate::options::Options;

/// A declared attribute: its name, options, and generated reader.
#[derive(Debug, Clone)]
pub struct AttributeDefinition {
    name: String,
    options: Options,
    reader: Reader,
}

impl AttributeDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn reader(&self) -> &Reader {
        &self.reader
    }
}

/// What a single declaration did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declared {
    /// The name was new.
    Added,
    /// The name existed and its options were replaced.
    Overwritten,
    /// The name existed and its options were kept.
    Kept,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, AttributeDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(
        &mut self,
        name: impl ToString,
        options: Options,
        can_overwrite: bool,
    ) -> Declared {
        let name = name.to_string();

        if let Some(existing) = self.entries.get_mut(&name) {
            if can_overwrite {
                existing.options = options;
                return Declared::Overwritten;
            }
            return Declared::Kept;
        }

        let reader = Reader::generate(&name);
        self.entries.insert(
            name.clone(),
            AttributeDefinition {
                name,
                options,
                reader,
            },
        );
        Declared::Added
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered copy of every name with its options.
    pub fn snapshot(&self) -> Vec<(String, Options)> {
        self.entries
            .values()
            .map(|def| (def.name.clone(), def.options.clone()))
            .collect()
    }

    /// The registry's options laid over `seed`.
    ///
    /// Keys of `seed` that are also declared names are replaced by the
    /// registry's stored options; other seed keys are kept as they are.
    pub fn effective_options(&self, seed: AttributeMap) -> AttributeMap {
        let mut merged = seed;
        for def in self.entries.values() {
            merged.insert(def.name.clone(), Value::from(def.options.clone()));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_declaration_wins_without_overwrite() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.declare("a", Options::with_default(1), false),
            Declared::Added
        );
        assert_eq!(
            registry.declare("a", Options::with_default(2), false),
            Declared::Kept
        );
        let def = registry.get("a").unwrap();
        assert_eq!(def.options().default_value(), Some(&json!(1)));
    }

    #[test]
    fn overwrite_replaces_options() {
        let mut registry = Registry::new();
        registry.declare("a", Options::with_default(1), false);
        assert_eq!(
            registry.declare("a", Options::with_default(2), true),
            Declared::Overwritten
        );
        assert_eq!(
            registry.get("a").unwrap().options().default_value(),
            Some(&json!(2))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn redeclaring_keeps_the_reader() {
        let mut registry = Registry::new();
        registry.declare("a", Options::new(), false);
        let before = registry.get("a").unwrap().reader().clone();
        registry.declare("a", Options::with_default(1), true);
        assert_eq!(registry.get("a").unwrap().reader(), &before);
    }

    #[test]
    fn names_are_string_converted() {
        let mut registry = Registry::new();
        registry.declare(42, Options::new(), false);
        assert!(registry.contains("42"));
    }

    #[test]
    fn names_keep_declaration_order() {
        let mut registry = Registry::new();
        for name in ["c", "a", "b", "a"] {
            registry.declare(name, Options::new(), false);
        }
        assert_eq!(registry.names().collect::<Vec<_>>(), ["c", "a", "b"]);
    }

    #[test]
    fn effective_options_override_colliding_seed_keys() {
        let mut registry = Registry::new();
        registry.declare("a", Options::with_default(1), false);

        let mut seed = AttributeMap::new();
        seed.insert("a".into(), json!("raw"));
        seed.insert("extra".into(), json!(true));

        let merged = registry.effective_options(seed);
        assert_eq!(merged.get("a"), Some(&json!({"default": 1})));
        assert_eq!(merged.get("extra"), Some(&json!(true)));
    }

    #[test]
    fn effective_options_of_empty_seed_is_the_table() {
        let mut registry = Registry::new();
        registry.declare("a", Options::new(), false);
        registry.declare("b", Options::with_default("x"), false);
        let merged = registry.effective_options(AttributeMap::new());
        assert_eq!(merged, *json!({"a": {}, "b": {"default": "x"}}).as_object().unwrap());
    }
}
