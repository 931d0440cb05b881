//! # Schemas
//!
//! A [`Schema`] is the frozen attribute registry of one "class": its declared
//! attribute names, their options, the selected features, and any
//! validators. Schemas are assembled with a [`SchemaBuilder`] and shared as
//! `Arc<Schema>`.
//!
//! ## Inheritance
//!
//! Subclassing copies, it never links. [`Schema::subclass`] (or
//! [`SchemaBuilder::subclass`] while the parent is still being declared)
//! takes the parent's effective options at that moment, re-declares them on
//! a fresh registry and returns a `SchemaBuilder<Derived>`. Whatever happens
//! to the parent afterwards does not reach the child, and two children of
//! the same parent never share state.
//!
//! ## Overwriting
//!
//! On a base builder, declaring a name twice keeps the first options. Only a
//! derived builder has [`override_attribute`](SchemaBuilder::override_attribute)
//! and [`override_attributes`](SchemaBuilder::override_attributes), which
//! replace options that are already present. The distinction is carried in
//! the builder's type, so a base schema cannot call them at all.
//!
//! ```
//! use microattrs::{Features, Options, Schema};
//! use serde_json::json;
//!
//! let animal = Schema::builder("Animal")
//!     .attribute("name")
//!     .features(Features::to_initialize(false, false))
//!     .build();
//!
//! let dog = animal
//!     .subclass("Dog")
//!     .override_attribute("sound", Options::with_default("woof"))
//!     .build();
//!
//! let rex = dog.new_instance(json!({"name": "Rex"})).unwrap();
//! assert_eq!(rex.attribute("name"), Some(&json!("Rex")));
//! assert_eq!(rex.attribute("sound"), Some(&json!("woof")));
//! assert!(!animal.has_attribute("sound"));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::accessor::Reader;
use crate::config::FeatureConfig;
use crate::declaration::Declaration;
use crate::diff::Changes;
use crate::error::{Error, Result};
use crate::features::Features;
use crate::instance::Attributes;
use crate::keys::{with_string_keys, AttributeMap, IntoAttributeMap};
use crate::options::Options;
use crate::registry::{AttributeDefinition, Declared, Registry};
use crate::strategy::{Mode, Precedence, Strategy};
use crate::validation::{ValidationErrors, Validator};

mod sealed {
    pub trait Sealed {}
}

/// Marks whether a builder belongs to a base or a derived schema.
pub trait Lineage: sealed::Sealed {
    const DERIVED: bool;
}

/// A schema declared from scratch.
#[derive(Debug)]
pub enum Base {}

/// A schema produced by subclassing another.
#[derive(Debug)]
pub enum Derived {}

impl sealed::Sealed for Base {}
impl sealed::Sealed for Derived {}

impl Lineage for Base {
    const DERIVED: bool = false;
}

impl Lineage for Derived {
    const DERIVED: bool = true;
}

pub struct Schema {
    name: String,
    parent: Option<String>,
    derived: bool,
    registry: Registry,
    strategy: Strategy,
    validators: Vec<Arc<dyn Validator>>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder<Base> {
        SchemaBuilder {
            name: name.into(),
            parent: None,
            registry: Registry::new(),
            features: Features::empty(),
            precedence: Precedence::default(),
            validators: Vec::new(),
            lineage: PhantomData,
        }
    }

    /// Starts a subclass seeded with a snapshot of this schema.
    pub fn subclass(&self, name: impl Into<String>) -> SchemaBuilder<Derived> {
        inherit(
            name.into(),
            &self.name,
            &self.registry,
            self.strategy.features(),
            self.strategy.precedence(),
            &self.validators,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the schema this one was derived from.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    pub fn has_attribute(&self, name: impl AsRef<str>) -> bool {
        self.registry.contains(name.as_ref())
    }

    /// Declared attribute names, in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    pub fn options(&self, name: impl AsRef<str>) -> Option<&Options> {
        self.registry.get(name.as_ref()).map(AttributeDefinition::options)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.registry.definitions()
    }

    /// The declared options laid over `seed`. See [`Registry::effective_options`].
    pub fn effective_options(&self, seed: AttributeMap) -> AttributeMap {
        self.registry.effective_options(seed)
    }

    pub fn reader(&self, name: impl AsRef<str>) -> Option<&Reader> {
        self.registry.get(name.as_ref()).map(AttributeDefinition::reader)
    }

    pub fn readers(&self) -> impl Iterator<Item = &Reader> {
        self.registry.definitions().map(AttributeDefinition::reader)
    }

    pub fn features(&self) -> Features {
        self.strategy.features()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Builds an instance with the schema's initialization strategy.
    ///
    /// Fails with [`Error::NoInitializer`] when no initialization feature
    /// was selected, and with [`Error::MissingAttributes`] when a strict
    /// strategy cannot resolve every attribute.
    pub fn new_instance(self: &Arc<Self>, input: impl IntoAttributeMap) -> Result<Attributes> {
        if self.strategy.mode() == Mode::None {
            return Err(Error::NoInitializer(self.name.clone()));
        }

        let input = with_string_keys(input)?;
        let values = self.strategy.resolve(&self.registry, &input)?;

        let mut attrs = Attributes::empty(Arc::clone(self));
        attrs.assign_all(values)?;

        if self.strategy.diff() {
            let changes = Changes::from_defaults(self, attrs.attributes());
            attrs.changes = Some(changes);
        }

        if self.strategy.validations() {
            let mut errors = ValidationErrors::new();
            for validator in &self.validators {
                validator.validate(&attrs, &mut errors);
            }
            if !errors.is_empty() {
                tracing::debug!(schema = %self.name, %errors, "instance failed validation");
            }
            attrs.errors = Some(errors);
        }

        Ok(attrs)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("attributes", &self.registry.names().collect::<Vec<_>>())
            .field("strategy", &self.strategy)
            .field("validators", &self.validators.len())
            .finish()
    }
}

fn inherit(
    name: String,
    parent_name: &str,
    parent: &Registry,
    features: Features,
    precedence: Precedence,
    validators: &[Arc<dyn Validator>],
) -> SchemaBuilder<Derived> {
    let mut registry = Registry::new();
    for (attribute, options) in parent.snapshot() {
        registry.declare(attribute, options, false);
    }

    tracing::debug!(
        schema = %name,
        parent = parent_name,
        inherited = registry.len(),
        "subclassed schema"
    );

    SchemaBuilder {
        name,
        parent: Some(parent_name.to_string()),
        registry,
        features,
        precedence,
        validators: validators.to_vec(),
        lineage: PhantomData,
    }
}

/// Declares a schema's attributes and features.
pub struct SchemaBuilder<L: Lineage = Base> {
    name: String,
    parent: Option<String>,
    registry: Registry,
    features: Features,
    precedence: Precedence,
    validators: Vec<Arc<dyn Validator>>,
    lineage: PhantomData<L>,
}

impl<L: Lineage> SchemaBuilder<L> {
    /// Declares an attribute with empty options. A no-op for names that are
    /// already declared.
    pub fn attribute(self, name: impl ToString) -> Self {
        self.attribute_with(name, Options::new())
    }

    /// Declares an attribute with options. If the name is already declared,
    /// its existing options are kept.
    pub fn attribute_with(mut self, name: impl ToString, options: Options) -> Self {
        self.declare(name.to_string(), options, false);
        self
    }

    /// Declares every entry of a bulk declaration, first declaration wins.
    pub fn attributes(mut self, declaration: impl Into<Declaration>) -> Self {
        for (name, options) in declaration.into().flatten() {
            self.declare(name, options, false);
        }
        self
    }

    /// Like [`attributes`](Self::attributes), from a JSON description.
    pub fn try_attributes(self, declaration: serde_json::Value) -> Result<Self> {
        Ok(self.attributes(Declaration::from_value(declaration)?))
    }

    pub fn features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.features = strategy.features();
        self.precedence = strategy.precedence();
        self
    }

    pub fn precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Applies the strategy described by a loaded configuration.
    pub fn configured(self, config: &FeatureConfig) -> Self {
        self.strategy(config.strategy())
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn has_attribute(&self, name: impl AsRef<str>) -> bool {
        self.registry.contains(name.as_ref())
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    pub fn options(&self, name: impl AsRef<str>) -> Option<&Options> {
        self.registry.get(name.as_ref()).map(AttributeDefinition::options)
    }

    /// Starts a subclass from the attributes declared so far.
    pub fn subclass(&self, name: impl Into<String>) -> SchemaBuilder<Derived> {
        inherit(
            name.into(),
            &self.name,
            &self.registry,
            self.features,
            self.precedence,
            &self.validators,
        )
    }

    pub fn build(self) -> Arc<Schema> {
        let strategy = self.features.strategy().with_precedence(self.precedence);
        tracing::debug!(
            schema = %self.name,
            attributes = self.registry.len(),
            strategy = strategy.name().unwrap_or("none"),
            "built schema"
        );
        Arc::new(Schema {
            name: self.name,
            parent: self.parent,
            derived: L::DERIVED,
            registry: self.registry,
            strategy,
            validators: self.validators,
        })
    }

    fn declare(&mut self, name: String, options: Options, can_overwrite: bool) {
        match self.registry.declare(&name, options, can_overwrite) {
            Declared::Added => {
                tracing::debug!(schema = %self.name, attribute = %name, "declared attribute")
            }
            Declared::Overwritten => {
                tracing::debug!(schema = %self.name, attribute = %name, "overwrote attribute")
            }
            Declared::Kept => {
                tracing::trace!(schema = %self.name, attribute = %name, "kept first declaration")
            }
        }
    }
}

impl SchemaBuilder<Derived> {
    /// Declares an attribute, replacing the options of an existing one.
    pub fn override_attribute(mut self, name: impl ToString, options: Options) -> Self {
        self.declare(name.to_string(), options, true);
        self
    }

    /// Declares every entry of a bulk declaration, replacing existing
    /// options. Declaring nothing at all is an error.
    pub fn override_attributes(mut self, declaration: impl Into<Declaration>) -> Result<Self> {
        let declaration = declaration.into();
        if matches!(&declaration, Declaration::List(items) if items.is_empty()) {
            return Err(Error::WrongNumberOfArguments);
        }
        for (name, options) in declaration.flatten() {
            self.declare(name, options, true);
        }
        Ok(self)
    }

    /// Like [`override_attributes`](Self::override_attributes), from a JSON
    /// description.
    pub fn try_override_attributes(self, declaration: serde_json::Value) -> Result<Self> {
        self.override_attributes(Declaration::from_value(declaration)?)
    }
}

impl<L: Lineage> fmt::Debug for SchemaBuilder<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("name", &self.name)
            .field("derived", &L::DERIVED)
            .field("attributes", &self.registry.names().collect::<Vec<_>>())
            .field("features", &self.features)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_redeclaration_keeps_first_options() {
        let schema = Schema::builder("Base")
            .attribute_with("a", Options::with_default(1))
            .attribute_with("a", Options::with_default(2))
            .attributes(("a", Options::with_default(3)))
            .build();
        assert_eq!(
            schema.options("a").unwrap().default_value(),
            Some(&json!(1))
        );
        assert_eq!(schema.attribute_names().count(), 1);
        assert!(!schema.is_derived());
    }

    #[test]
    fn subclass_starts_with_parent_attributes() {
        let parent = Schema::builder("Parent")
            .attributes(vec!["a", "b"])
            .build();
        let child = parent.subclass("Child").build();
        assert_eq!(child.attribute_names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(child.parent(), Some("Parent"));
        assert!(child.is_derived());
    }

    #[test]
    fn derived_plain_declaration_still_keeps_first() {
        let parent = Schema::builder("Parent")
            .attribute_with("a", Options::with_default(1))
            .build();
        let child = parent
            .subclass("Child")
            .attribute_with("a", Options::with_default(2))
            .build();
        assert_eq!(
            child.options("a").unwrap().default_value(),
            Some(&json!(1))
        );
    }

    #[test]
    fn override_with_nothing_is_an_error() {
        let parent = Schema::builder("Parent").attribute("a").build();
        let empty: Vec<&str> = Vec::new();
        let err = parent.subclass("Child").override_attributes(empty).unwrap_err();
        assert!(matches!(err, Error::WrongNumberOfArguments));
    }

    #[test]
    fn override_with_empty_mapping_is_a_no_op() {
        let parent = Schema::builder("Parent").attribute("a").build();
        let child = parent
            .subclass("Child")
            .try_override_attributes(json!({}))
            .unwrap()
            .build();
        assert_eq!(child.attribute_names().collect::<Vec<_>>(), ["a"]);
    }

    #[test]
    fn builder_subclass_is_a_snapshot() {
        let parent = Schema::builder("Parent").attribute("a");
        let child = parent.subclass("Child").build();
        let parent = parent.attribute("late").build();

        assert!(parent.has_attribute("late"));
        assert!(!child.has_attribute("late"));
    }

    #[test]
    fn subclass_inherits_features() {
        let parent = Schema::builder("Parent")
            .attribute("a")
            .features(Features::to_initialize_strict(true, false))
            .precedence(Precedence::DefaultFirst)
            .build();
        let child = parent.subclass("Child").build();
        assert_eq!(child.strategy(), parent.strategy());
    }

    #[test]
    fn readers_exist_for_every_declared_name() {
        let schema = Schema::builder("S").attributes(["x", "y"]).build();
        let names: Vec<_> = schema.readers().map(Reader::name).collect();
        assert_eq!(names, ["x", "y"]);
        assert!(schema.reader("z").is_none());
    }

    #[test]
    fn no_initializer_without_features() {
        let schema = Schema::builder("Bare").attribute("a").build();
        let err = schema.new_instance(json!({"a": 1})).unwrap_err();
        assert!(matches!(err, Error::NoInitializer(name) if name == "Bare"));
    }

    #[test]
    fn try_attributes_rejects_bad_options() {
        let err = Schema::builder("S")
            .try_attributes(json!({"a": "not options"}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }));
    }
}
