//! # microattrs
//!
//! Declarative attribute schemas with inheritance and pluggable
//! initialization strategies.
//!
//! A schema declares a set of named attributes, each with free-form option
//! metadata. Instances of the schema hold one frozen value per declared
//! attribute, built from an arbitrary input mapping by the strategy the
//! schema selected.
//!
//! ## Building Blocks
//!
//! | Piece | Module | Role |
//! |-------|--------|------|
//! | [`Schema`] / [`SchemaBuilder`] | `schema` | Declaration, inheritance, instance construction |
//! | [`Registry`] | `registry` | Ordered name → options table, overwrite rule |
//! | [`Reader`] | `accessor` | Read accessor generated per declared name |
//! | [`Attributes`] | `instance` | Frozen per-instance store with guarded reads |
//! | [`Features`] / [`Strategy`] | `features`, `strategy` | Lenient/strict × diff × validations |
//! | [`Changes`] | `diff` | Differences against defaults or another instance |
//! | [`Validator`] | `validation` | Hook for external validation |
//! | [`FeatureConfig`] | `config` | Strategy selection from TOML and environment |
//! | [`with_string_keys`] | `keys` | Normalizes input keys to strings |
//!
//! ## Usage
//!
//! ```
//! use microattrs::{Error, Features, Options, Schema};
//! use serde_json::json;
//!
//! let user = Schema::builder("User")
//!     .attribute("name")
//!     .attribute_with("role", Options::with_default("member"))
//!     .features(Features::to_initialize_strict(true, false))
//!     .build();
//!
//! let ada = user.new_instance(json!({"name": "Ada", "extra": 1})).unwrap();
//! assert_eq!(ada.attribute("role"), Some(&json!("member")));
//! assert_eq!(ada.attribute("extra"), None);
//! let changes = ada.changes().unwrap();
//! assert!(changes.changed_attribute("name"));
//! assert!(!changes.changed_attribute("role"));
//!
//! assert!(matches!(ada.require("extra"), Err(Error::UndefinedAttribute(_))));
//! assert!(matches!(user.new_instance(json!({})), Err(Error::MissingAttributes(_))));
//! ```

pub mod accessor;
pub mod config;
pub mod declaration;
pub mod diff;
pub mod error;
pub mod features;
pub mod instance;
pub mod keys;
pub mod options;
pub mod registry;
pub mod schema;
pub mod strategy;
pub mod validation;

pub use accessor::Reader;
pub use config::FeatureConfig;
pub use declaration::Declaration;
pub use diff::{Change, Changes};
pub use error::{Error, Result};
pub use features::{Feature, Features, IntoFeature};
pub use instance::Attributes;
pub use keys::{with_string_keys, AttributeMap, IntoAttributeMap};
pub use options::Options;
pub use registry::{AttributeDefinition, Declared, Registry};
pub use schema::{Base, Derived, Lineage, Schema, SchemaBuilder};
pub use strategy::{Mode, Precedence, Strategy};
pub use validation::{ValidationErrors, Validator};

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
