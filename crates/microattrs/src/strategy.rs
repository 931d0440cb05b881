//! Initialization strategies.
//!
//! A [`Strategy`] is one point in {none, lenient, strict} × {diff off, on} ×
//! {validations off, on}, plus the [`Precedence`] rule used when both an
//! input value and a declared default exist. The eight combinations with an
//! initializer are named and listed in [`Strategy::catalog`].

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::{Feature, Features};
use crate::keys::AttributeMap;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// No initializer is mixed in.
    None,
    /// Attributes without a value are left absent.
    Lenient,
    /// Attributes without a value fail construction.
    Strict,
}

/// Which value wins when the caller supplies one and a default is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// The caller's value wins; the default fills in omitted keys.
    #[default]
    InputFirst,
    /// The declared default wins; input only fills attributes without one.
    DefaultFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strategy {
    mode: Mode,
    diff: bool,
    validations: bool,
    precedence: Precedence,
}

static CATALOG: Lazy<IndexMap<String, Strategy>> = Lazy::new(|| {
    let mut catalog = IndexMap::new();
    for strict in [false, true] {
        for diff in [false, true] {
            for validations in [false, true] {
                let strategy = Strategy::from_toggles(strict, diff, validations);
                catalog.insert(strategy.catalog_name(), strategy);
            }
        }
    }
    catalog
});

impl Strategy {
    pub const fn new(mode: Mode, diff: bool, validations: bool) -> Self {
        Self {
            mode,
            diff,
            validations,
            precedence: Precedence::InputFirst,
        }
    }

    /// Picks the concrete strategy for the three toggles.
    pub const fn from_toggles(strict: bool, diff: bool, validations: bool) -> Self {
        let mode = if strict { Mode::Strict } else { Mode::Lenient };
        Strategy::new(mode, diff, validations)
    }

    /// Looks up a catalog entry such as `"strict_initialize_diff"`.
    pub fn named(name: &str) -> Option<Strategy> {
        CATALOG.get(name).copied()
    }

    /// All eight named strategies, lenient ones first.
    pub fn catalog() -> impl Iterator<Item = (&'static str, Strategy)> {
        CATALOG.iter().map(|(name, strategy)| (name.as_str(), *strategy))
    }

    /// The catalog name, or `None` for a strategy without an initializer.
    pub fn name(&self) -> Option<&'static str> {
        if self.mode == Mode::None {
            return None;
        }
        CATALOG
            .get_key_value(&self.catalog_name())
            .map(|(name, _)| name.as_str())
    }

    fn catalog_name(&self) -> String {
        let mut name = String::from(match self.mode {
            Mode::Strict => "strict_initialize",
            _ => "initialize",
        });
        if self.diff {
            name.push_str("_diff");
        }
        if self.validations {
            name.push_str("_activemodel_validations");
        }
        name
    }

    /// The feature set that resolves to this strategy.
    pub fn features(&self) -> Features {
        let mut features = match self.mode {
            Mode::Strict => Feature::StrictInitialize.as_set(),
            Mode::Lenient => Feature::Initialize.as_set(),
            Mode::None => Features::empty(),
        };
        features.set(Features::DIFF, self.diff);
        features.set(Features::VALIDATIONS, self.validations);
        features
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn diff(&self) -> bool {
        self.diff
    }

    pub fn validations(&self) -> bool {
        self.validations
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Computes the values an instance is assigned from `input`.
    ///
    /// Declared attributes come first, in declaration order. Undeclared input
    /// keys are passed through at the end so the store can drop them.
    pub(crate) fn resolve(
        &self,
        registry: &Registry,
        input: &AttributeMap,
    ) -> Result<AttributeMap> {
        let mut resolved = AttributeMap::new();
        let mut missing = Vec::new();

        for def in registry.definitions() {
            let supplied = input.get(def.name());
            let default = def.options().default_value();
            let value = match self.precedence {
                Precedence::InputFirst => supplied.or(default),
                Precedence::DefaultFirst => default.or(supplied),
            };

            match value {
                Some(value) => {
                    resolved.insert(def.name().to_string(), value.clone());
                }
                None if self.mode == Mode::Strict => missing.push(def.name().to_string()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(Error::MissingAttributes(missing));
        }

        for (key, value) in input {
            if !registry.contains(key) {
                resolved.insert(key.clone(), value.clone());
            }
        }

        Ok(resolved)
    }
}
