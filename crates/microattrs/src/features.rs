//! Feature selection.
//!
//! A schema opts into initialization behaviors by selecting features from a
//! fixed catalog. The selection is a plain set; [`Features::strategy`] turns
//! it into the one concrete [`Strategy`] instances are built with.
//!
//! | Feature | Name | Effect |
//! |---------|------|--------|
//! | `Initialize` | `initialize` | Lenient construction: missing values stay absent |
//! | `StrictInitialize` | `strict_initialize` | Construction fails on missing values |
//! | `Diff` | `diff` | Instances record changes against declared defaults |
//! | `Validations` | `activemodel_validations` | Registered validators run after construction |

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::strategy::{Mode, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Diff,
    Initialize,
    StrictInitialize,
    Validations,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Diff,
        Feature::Initialize,
        Feature::StrictInitialize,
        Feature::Validations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Diff => "diff",
            Feature::Initialize => "initialize",
            Feature::StrictInitialize => "strict_initialize",
            Feature::Validations => "activemodel_validations",
        }
    }

    /// Returns the flag for this feature.
    pub const fn as_set(self) -> Features {
        match self {
            Feature::Diff => Features::DIFF,
            Feature::Initialize => Features::INITIALIZE,
            Feature::StrictInitialize => Features::STRICT_INITIALIZE,
            Feature::Validations => Features::VALIDATIONS,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "diff" => Ok(Feature::Diff),
            "initialize" => Ok(Feature::Initialize),
            "strict_initialize" | "initialize!" => Ok(Feature::StrictInitialize),
            "activemodel_validations" | "validations" => Ok(Feature::Validations),
            other => Err(Error::UnknownFeature(other.to_string())),
        }
    }
}

/// Something that names a feature.
pub trait IntoFeature {
    fn into_feature(self) -> Result<Feature>;
}

impl IntoFeature for Feature {
    fn into_feature(self) -> Result<Feature> {
        Ok(self)
    }
}

impl IntoFeature for &str {
    fn into_feature(self) -> Result<Feature> {
        self.parse()
    }
}

impl IntoFeature for String {
    fn into_feature(self) -> Result<Feature> {
        self.parse()
    }
}

impl IntoFeature for &String {
    fn into_feature(self) -> Result<Feature> {
        self.parse()
    }
}

bitflags::bitflags! {
    /// A set of selected features.
    ///
    /// The empty set selects no initializer: instances can then only be
    /// populated through [`Attributes::assign`](crate::Attributes::assign).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Features: u8 {
        const DIFF = 1 << 0;
        const INITIALIZE = 1 << 1;
        const STRICT_INITIALIZE = 1 << 2;
        const VALIDATIONS = 1 << 3;
    }
}

impl Features {
    /// Exactly the named features.
    pub fn with<I>(names: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: IntoFeature,
    {
        let mut features = Features::empty();
        for name in names {
            features.insert(name.into_feature()?.as_set());
        }
        Ok(features)
    }

    /// The whole catalog minus the named features.
    pub fn without<I>(names: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: IntoFeature,
    {
        Ok(Features::all().difference(Features::with(names)?))
    }

    pub fn feature(name: impl IntoFeature) -> Result<Self> {
        Features::with([name])
    }

    /// The named features, or the whole catalog when none are named.
    pub fn features<I>(names: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: IntoFeature,
    {
        let features = Features::with(names)?;
        Ok(if features.is_empty() {
            Features::all()
        } else {
            features
        })
    }

    /// Lenient initialization, optionally with diff tracking and validations.
    pub fn to_initialize(diff: bool, validations: bool) -> Self {
        Features::profile(Features::INITIALIZE, diff, validations)
    }

    /// Strict initialization, optionally with diff tracking and validations.
    pub fn to_initialize_strict(diff: bool, validations: bool) -> Self {
        Features::profile(Features::STRICT_INITIALIZE, diff, validations)
    }

    fn profile(init: Features, diff: bool, validations: bool) -> Self {
        let mut features = init;
        features.set(Features::DIFF, diff);
        features.set(Features::VALIDATIONS, validations);
        features
    }

    /// The selected features, in catalog order.
    pub fn features_iter(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL
            .into_iter()
            .filter(|feature| self.contains(feature.as_set()))
    }

    /// Resolves the selection to a strategy. Strict initialization takes
    /// over when both initialization features are selected.
    pub fn strategy(&self) -> Strategy {
        let strict = self.contains(Features::STRICT_INITIALIZE);
        let lenient = self.contains(Features::INITIALIZE);
        if strict && lenient {
            tracing::warn!(
                features = ?self,
                "both initialize and strict_initialize selected; using strict_initialize"
            );
        }

        let mode = if strict {
            Mode::Strict
        } else if lenient {
            Mode::Lenient
        } else {
            Mode::None
        };

        Strategy::new(
            mode,
            self.contains(Features::DIFF),
            self.contains(Features::VALIDATIONS),
        )
    }
}

impl From<Feature> for Features {
    fn from(feature: Feature) -> Self {
        feature.as_set()
    }
}

impl FromIterator<Feature> for Features {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut features = Features::empty();
        for feature in iter {
            features.insert(feature.as_set());
        }
        features
    }
}
