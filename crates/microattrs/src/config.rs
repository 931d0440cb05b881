//! # Configuration
//!
//! The initialization strategy of a schema can come from configuration
//! instead of code. [`FeatureConfig`] is loaded with [`confique`], layering
//! environment variables over a TOML file over compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `strict` | `MICROATTRS_STRICT` | `false` | Fail construction on missing values |
//! | `diff` | `MICROATTRS_DIFF` | `false` | Track changes against defaults |
//! | `validations` | `MICROATTRS_VALIDATIONS` | `false` | Run registered validators |
//! | `precedence` | `MICROATTRS_PRECEDENCE` | `input_first` | `input_first` or `default_first` |

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::strategy::{Precedence, Strategy};

#[derive(Config, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureConfig {
    /// Reject construction when a declared attribute has no value.
    #[config(default = false, env = "MICROATTRS_STRICT")]
    pub strict: bool,

    /// Record which attributes differ from their declared defaults.
    #[config(default = false, env = "MICROATTRS_DIFF")]
    pub diff: bool,

    /// Run the schema's validators after construction.
    #[config(default = false, env = "MICROATTRS_VALIDATIONS")]
    pub validations: bool,

    /// Whether input values or declared defaults win.
    #[config(default = "input_first", env = "MICROATTRS_PRECEDENCE")]
    pub precedence: Precedence,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            strict: false,
            diff: false,
            validations: false,
            precedence: Precedence::InputFirst,
        }
    }
}

impl FeatureConfig {
    /// Loads from `path`, with `MICROATTRS_*` environment variables on top.
    /// A missing file falls back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = FeatureConfig::builder()
            .env()
            .file(path.as_ref())
            .load()?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded feature config");
        Ok(config)
    }

    /// Parses a TOML document. Omitted keys take their defaults.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn strategy(&self) -> Strategy {
        Strategy::from_toggles(self.strict, self.diff, self.validations)
            .with_precedence(self.precedence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Mode;

    #[test]
    fn test_default_config_is_lenient() {
        let config = FeatureConfig::default();
        let strategy = config.strategy();
        assert_eq!(strategy.mode(), Mode::Lenient);
        assert!(!strategy.diff());
        assert_eq!(strategy.precedence(), Precedence::InputFirst);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = FeatureConfig::from_toml("strict = true\nprecedence = \"default_first\"\n")
            .unwrap();
        assert!(config.strict);
        assert!(!config.diff);
        assert_eq!(config.precedence, Precedence::DefaultFirst);
        assert_eq!(config.strategy().name(), Some("strict_initialize"));
    }

    #[test]
    fn test_from_toml_rejects_unknown_precedence() {
        assert!(FeatureConfig::from_toml("precedence = \"sometimes\"").is_err());
    }
}
