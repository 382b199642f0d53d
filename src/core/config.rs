//! Analyzer configuration, loadable from RON.
//!
//! ```ron
//! (
//!     era_names: ["Dawn", "Reign", "Twilight"],
//!     lexicons: (
//!         forbidden: Some(["forbidden", "taboo", "oathbound"]),
//!     ),
//! )
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::classifier::{
    KeywordClassifier, LexiconSet, FORBIDDEN_TERMS, METAPHYSICS_TERMS, PHYSICS_TERMS,
    VOLATILE_TERMS,
};
use crate::core::world_age::DEFAULT_ERA_NAMES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid lexicon: {0}")]
    Lexicon(#[from] regex::Error),
}

/// Per-lexicon replacements. `None` keeps the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconOverrides {
    #[serde(default)]
    pub forbidden: Option<Vec<String>>,
    #[serde(default)]
    pub volatile: Option<Vec<String>>,
    #[serde(default)]
    pub metaphysics: Option<Vec<String>>,
    #[serde(default)]
    pub physics: Option<Vec<String>>,
}

impl LexiconOverrides {
    pub fn is_empty(&self) -> bool {
        self.forbidden.is_none()
            && self.volatile.is_none()
            && self.metaphysics.is_none()
            && self.physics.is_none()
    }

    pub fn compile(&self) -> Result<LexiconSet, regex::Error> {
        if self.is_empty() {
            return Ok(LexiconSet::default());
        }
        let pick = |over: &Option<Vec<String>>, built_in: &[&str]| -> Vec<String> {
            over.clone()
                .unwrap_or_else(|| built_in.iter().map(|s| s.to_string()).collect())
        };
        LexiconSet::from_terms(
            &pick(&self.forbidden, FORBIDDEN_TERMS),
            &pick(&self.volatile, VOLATILE_TERMS),
            &pick(&self.metaphysics, METAPHYSICS_TERMS),
            &pick(&self.physics, PHYSICS_TERMS),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_era_names")]
    pub era_names: Vec<String>,
    #[serde(default)]
    pub lexicons: LexiconOverrides,
}

fn default_era_names() -> Vec<String> {
    DEFAULT_ERA_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            era_names: default_era_names(),
            lexicons: LexiconOverrides::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn parse_ron(input: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn classifier(&self) -> Result<KeywordClassifier, ConfigError> {
        Ok(KeywordClassifier::new(self.lexicons.compile()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::derived::ConstraintStatus;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AnalysisConfig::parse_ron("()").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.era_names[0], "Founding Age");
        assert!(config.lexicons.is_empty());
    }

    #[test]
    fn lexicon_override_replaces_only_that_table() {
        let config = AnalysisConfig::parse_ron(
            r#"(lexicons: (forbidden: Some(["oathbound"])))"#,
        )
        .unwrap();
        let classifier = config.classifier().unwrap();
        assert_eq!(
            classifier.classify_status("An oathbound blade", ConstraintStatus::Stable),
            ConstraintStatus::Forbidden
        );
        assert_eq!(
            classifier.classify_status("A forbidden blade", ConstraintStatus::Stable),
            ConstraintStatus::Stable
        );
        assert_eq!(
            classifier.classify_status("An unstable blade", ConstraintStatus::Stable),
            ConstraintStatus::Volatile
        );
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(matches!(
            AnalysisConfig::parse_ron("(era_names: 5)"),
            Err(ConfigError::Ron(_))
        ));
    }

    #[test]
    fn load_fixture_config() {
        let path = std::path::PathBuf::from("tests/fixtures/analysis_config.ron");
        let config = AnalysisConfig::load_from_ron(&path).unwrap();
        assert_eq!(config.era_names.len(), 3);
        assert!(config.lexicons.volatile.is_some());
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::path::PathBuf::from("tests/fixtures/does_not_exist.ron");
        assert!(matches!(
            AnalysisConfig::load_from_ron(&path),
            Err(ConfigError::Io(_))
        ));
    }
}
