use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::sequence::GrowthPolicy;

/// Knobs for the growable-view lesson. Keys missing from a TOML document
/// keep their defaults, which reproduce the lesson as written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    pub growth: GrowthPolicy,
    pub initial_capacity: usize,
}

impl Default for LabConfig {
    fn default() -> Self {
        LabConfig {
            growth: GrowthPolicy::Doubling,
            initial_capacity: 3,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl LabConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        LabConfig::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_lesson() {
        let config = LabConfig::default();
        assert_eq!(config.growth, GrowthPolicy::Doubling);
        assert_eq!(config.initial_capacity, 3);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(LabConfig::from_toml_str("").unwrap(), LabConfig::default());
    }

    #[test]
    fn test_parse_full_document() {
        let config = LabConfig::from_toml_str(
            r#"
            growth = "exact"
            initial_capacity = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.growth, GrowthPolicy::Exact);
        assert_eq!(config.initial_capacity, 8);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = LabConfig::from_toml_str("growth = \"exact\"").unwrap();
        assert_eq!(config.initial_capacity, 3);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = LabConfig::from_toml_str("growth = \"tripling\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(LabConfig::from_toml_str("capacity = 3").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_capacity = 5").unwrap();

        let config = LabConfig::load(file.path()).unwrap();
        assert_eq!(config.initial_capacity, 5);
        assert_eq!(config.growth, GrowthPolicy::Doubling);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = LabConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }
}
