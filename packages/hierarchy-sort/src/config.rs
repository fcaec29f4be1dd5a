//! Sort configuration (YAML schema v1)
//!
//! ```yaml
//! version: 1
//! max_ancestor_depth: 1024
//! lookup_cache_capacity: 4096
//! cache_lookups: true
//! ```
//!
//! Every field except `version` is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Supported schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 1024;
pub const DEFAULT_LOOKUP_CACHE_CAPACITY: usize = 4096;

const MAX_ANCESTOR_DEPTH_RANGE: (usize, usize) = (1, 1_000_000);
const LOOKUP_CACHE_CAPACITY_RANGE: (usize, usize) = (1, 10_000_000);

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}")]
    Range {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Missing version field in YAML
    #[error("Missing 'version' field in configuration. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    /// Unsupported version
    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Tuning knobs for [`crate::HierarchicalSort`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
    /// Schema version (0 when absent from the file)
    #[serde(default)]
    pub version: u32,

    /// Hard ceiling on parent hops in one ancestor walk
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,

    /// Entries kept by the ancestor lookup cache
    #[serde(default = "default_lookup_cache_capacity")]
    pub lookup_cache_capacity: usize,

    /// Route ancestor lookups through the cache
    #[serde(default = "default_cache_lookups")]
    pub cache_lookups: bool,
}

fn default_max_ancestor_depth() -> usize {
    DEFAULT_MAX_ANCESTOR_DEPTH
}

fn default_lookup_cache_capacity() -> usize {
    DEFAULT_LOOKUP_CACHE_CAPACITY
}

fn default_cache_lookups() -> bool {
    true
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
            lookup_cache_capacity: DEFAULT_LOOKUP_CACHE_CAPACITY,
            cache_lookups: true,
        }
    }
}

impl SortConfig {
    pub fn max_ancestor_depth(mut self, depth: usize) -> Self {
        self.max_ancestor_depth = depth;
        self
    }

    pub fn lookup_cache_capacity(mut self, capacity: usize) -> Self {
        self.lookup_cache_capacity = capacity;
        self
    }

    pub fn cache_lookups(mut self, enabled: bool) -> Self {
        self.cache_lookups = enabled;
        self
    }

    /// Check version and field ranges
    pub fn validate(&self) -> ConfigResult<()> {
        match self.version {
            0 => return Err(ConfigError::MissingVersion),
            v if !SUPPORTED_VERSIONS.contains(&v) => {
                return Err(ConfigError::UnsupportedVersion {
                    found: v,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            _ => {}
        }

        check_range("max_ancestor_depth", self.max_ancestor_depth, MAX_ANCESTOR_DEPTH_RANGE)?;
        check_range(
            "lookup_cache_capacity",
            self.lookup_cache_capacity,
            LOOKUP_CACHE_CAPACITY_RANGE,
        )?;
        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: SortConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn check_range(field: &'static str, value: usize, (min, max): (usize, usize)) -> ConfigResult<()> {
    if value < min || value > max {
        return Err(ConfigError::Range {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SortConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = SortConfig::from_yaml_str("version: 1\nmax_ancestor_depth: 64\n").unwrap();
        assert_eq!(config.max_ancestor_depth, 64);
        assert_eq!(config.lookup_cache_capacity, DEFAULT_LOOKUP_CACHE_CAPACITY);
        assert!(config.cache_lookups);
    }

    #[test]
    fn test_missing_version() {
        let result = SortConfig::from_yaml_str("max_ancestor_depth: 64\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_unsupported_version() {
        let err = SortConfig::from_yaml_str("version: 7\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 7, .. }));
        assert!(err.to_string().contains("Supported versions: 1"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = SortConfig::from_yaml_str("version: 1\nmax_depth: 3\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_range_validation() {
        let err = SortConfig::default().max_ancestor_depth(0).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Range {
                field: "max_ancestor_depth",
                value: 0,
                ..
            }
        ));

        let err = SortConfig::default()
            .lookup_cache_capacity(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("lookup_cache_capacity"));
    }

    #[test]
    fn test_yaml_output_has_version() {
        let yaml = SortConfig::default().cache_lookups(false).to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("cache_lookups: false"));
    }
}
