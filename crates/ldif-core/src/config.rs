//! Configuration for LDIF processing sessions.
//!
//! An [`LdifConfig`] is constructed once per processing session and never mutated afterwards, so
//! it can be shared read-only across any number of concurrent pipeline calls.

use crate::Error;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default ceiling on the number of entries accepted in one parse.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default ceiling on the serialized size of a single entry, in bytes.
pub const DEFAULT_MAX_ENTRY_SIZE: usize = 1_048_576;

/// Limits and validation policy for LDIF processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LdifConfig {
    /// Escalate validation warnings (such as a missing `objectClass`) to failures
    #[serde(default = "default_strict_validation")]
    pub strict_validation: bool,

    /// Maximum number of entries accepted in one parse
    #[validate(range(min = 1))]
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum serialized size of a single entry, in bytes
    #[validate(range(min = 1))]
    #[serde(default = "default_max_entry_size")]
    pub max_entry_size: usize,

    /// Fold written lines longer than this many bytes (no folding when unset)
    #[validate(range(min = 8))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<usize>,

    /// Create missing parent directories when writing output files
    #[serde(default)]
    pub create_output_dir: bool,
}

const fn default_strict_validation() -> bool {
    true
}

const fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

const fn default_max_entry_size() -> usize {
    DEFAULT_MAX_ENTRY_SIZE
}

impl LdifConfig {
    /// Create a configuration with strict validation and default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strict_validation: default_strict_validation(),
            max_entries: default_max_entries(),
            max_entry_size: default_max_entry_size(),
            line_width: None,
            create_output_dir: false,
        }
    }

    /// Create a permissive configuration: missing `objectClass` values become warnings.
    #[must_use]
    pub const fn permissive() -> Self {
        Self::new().with_strict_validation(false)
    }

    /// Set whether validation warnings are escalated to failures.
    #[must_use]
    pub const fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Set the maximum number of entries.
    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the maximum serialized entry size in bytes.
    #[must_use]
    pub const fn with_max_entry_size(mut self, bytes: usize) -> Self {
        self.max_entry_size = bytes;
        self
    }

    /// Set the fold width for written lines.
    #[must_use]
    pub const fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = Some(width);
        self
    }

    /// Set whether missing output directories are created on write.
    #[must_use]
    pub const fn with_create_output_dir(mut self, create: bool) -> Self {
        self.create_output_dir = create;
        self
    }

    /// Check the configuration and return it when every option is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a limit is zero or the line width is too small to fold.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()?;
        Ok(self)
    }
}

impl Default for LdifConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ldif_config_new() {
        let config = LdifConfig::new();
        assert!(config.strict_validation);
        assert_eq!(config.max_entries, DEFAULT_MAX_ENTRIES);
        assert_eq!(config.max_entry_size, DEFAULT_MAX_ENTRY_SIZE);
        assert!(config.line_width.is_none());
        assert!(!config.create_output_dir);
    }

    #[test]
    fn test_ldif_config_permissive() {
        let config = LdifConfig::permissive();
        assert!(!config.strict_validation);
        assert_eq!(config.max_entries, DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn test_ldif_config_builder() {
        let config = LdifConfig::new()
            .with_strict_validation(false)
            .with_max_entries(20)
            .with_max_entry_size(2048)
            .with_line_width(76)
            .with_create_output_dir(true);

        assert!(!config.strict_validation);
        assert_eq!(config.max_entries, 20);
        assert_eq!(config.max_entry_size, 2048);
        assert_eq!(config.line_width, Some(76));
        assert!(config.create_output_dir);
    }

    #[test]
    fn test_ldif_config_validated() {
        assert!(LdifConfig::new().with_max_entries(5).validated().is_ok());

        let err = LdifConfig::new().with_max_entries(0).validated().unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains("max_entries"));

        assert!(LdifConfig::new().with_max_entry_size(0).validated().is_err());
        assert!(LdifConfig::new().with_line_width(4).validated().is_err());
        assert!(LdifConfig::new().with_line_width(8).validated().is_ok());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: LdifConfig =
            serde_json::from_str(r#"{"strict_validation": false, "max_entries": 1000}"#).unwrap();
        assert!(!config.strict_validation);
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.max_entry_size, DEFAULT_MAX_ENTRY_SIZE);
        assert!(config.line_width.is_none());
    }

    #[test]
    fn test_config_deserialize_empty_uses_defaults() {
        let config: LdifConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LdifConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = LdifConfig::new().with_max_entries(500).with_line_width(76);

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: LdifConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_serialization_skips_unset_line_width() {
        let json = serde_json::to_string(&LdifConfig::new()).unwrap();
        assert!(!json.contains("line_width"));
    }
}
