//! Engine settings
//!
//! One TOML document with optional `[fetch]`, `[scan]` and `[analysis]`
//! sections. Missing keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use footprint_core::{AnalysisConfig, ConfigError};
use footprint_net::{FetchConfig, MAX_TIMEOUT_SECS};

/// Default cap on in-flight probes
pub const DEFAULT_MAX_CONCURRENT: usize = 25;

/// Fan-out limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum probes in flight at once
    pub max_concurrent: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

/// Everything the engine can be configured with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchConfig,
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 || self.fetch.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Invalid {
                key: "fetch.timeout_secs",
                reason: format!(
                    "{} is outside 1..={}",
                    self.fetch.timeout_secs, MAX_TIMEOUT_SECS
                ),
            });
        }
        if self.scan.max_concurrent == 0 {
            return Err(ConfigError::Invalid {
                key: "scan.max_concurrent",
                reason: "must be at least 1".to_string(),
            });
        }
        self.analysis.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.scan.max_concurrent, 25);
        assert_eq!(settings.fetch.timeout_secs, 4);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_sections_override_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [fetch]
            timeout_secs = 8

            [scan]
            max_concurrent = 10

            [analysis]
            deep_analysis_sites = ["GitHub", "Codeberg"]

            [analysis.interest_topics]
            Astronomy = ["telescope", "nebula"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.fetch.timeout_secs, 8);
        assert_eq!(settings.scan.max_concurrent, 10);
        assert!(settings.analysis.is_deep_analysis_site("Codeberg"));
        assert!(!settings.analysis.is_deep_analysis_site("Medium"));
        assert_eq!(settings.analysis.interest_topics.len(), 1);
        assert_eq!(settings.analysis.excerpt_max_chars, 1200);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = Settings::from_toml_str("[scan]\nmax_concurrent = 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "scan.max_concurrent", .. })
        ));
    }

    #[test]
    fn test_timeout_out_of_range_rejected() {
        let result = Settings::from_toml_str("[fetch]\ntimeout_secs = 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "fetch.timeout_secs", .. })
        ));
    }

    #[test]
    fn test_malformed_document_rejected() {
        assert!(matches!(
            Settings::from_toml_str("[scan\nmax_concurrent = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
