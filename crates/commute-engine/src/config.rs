//! Analyzer configuration, read from TOML.
//!
//! ```toml
//! correction = "time-of-day"
//! default_interval_minutes = 15
//!
//! [provider]
//! kind = "fixture"
//! path = "samples.json"
//! ```
//!
//! Every key is optional; see [`AnalyzerConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::correction::CorrectionModel;
use crate::error::{EngineError, Result};

/// Free-flow duration the synthetic provider assumes by default (30 min).
pub const DEFAULT_FREE_FLOW_SECONDS: i64 = 1800;

pub const DEFAULT_INTERVAL_MINUTES: u32 = 10;

/// Where traffic samples come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProviderConfig {
    Synthetic {
        #[serde(default = "default_free_flow_seconds")]
        free_flow_seconds: i64,
    },
    Fixture {
        path: PathBuf,
    },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Synthetic {
            free_flow_seconds: DEFAULT_FREE_FLOW_SECONDS,
        }
    }
}

fn default_free_flow_seconds() -> i64 {
    DEFAULT_FREE_FLOW_SECONDS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Pre-processing applied to provider traffic durations.
    pub correction: CorrectionModel,
    pub default_interval_minutes: u32,
    pub provider: ProviderConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            correction: CorrectionModel::None,
            default_interval_minutes: DEFAULT_INTERVAL_MINUTES,
            provider: ProviderConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] on malformed TOML, a zero
    /// interval, or a non-positive synthetic free-flow duration.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: AnalyzerConfig =
            toml::from_str(s).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. Relative fixture paths resolve against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::InvalidConfig(format!("'{}': {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&text)?;
        if let ProviderConfig::Fixture { path: fixture } = &mut config.provider {
            if fixture.is_relative() {
                if let Some(dir) = path.parent() {
                    *fixture = dir.join(&*fixture);
                }
            }
        }
        log::debug!("loaded config {}: {:?}", path.display(), config);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_interval_minutes == 0 {
            return Err(EngineError::InvalidConfig(
                "default_interval_minutes must be positive".to_string(),
            ));
        }
        if let ProviderConfig::Synthetic { free_flow_seconds } = &self.provider {
            if *free_flow_seconds <= 0 {
                return Err(EngineError::InvalidConfig(format!(
                    "synthetic free_flow_seconds must be positive, got {free_flow_seconds}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AnalyzerConfig::from_toml_str("").unwrap(), AnalyzerConfig::default());
    }

    #[test]
    fn test_full_document() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
            correction = "time-of-day"
            default_interval_minutes = 15

            [provider]
            kind = "fixture"
            path = "samples.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.correction, CorrectionModel::TimeOfDay);
        assert_eq!(config.default_interval_minutes, 15);
        assert_eq!(
            config.provider,
            ProviderConfig::Fixture {
                path: PathBuf::from("samples.json")
            }
        );
    }

    #[test]
    fn test_synthetic_default_free_flow() {
        let config = AnalyzerConfig::from_toml_str("[provider]\nkind = \"synthetic\"\n").unwrap();
        assert_eq!(config.provider, ProviderConfig::default());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = AnalyzerConfig::from_toml_str("default_interval_minutes = 0")
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid config"), "got: {err}");
    }

    #[test]
    fn test_rejects_unknown_correction() {
        assert!(AnalyzerConfig::from_toml_str("correction = \"double\"").is_err());
    }
}
