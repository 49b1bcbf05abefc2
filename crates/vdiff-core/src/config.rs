//! Analysis configuration
//!
//! Configuration is plain data with serde support and loads from TOML. Every
//! field has a default, so a configuration file only lists what it changes:
//!
//! ```toml
//! parallel_classification = true
//!
//! [enumeration]
//! max_iterations = 10000
//!
//! [oracle]
//! cache_capacity = 0
//! ```

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use vdiff_view::EnumerationLimits;

/// Configuration of a [`DiffAnalyzer`](crate::DiffAnalyzer)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Classify artifacts on the rayon thread pool
    pub parallel_classification: bool,
    /// Drop unchanged subtrees without edits before analysing a diff
    pub cut_non_edited_subtrees: bool,
    /// Unique view enumeration bounds
    pub enumeration: EnumerationConfig,
    /// Satisfiability oracle settings
    pub oracle: OracleConfig,
    /// Logging settings
    pub telemetry: TelemetryConfig,
}

impl AnalysisConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With parallel classification
    #[inline]
    #[must_use]
    pub fn with_parallel_classification(mut self, parallel: bool) -> Self {
        self.parallel_classification = parallel;
        self
    }

    /// With cutting of non-edited subtrees
    #[inline]
    #[must_use]
    pub fn with_cut_non_edited_subtrees(mut self, cut: bool) -> Self {
        self.cut_non_edited_subtrees = cut;
        self
    }

    /// With an iteration cap for view enumeration
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max: u64) -> Self {
        self.enumeration.max_iterations = Some(max);
        self
    }

    /// With a time budget for view enumeration
    #[inline]
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.enumeration.time_budget_ms = Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// With an oracle cache of `capacity` entries; zero disables caching
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.oracle.cache_capacity = capacity;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> AnalysisResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Render as a TOML document
    pub fn to_toml_string(&self) -> AnalysisResult<String> {
        toml::to_string(self).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    /// Reject settings no analysis can run with
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.enumeration.max_iterations == Some(0) {
            return Err(AnalysisError::Config(
                "enumeration.max_iterations must be positive".into(),
            ));
        }
        if self.telemetry.filter.trim().is_empty() {
            return Err(AnalysisError::Config("telemetry.filter must not be empty".into()));
        }
        Ok(())
    }
}

/// Bounds on unique view enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    /// Maximum number of satisfiability checks
    pub max_iterations: Option<u64>,
    /// Wall-clock budget in milliseconds
    pub time_budget_ms: Option<u64>,
}

impl EnumerationConfig {
    /// Limits for one enumeration starting now
    #[must_use]
    pub fn limits(&self) -> EnumerationLimits {
        let mut limits = EnumerationLimits::unlimited();
        if let Some(max) = self.max_iterations {
            limits = limits.with_max_iterations(max);
        }
        if let Some(ms) = self.time_budget_ms {
            limits = limits.with_time_budget(Duration::from_millis(ms));
        }
        limits
    }
}

/// Oracle settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Memoized satisfiability answers; zero disables the cache
    pub cache_capacity: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 10_000,
        }
    }
}

/// Output format of log events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directives used when `RUST_LOG` is unset
    pub filter: String,
    /// Event format
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let config = AnalysisConfig::new();
        assert!(!config.parallel_classification);
        assert_eq!(config.oracle.cache_capacity, 10_000);
        assert_eq!(config.enumeration.limits(), EnumerationLimits::unlimited());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_set_fields() {
        let config = AnalysisConfig::new()
            .with_parallel_classification(true)
            .with_max_iterations(50)
            .with_time_budget(Duration::from_secs(2))
            .with_cache_capacity(0);
        assert!(config.parallel_classification);
        assert_eq!(config.enumeration.max_iterations, Some(50));
        assert_eq!(config.enumeration.time_budget_ms, Some(2000));
        assert_eq!(config.oracle.cache_capacity, 0);

        let limits = config.enumeration.limits();
        assert_eq!(limits.max_iterations, Some(50));
        assert!(limits.deadline.is_some());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            "parallel_classification = true\n\n[enumeration]\nmax_iterations = 7\n",
        )
        .unwrap();
        assert!(config.parallel_classification);
        assert_eq!(config.enumeration.max_iterations, Some(7));
        assert_eq!(config.oracle, OracleConfig::default());
        assert_eq!(config.telemetry.format, LogFormat::Text);
    }

    #[test]
    fn toml_round_trip() {
        let mut config = AnalysisConfig::new()
            .with_cut_non_edited_subtrees(true)
            .with_max_iterations(3);
        config.telemetry.format = LogFormat::Json;
        let text = config.to_toml_string().unwrap();
        assert_eq!(AnalysisConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = AnalysisConfig::from_toml_str("[enumeration]\nmax_iterations = 0\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
        assert!(AnalysisConfig::from_toml_str("parallel_classification = 3").is_err());
        assert!(AnalysisConfig::load("/nonexistent/vdiff.toml").is_err());
    }
}
