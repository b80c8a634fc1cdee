//! Run configuration loaded from TOML.
//!
//! ```toml
//! model = "gpt-4o"
//! k_values = [1, 5, 10]
//! sample_budget = 10
//! ```
//!
//! Every field is optional. Command-line flags override file values via
//! [`HarnessConfig::merge`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::aggregator::AggregationConfig;

/// User-facing harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Model name recorded in the report artifact.
    pub model: Option<String>,

    /// k values for pass@k. Empty means `[1]`.
    pub k_values: Vec<usize>,

    /// Candidates generated per problem. Inferred from the data when unset.
    pub sample_budget: Option<usize>,
}

impl HarnessConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parse harness config")
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config {:?}", path))?;
        Self::from_toml_str(&raw).with_context(|| format!("load config {:?}", path))
    }

    /// Overlay `other` on top of `self`: set fields in `other` win.
    pub fn merge(mut self, other: HarnessConfig) -> Self {
        if other.model.is_some() {
            self.model = other.model;
        }
        if !other.k_values.is_empty() {
            self.k_values = other.k_values;
        }
        if other.sample_budget.is_some() {
            self.sample_budget = other.sample_budget;
        }
        self
    }

    /// Validate into an [`AggregationConfig`].
    pub fn aggregation(&self) -> crate::domain::Result<AggregationConfig> {
        AggregationConfig::new(&self.k_values, self.sample_budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config = HarnessConfig::from_toml_str(
            "model = \"gpt-4o\"\nk_values = [1, 5]\nsample_budget = 5\n",
        )
        .expect("parse");
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.k_values, vec![1, 5]);
        assert_eq!(config.sample_budget, Some(5));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = HarnessConfig::from_toml_str("").expect("parse");
        assert_eq!(config, HarnessConfig::default());
        let agg = config.aggregation().expect("valid");
        assert_eq!(agg.k_values().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(HarnessConfig::from_toml_str("num_samples = 3\n").is_err());
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = HarnessConfig {
            model: Some("file-model".to_string()),
            k_values: vec![1, 10],
            sample_budget: Some(10),
        };
        let flags = HarnessConfig {
            model: None,
            k_values: vec![5],
            sample_budget: None,
        };
        let merged = file.merge(flags);
        assert_eq!(merged.model.as_deref(), Some("file-model"));
        assert_eq!(merged.k_values, vec![5]);
        assert_eq!(merged.sample_budget, Some(10));
    }

    #[test]
    fn test_zero_k_fails_validation() {
        let config = HarnessConfig {
            k_values: vec![0],
            ..HarnessConfig::default()
        };
        assert!(config.aggregation().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "k_values = [1, 3]").expect("write");
        let config = HarnessConfig::load(file.path()).expect("load");
        assert_eq!(config.k_values, vec![1, 3]);
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = HarnessConfig::load(Path::new("/nonexistent/alloy-eval.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("alloy-eval.toml"));
    }
}
