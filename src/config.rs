// ⚙️ Matcher Configuration - Tunable thresholds as data
// Defaults reproduce the engine's documented behaviour; a JSON file can
// override any subset of fields.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Amount tolerance for fuzzy duplicates and reconciliation (default: $0.01)
    pub amount_tolerance: f64,

    /// Date window for fuzzy duplicates in days (default: 7)
    pub date_tolerance_days: i64,

    /// Max length difference when one description contains the other (default: 10)
    pub description_length_slack: usize,

    /// Confidence for exact duplicate groups (default: 0.95)
    pub duplicate_confidence: f64,

    /// Confidence for recurring patterns (default: 0.85)
    pub pattern_confidence: f64,

    /// Minimum occurrences before a series counts as a pattern (default: 3)
    pub min_pattern_occurrences: usize,

    /// Allowed relative deviation of each gap from the mean gap (default: 0.2)
    pub regularity_tolerance: f64,

    /// Minimum vendor group size for a category suggestion (default: 2)
    pub min_category_occurrences: usize,

    /// Confidence for deposit/payment pairs (default: 0.90)
    pub reconciliation_confidence: f64,

    /// Word-overlap similarity that must be exceeded for reconciliation (default: 0.7)
    pub similarity_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            amount_tolerance: 0.01,
            date_tolerance_days: 7,
            description_length_slack: 10,
            duplicate_confidence: 0.95,
            pattern_confidence: 0.85,
            min_pattern_occurrences: 3,
            regularity_tolerance: 0.2,
            min_category_occurrences: 2,
            reconciliation_confidence: 0.90,
            similarity_threshold: 0.7,
        }
    }
}

impl MatcherConfig {
    /// Load config from JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: MatcherConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let unit_fields = [
            ("duplicate_confidence", self.duplicate_confidence),
            ("pattern_confidence", self.pattern_confidence),
            ("reconciliation_confidence", self.reconciliation_confidence),
            ("similarity_threshold", self.similarity_threshold),
            ("regularity_tolerance", self.regularity_tolerance),
        ];

        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be within [0, 1], got {}", name, value);
            }
        }

        if !self.amount_tolerance.is_finite() || self.amount_tolerance < 0.0 {
            bail!("amount_tolerance must be a non-negative number, got {}", self.amount_tolerance);
        }

        if self.date_tolerance_days < 0 {
            bail!("date_tolerance_days must not be negative, got {}", self.date_tolerance_days);
        }

        // Pattern matches carry at least 3 members
        if self.min_pattern_occurrences < 3 {
            bail!(
                "min_pattern_occurrences must be at least 3, got {}",
                self.min_pattern_occurrences
            );
        }

        // Category suggestions carry at least 2 members
        if self.min_category_occurrences < 2 {
            bail!(
                "min_category_occurrences must be at least 2, got {}",
                self.min_category_occurrences
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.duplicate_confidence, 0.95);
        assert_eq!(config.min_pattern_occurrences, 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "similarity_threshold": 0.5, "date_tolerance_days": 3 }}"#).unwrap();

        let config = MatcherConfig::from_file(file.path()).unwrap();

        assert_eq!(config.similarity_threshold, 0.5);
        assert_eq!(config.date_tolerance_days, 3);
        assert_eq!(config.pattern_confidence, 0.85);
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        let config = MatcherConfig {
            pattern_confidence: 1.5,
            ..MatcherConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pattern_confidence"));
    }

    #[test]
    fn test_rejects_single_occurrence_patterns() {
        let config = MatcherConfig {
            min_pattern_occurrences: 1,
            ..MatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_two_occurrence_patterns() {
        let config = MatcherConfig {
            min_pattern_occurrences: 2,
            ..MatcherConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_pattern_occurrences"));
    }

    #[test]
    fn test_rejects_single_member_category_groups() {
        let config = MatcherConfig {
            min_category_occurrences: 1,
            ..MatcherConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_category_occurrences"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(MatcherConfig::from_file("/nonexistent/matcher.json").is_err());
    }
}
