// 🏷️ Category Rules - Keyword families as data
// Vendor signatures are tested against an ordered table of keyword families;
// the first family with a matching keyword wins.

use crate::config::MatcherConfig;
use crate::matches::{Match, MatchType};
use crate::transaction::Transaction;
use crate::vendor::{group_by_vendor, VendorExtractor};
use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// CONFIDENCE TIERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// General category words and everything else
    Floor,

    /// Generic but telling words ("office", "restaurant")
    Generic,

    /// Named brands that pin down the category
    Brand,
}

impl ConfidenceTier {
    pub fn confidence(&self) -> f64 {
        match self {
            ConfidenceTier::Floor => 0.7,
            ConfidenceTier::Generic => 0.8,
            ConfidenceTier::Brand => 0.95,
        }
    }
}

// ============================================================================
// BUILT-IN TABLE
// ============================================================================

type FamilyRow = (&'static str, &'static [(&'static str, ConfidenceTier)]);

use ConfidenceTier::{Brand, Floor, Generic};

/// Ordered: earlier families win when a signature hits several.
const BUILTIN_FAMILIES: &[FamilyRow] = &[
    (
        "Office Supplies",
        &[("office", Generic), ("staples", Floor), ("depot", Floor), ("supplies", Floor)],
    ),
    (
        "Meals & Entertainment",
        &[("starbucks", Brand), ("mcdonald", Floor), ("restaurant", Generic), ("cafe", Floor)],
    ),
    (
        "Software & Subscriptions",
        &[("microsoft", Brand), ("adobe", Floor), ("software", Floor)],
    ),
    (
        "Utilities",
        &[("electric", Floor), ("gas", Floor), ("water", Floor), ("utility", Floor)],
    ),
    ("Rent", &[("rent", Floor), ("lease", Floor)]),
    ("Insurance", &[("insurance", Floor), ("premium", Floor)]),
];

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,

    #[serde(default = "default_tier")]
    pub tier: ConfidenceTier,
}

fn default_tier() -> ConfidenceTier {
    ConfidenceTier::Floor
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFamily {
    pub category: String,
    pub keywords: Vec<Keyword>,
}

impl CategoryFamily {
    /// Case-insensitive substring match of any keyword
    pub fn matches(&self, vendor: &str) -> bool {
        let vendor_lower = vendor.to_lowercase();
        self.keywords
            .iter()
            .any(|k| vendor_lower.contains(&k.text.to_lowercase()))
    }
}

/// Result of classifying one vendor signature
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryClassification {
    pub category: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRuleSet {
    families: Vec<CategoryFamily>,
}

impl CategoryRuleSet {
    /// The static, ordered keyword table
    pub fn builtin() -> Self {
        let families = BUILTIN_FAMILIES
            .iter()
            .map(|(category, keywords)| CategoryFamily {
                category: category.to_string(),
                keywords: keywords
                    .iter()
                    .map(|(text, tier)| Keyword {
                        text: text.to_string(),
                        tier: *tier,
                    })
                    .collect(),
            })
            .collect();

        CategoryRuleSet { families }
    }

    /// Build from an ordered family list; empty keywords are rejected since
    /// they would match every vendor
    pub fn from_families(families: Vec<CategoryFamily>) -> Result<Self> {
        for family in &families {
            if family.keywords.iter().any(|k| k.text.trim().is_empty()) {
                bail!("Category '{}' has an empty keyword", family.category);
            }
        }

        Ok(CategoryRuleSet { families })
    }

    /// Load an ordered family table from JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read category rules file: {:?}", path.as_ref()))?;

        let families: Vec<CategoryFamily> =
            serde_json::from_str(&content).context("Failed to parse category rules JSON")?;

        Self::from_families(families)
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// First matching family decides the category; the confidence is the
    /// highest tier of any keyword in the table found in the signature.
    pub fn classify(&self, vendor: &str) -> Option<CategoryClassification> {
        let family = self.families.iter().find(|f| f.matches(vendor))?;

        let vendor_lower = vendor.to_lowercase();
        let tier = self
            .families
            .iter()
            .flat_map(|f| f.keywords.iter())
            .filter(|k| vendor_lower.contains(&k.text.to_lowercase()))
            .map(|k| k.tier)
            .max()
            .unwrap_or(ConfidenceTier::Floor);

        Some(CategoryClassification {
            category: family.category.clone(),
            confidence: tier.confidence(),
        })
    }
}

impl Default for CategoryRuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// CATEGORY SUGGESTER
// ============================================================================

pub struct CategorySuggester {
    pub rules: CategoryRuleSet,

    /// Minimum vendor group size (default: 2)
    pub min_occurrences: usize,
}

impl CategorySuggester {
    pub fn new() -> Self {
        Self::from_config(&MatcherConfig::default(), CategoryRuleSet::builtin())
    }

    pub fn from_config(config: &MatcherConfig, rules: CategoryRuleSet) -> Self {
        CategorySuggester {
            rules,
            min_occurrences: config.min_category_occurrences,
        }
    }

    pub fn generate_category_suggestions(
        &self,
        transactions: &[Transaction],
        extractor: &dyn VendorExtractor,
    ) -> Vec<Match> {
        let mut suggestions = Vec::new();

        for group in group_by_vendor(transactions, extractor) {
            if group.transactions.len() < self.min_occurrences {
                continue;
            }

            let Some(classification) = self.rules.classify(&group.vendor) else {
                continue;
            };

            let reason = format!(
                "{} appears {} times and typically belongs to \"{}\" category",
                group.vendor,
                group.transactions.len(),
                classification.category
            );

            suggestions.push(
                Match::new(
                    MatchType::CategorySuggestion,
                    &group.vendor,
                    classification.confidence,
                    group.transactions.into_iter().cloned().collect(),
                    reason,
                )
                .with_suggestion(format!(
                    "Categorize all {} transactions as \"{}\"",
                    group.vendor, classification.category
                ))
                .with_category(&classification.category),
            );
        }

        tracing::debug!(suggestions = suggestions.len(), "category pass complete");
        suggestions
    }
}

impl Default for CategorySuggester {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
