// 🧩 Single-File Matcher - Runs every detector over one statement
// Output order is fixed: duplicates, patterns, category suggestions,
// reconciliations. No cross-type de-duplication or ranking.

use crate::config::MatcherConfig;
use crate::deduplication::DuplicateDetector;
use crate::matches::{summarize, Match};
use crate::patterns::PatternDetector;
use crate::reconciliation::ReconciliationMatcher;
use crate::rules::{CategoryRuleSet, CategorySuggester};
use crate::transaction::Transaction;
use crate::vendor::{PrefixVendorExtractor, VendorExtractor};
use anyhow::Result;

pub struct SingleFileMatcher {
    config: MatcherConfig,
    extractor: Box<dyn VendorExtractor>,
    duplicates: DuplicateDetector,
    patterns: PatternDetector,
    categories: CategorySuggester,
    reconciliation: ReconciliationMatcher,
}

impl SingleFileMatcher {
    /// Matcher with default thresholds, built-in category table and the
    /// three-token vendor extractor
    pub fn new() -> Self {
        Self::build(
            MatcherConfig::default(),
            CategoryRuleSet::builtin(),
            Box::new(PrefixVendorExtractor::new()),
        )
    }

    fn build(config: MatcherConfig, rules: CategoryRuleSet, extractor: Box<dyn VendorExtractor>) -> Self {
        SingleFileMatcher {
            duplicates: DuplicateDetector::from_config(&config),
            patterns: PatternDetector::from_config(&config),
            categories: CategorySuggester::from_config(&config, rules),
            reconciliation: ReconciliationMatcher::from_config(&config),
            config,
            extractor,
        }
    }

    /// Replace thresholds; the config is validated first
    pub fn with_config(self, config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        let SingleFileMatcher { categories, extractor, .. } = self;
        Ok(Self::build(config, categories.rules, extractor))
    }

    pub fn with_rules(mut self, rules: CategoryRuleSet) -> Self {
        self.categories.rules = rules;
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn VendorExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Fuzzy pairwise duplicate check with this matcher's tolerances
    pub fn is_duplicate(&self, a: &Transaction, b: &Transaction) -> bool {
        self.duplicates.is_duplicate(a, b)
    }

    pub fn find_exact_duplicates(&self, transactions: &[Transaction]) -> Vec<Match> {
        self.duplicates.find_exact_duplicates(transactions)
    }

    pub fn find_pattern_matches(&self, transactions: &[Transaction]) -> Vec<Match> {
        self.patterns
            .find_pattern_matches(transactions, self.extractor.as_ref())
    }

    pub fn generate_category_suggestions(&self, transactions: &[Transaction]) -> Vec<Match> {
        self.categories
            .generate_category_suggestions(transactions, self.extractor.as_ref())
    }

    pub fn find_reconciliation_matches(&self, transactions: &[Transaction]) -> Vec<Match> {
        self.reconciliation.find_reconciliation_matches(transactions)
    }

    /// Run all detectors and concatenate their results in fixed order
    pub fn find_matches(&self, transactions: &[Transaction]) -> Vec<Match> {
        tracing::debug!(
            transactions = transactions.len(),
            "analyzing transactions for single-file matches"
        );

        let mut matches = self.find_exact_duplicates(transactions);
        matches.extend(self.find_pattern_matches(transactions));
        matches.extend(self.generate_category_suggestions(transactions));
        matches.extend(self.find_reconciliation_matches(transactions));

        let summary = summarize(&matches);
        tracing::info!(
            total = summary.total,
            duplicates = summary.duplicates,
            patterns = summary.patterns,
            categories = summary.category_suggestions,
            reconciliations = summary.reconciliations,
            "single-file matching complete"
        );

        matches
    }
}

impl Default for SingleFileMatcher {
    fn default() -> Self {
        Self::new()
    }
}
