// 🔗 Match Records - Output of the single-file matching engine

use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MATCH TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Same amount, description and date posted more than once
    Duplicate,

    /// Regularly spaced, same-amount, same-vendor series
    Pattern,

    /// Vendor group that maps onto a bookkeeping category
    CategorySuggestion,

    /// Deposit paired with offsetting payment(s)
    Reconciliation,
}

impl MatchType {
    /// Prefix used when building deterministic match ids
    pub fn id_prefix(&self) -> &str {
        match self {
            MatchType::Duplicate => "duplicate",
            MatchType::Pattern => "pattern",
            MatchType::CategorySuggestion => "category",
            MatchType::Reconciliation => "reconciliation",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchType::Duplicate => "Duplicate",
            MatchType::Pattern => "Pattern",
            MatchType::CategorySuggestion => "Category Suggestion",
            MatchType::Reconciliation => "Reconciliation",
        };
        f.write_str(name)
    }
}

// ============================================================================
// FREQUENCY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    /// Classify a mean gap between occurrences
    pub fn from_mean_gap_days(days: f64) -> Self {
        if days <= 7.0 {
            Frequency::Weekly
        } else if days <= 14.0 {
            Frequency::BiWeekly
        } else if days <= 35.0 {
            Frequency::Monthly
        } else if days <= 90.0 {
            Frequency::Quarterly
        } else {
            Frequency::Annual
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// MATCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Deterministic id: `{type prefix}_{seed}`
    pub id: String,

    #[serde(rename = "type")]
    pub match_type: MatchType,

    /// Heuristic score in [0, 1]
    pub confidence: f64,

    pub transactions: Vec<Transaction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    pub reason: String,

    /// Suggested bookkeeping category (category suggestions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Recurrence frequency (patterns only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

impl Match {
    pub fn new(
        match_type: MatchType,
        seed: &str,
        confidence: f64,
        transactions: Vec<Transaction>,
        reason: String,
    ) -> Self {
        Match {
            id: format!("{}_{}", match_type.id_prefix(), seed),
            match_type,
            confidence,
            transactions,
            suggestion: None,
            reason,
            category: None,
            frequency: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn transaction_ids(&self) -> Vec<&str> {
        self.transactions.iter().map(|tx| tx.id.as_str()).collect()
    }

    pub fn contains(&self, transaction_id: &str) -> bool {
        self.transactions.iter().any(|tx| tx.id == transaction_id)
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Per-type counts for a single analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total: usize,
    pub duplicates: usize,
    pub patterns: usize,
    pub category_suggestions: usize,
    pub reconciliations: usize,
}

impl MatchSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} matches: {} duplicates, {} patterns, {} category suggestions, {} reconciliations",
            self.total, self.duplicates, self.patterns, self.category_suggestions, self.reconciliations
        )
    }
}

pub fn summarize(matches: &[Match]) -> MatchSummary {
    let mut summary = MatchSummary {
        total: matches.len(),
        ..MatchSummary::default()
    };

    for m in matches {
        match m.match_type {
            MatchType::Duplicate => summary.duplicates += 1,
            MatchType::Pattern => summary.patterns += 1,
            MatchType::CategorySuggestion => summary.category_suggestions += 1,
            MatchType::Reconciliation => summary.reconciliations += 1,
        }
    }

    summary
}
