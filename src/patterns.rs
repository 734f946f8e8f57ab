// 🔁 Recurring Pattern Detection
// Same vendor + same amount + regular spacing = recurring payment.

use crate::config::MatcherConfig;
use crate::matches::{Frequency, Match, MatchType};
use crate::transaction::Transaction;
use crate::vendor::{group_by_vendor, VendorExtractor};
use std::collections::HashMap;

pub struct PatternDetector {
    /// Confidence for recurring series (default: 0.85)
    pub confidence: f64,

    /// Minimum occurrences per series (default: 3)
    pub min_occurrences: usize,

    /// Allowed relative deviation of any gap from the mean gap (default: 0.2)
    pub regularity_tolerance: f64,
}

impl PatternDetector {
    pub fn new() -> Self {
        Self::from_config(&MatcherConfig::default())
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        PatternDetector {
            confidence: config.pattern_confidence,
            min_occurrences: config.min_pattern_occurrences,
            regularity_tolerance: config.regularity_tolerance,
        }
    }

    pub fn find_pattern_matches(
        &self,
        transactions: &[Transaction],
        extractor: &dyn VendorExtractor,
    ) -> Vec<Match> {
        let mut patterns = Vec::new();

        for group in group_by_vendor(transactions, extractor) {
            if group.transactions.len() < self.min_occurrences {
                continue;
            }

            for (cents, mut series) in group_by_cents(&group.transactions) {
                if series.len() < self.min_occurrences {
                    continue;
                }

                series.sort_by_key(|tx| tx.date);

                let gaps = date_gaps(&series);
                if !self.is_regular(&gaps) {
                    continue;
                }

                let mean_gap = mean(&gaps);
                let frequency = Frequency::from_mean_gap_days(mean_gap);
                let amount = cents as f64 / 100.0;

                let reason = format!(
                    "Found {} recurring {} payments of ${:.2} to {}",
                    series.len(),
                    frequency,
                    amount,
                    group.vendor
                );

                patterns.push(
                    Match::new(
                        MatchType::Pattern,
                        &format!("{}_{:.2}", group.vendor, amount),
                        self.confidence,
                        series.into_iter().cloned().collect(),
                        reason,
                    )
                    .with_suggestion(format!("Recurring {} payment to {}", frequency, group.vendor))
                    .with_frequency(frequency),
                );
            }
        }

        tracing::debug!(patterns = patterns.len(), "pattern pass complete");
        patterns
    }

    /// Every gap must sit within the tolerance of the mean; one outlier
    /// disqualifies the whole series.
    pub fn is_regular(&self, gaps: &[f64]) -> bool {
        if gaps.is_empty() {
            return false;
        }

        let avg = mean(gaps);
        if avg <= 0.0 {
            return false;
        }

        gaps.iter()
            .all(|gap| (gap - avg).abs() / avg <= self.regularity_tolerance)
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Sub-group by amount in cents, first-seen order
fn group_by_cents<'a>(transactions: &[&'a Transaction]) -> Vec<(i64, Vec<&'a Transaction>)> {
    let mut groups: Vec<(i64, Vec<&'a Transaction>)> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for &tx in transactions {
        let cents = tx.cents();
        match index.get(&cents) {
            Some(&i) => groups[i].1.push(tx),
            None => {
                index.insert(cents, groups.len());
                groups.push((cents, vec![tx]));
            }
        }
    }

    groups
}

/// Consecutive gaps in days; input must be sorted by date
fn date_gaps(sorted: &[&Transaction]) -> Vec<f64> {
    sorted
        .windows(2)
        .map(|pair| (pair[1].date - pair[0].date).num_days() as f64)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
