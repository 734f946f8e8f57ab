// 🔍 Deduplication - Detect duplicate postings within one statement
// Two tiers: a strict composite-key pass (used by the engine) and a fuzzy
// pairwise predicate exposed for callers that want looser checks.

use crate::config::MatcherConfig;
use crate::matches::{Match, MatchType};
use crate::normalize::normalize;
use crate::transaction::{amounts_within, Transaction};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Composite grouping key: cents, lower-cased raw description, date
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DuplicateKey {
    cents: i64,
    description: String,
    date: NaiveDate,
}

impl DuplicateKey {
    fn of(tx: &Transaction) -> Self {
        DuplicateKey {
            cents: tx.cents(),
            description: tx.description.to_lowercase().trim().to_string(),
            date: tx.date,
        }
    }
}

// ============================================================================
// DUPLICATE DETECTOR
// ============================================================================

pub struct DuplicateDetector {
    /// Confidence for exact duplicate groups (default: 0.95)
    pub confidence: f64,

    /// Amount tolerance for the fuzzy predicate (default: $0.01)
    pub amount_tolerance: f64,

    /// Date window for the fuzzy predicate in days (default: 7)
    pub date_tolerance_days: i64,

    /// Max length difference for substring matches (default: 10)
    pub description_length_slack: usize,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::from_config(&MatcherConfig::default())
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        DuplicateDetector {
            confidence: config.duplicate_confidence,
            amount_tolerance: config.amount_tolerance,
            date_tolerance_days: config.date_tolerance_days,
            description_length_slack: config.description_length_slack,
        }
    }

    /// Group transactions sharing (amount-to-cent, description, date).
    ///
    /// A transaction id is consumed by at most one group; groups are emitted
    /// in order of their first member.
    pub fn find_exact_duplicates(&self, transactions: &[Transaction]) -> Vec<Match> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut groups: Vec<Vec<&Transaction>> = Vec::new();
        let mut group_index: HashMap<DuplicateKey, usize> = HashMap::new();

        for tx in transactions {
            if !visited.insert(tx.id.as_str()) {
                continue;
            }

            let key = DuplicateKey::of(tx);
            match group_index.get(&key) {
                Some(&i) => groups[i].push(tx),
                None => {
                    group_index.insert(key, groups.len());
                    groups.push(vec![tx]);
                }
            }
        }

        let matches: Vec<Match> = groups
            .into_iter()
            .filter(|group| group.len() > 1)
            .map(|group| {
                let seed = group[0];
                let reason = format!(
                    "Found {} exact duplicates with same amount, description and date (${:.2} | {} | {})",
                    group.len(),
                    seed.amount,
                    seed.description.trim(),
                    seed.date
                );

                Match::new(
                    MatchType::Duplicate,
                    &seed.id,
                    self.confidence,
                    group.into_iter().cloned().collect(),
                    reason,
                )
                .with_suggestion("Review and remove the extra postings".to_string())
            })
            .collect();

        tracing::debug!(groups = matches.len(), "exact duplicate pass complete");
        matches
    }

    /// Fuzzy pairwise duplicate check.
    ///
    /// Amounts within tolerance, dates within the window, and normalized
    /// descriptions either equal or one containing the other with a small
    /// length difference.
    pub fn is_duplicate(&self, a: &Transaction, b: &Transaction) -> bool {
        if !amounts_within(a.amount, b.amount, self.amount_tolerance) {
            return false;
        }

        let date_diff = (a.date - b.date).num_days().abs();
        if date_diff > self.date_tolerance_days {
            return false;
        }

        let desc_a = normalize(&a.description);
        let desc_b = normalize(&b.description);

        if desc_a == desc_b {
            return true;
        }

        let contains = desc_a.contains(&desc_b) || desc_b.contains(&desc_a);
        let length_gap = desc_a.chars().count().abs_diff(desc_b.chars().count());
        contains && length_gap <= self.description_length_slack
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_transaction(id: &str, date: &str, amount: f64, description: &str) -> Transaction {
        Transaction::new(
            id,
            amount,
            description,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        )
    }

    #[test]
    fn test_exact_duplicates_grouped() {
        let detector = DuplicateDetector::new();

        let transactions = vec![
            create_test_transaction("a", "2024-12-25", -45.99, "Starbucks"),
            create_test_transaction("b", "2024-12-25", -45.99, "Starbucks"),
        ];

        let matches = detector.find_exact_duplicates(&transactions);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Duplicate);
        assert_eq!(matches[0].confidence, 0.95);
        assert_eq!(matches[0].id, "duplicate_a");
        assert_eq!(matches[0].transaction_ids(), vec!["a", "b"]);
        assert!(matches[0].reason.contains("Found 2 exact duplicates"));
    }

    #[test]
    fn test_exact_key_is_case_and_padding_insensitive() {
        let detector = DuplicateDetector::new();

        let transactions = vec![
            create_test_transaction("a", "2024-12-25", -45.99, "STARBUCKS "),
            create_test_transaction("b", "2024-12-25", -45.99, "starbucks"),
            create_test_transaction("c", "2024-12-25", -45.991, " Starbucks"),
        ];

        let matches = detector.find_exact_duplicates(&transactions);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].transactions.len(), 3);
    }

    #[test]
    fn test_exact_key_does_not_strip_reference_numbers() {
        let detector = DuplicateDetector::new();

        let transactions = vec![
            create_test_transaction("a", "2024-12-25", -45.99, "STARBUCKS #4521"),
            create_test_transaction("b", "2024-12-25", -45.99, "STARBUCKS #4522"),
        ];

        assert!(detector.find_exact_duplicates(&transactions).is_empty());
    }

    #[test]
    fn test_separate_groups_keep_first_seen_order() {
        let detector = DuplicateDetector::new();

        let transactions = vec![
            create_test_transaction("x1", "2024-01-02", -10.0, "Lunch"),
            create_test_transaction("y1", "2024-01-03", -20.0, "Fuel"),
            create_test_transaction("y2", "2024-01-03", -20.0, "Fuel"),
            create_test_transaction("x2", "2024-01-02", -10.0, "Lunch"),
            create_test_transaction("z", "2024-01-04", -30.0, "Books"),
        ];

        let matches = detector.find_exact_duplicates(&transactions);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "duplicate_x1");
        assert_eq!(matches[1].id, "duplicate_y1");
    }

    #[test]
    fn test_repeated_id_consumed_once() {
        let detector = DuplicateDetector::new();

        let tx = create_test_transaction("same", "2024-01-02", -10.0, "Lunch");
        let transactions = vec![tx.clone(), tx];

        assert!(detector.find_exact_duplicates(&transactions).is_empty());
    }

    #[test]
    fn test_different_dates_are_not_exact_duplicates() {
        let detector = DuplicateDetector::new();

        let transactions = vec![
            create_test_transaction("a", "2024-12-25", -45.99, "Starbucks"),
            create_test_transaction("b", "2024-12-26", -45.99, "Starbucks"),
        ];

        assert!(detector.find_exact_duplicates(&transactions).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(DuplicateDetector::new().find_exact_duplicates(&[]).is_empty());
    }

    #[test]
    fn test_is_duplicate_within_window() {
        let detector = DuplicateDetector::new();

        let tx1 = create_test_transaction("a", "2024-12-25", -45.99, "STARBUCKS #4521");
        let tx2 = create_test_transaction("b", "2024-12-30", -46.00, "Starbucks");

        assert!(detector.is_duplicate(&tx1, &tx2));
    }

    #[test]
    fn test_is_duplicate_substring_with_slack() {
        let detector = DuplicateDetector::new();

        let short = create_test_transaction("a", "2024-12-25", -45.99, "Starbucks");
        let close = create_test_transaction("b", "2024-12-25", -45.99, "Starbucks Coffee");
        let far = create_test_transaction("c", "2024-12-25", -45.99, "Starbucks Coffee Downtown Seattle");

        assert!(detector.is_duplicate(&short, &close));
        assert!(!detector.is_duplicate(&short, &far));
    }

    #[test]
    fn test_is_duplicate_slack_counts_characters() {
        let detector = DuplicateDetector::new();

        // 7 characters apart, 13 bytes apart
        let short = create_test_transaction("a", "2024-12-25", -8.40, "Café");
        let long = create_test_transaction("b", "2024-12-25", -8.40, "Café éééééé");

        assert!(detector.is_duplicate(&short, &long));
    }

    #[test]
    fn test_is_duplicate_rejects_out_of_tolerance() {
        let detector = DuplicateDetector::new();

        let base = create_test_transaction("a", "2024-12-01", -45.99, "Starbucks");
        let later = create_test_transaction("b", "2024-12-09", -45.99, "Starbucks");
        let pricier = create_test_transaction("c", "2024-12-01", -46.01, "Starbucks");
        let other = create_test_transaction("d", "2024-12-01", -45.99, "Amazon");

        assert!(!detector.is_duplicate(&base, &later));
        assert!(!detector.is_duplicate(&base, &pricier));
        assert!(!detector.is_duplicate(&base, &other));
    }
}
