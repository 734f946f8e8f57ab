// ⚖️ Reconciliation - Pair deposits with offsetting payments
// A deposit and a payment reconcile when their amounts cancel out and their
// descriptions share most of their words.

use crate::config::MatcherConfig;
use crate::matches::{Match, MatchType};
use crate::transaction::{amounts_within, Transaction};
use std::collections::HashSet;

pub struct ReconciliationMatcher {
    /// Confidence for each deposit/payment group (default: 0.90)
    pub confidence: f64,

    /// Tolerance on |deposit + payment| (default: $0.01)
    pub amount_tolerance: f64,

    /// Word similarity must exceed this (default: 0.7)
    pub similarity_threshold: f64,
}

impl ReconciliationMatcher {
    pub fn new() -> Self {
        Self::from_config(&MatcherConfig::default())
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        ReconciliationMatcher {
            confidence: config.reconciliation_confidence,
            amount_tolerance: config.amount_tolerance,
            similarity_threshold: config.similarity_threshold,
        }
    }

    /// One match per deposit that has at least one qualifying payment.
    ///
    /// Payments are not claimed: the same payment may reconcile several deposits.
    pub fn find_reconciliation_matches(&self, transactions: &[Transaction]) -> Vec<Match> {
        let deposits = transactions.iter().filter(|tx| tx.is_deposit());
        let payments: Vec<&Transaction> = transactions.iter().filter(|tx| tx.is_payment()).collect();

        let mut matches = Vec::new();

        for deposit in deposits {
            let counterparts: Vec<&Transaction> = payments
                .iter()
                .copied()
                .filter(|payment| self.offsets(deposit, payment))
                .collect();

            if counterparts.is_empty() {
                continue;
            }

            let reason = format!(
                "Deposit of ${:.2} on {} is offset by {} payment(s) of the same amount with similar descriptions",
                deposit.amount,
                deposit.date,
                counterparts.len()
            );

            let mut members = Vec::with_capacity(counterparts.len() + 1);
            members.push(deposit.clone());
            members.extend(counterparts.into_iter().cloned());

            matches.push(
                Match::new(MatchType::Reconciliation, &deposit.id, self.confidence, members, reason)
                    .with_suggestion("Mark these transactions as reconciled".to_string()),
            );
        }

        tracing::debug!(pairs = matches.len(), "reconciliation pass complete");
        matches
    }

    fn offsets(&self, deposit: &Transaction, payment: &Transaction) -> bool {
        amounts_within(deposit.amount, -payment.amount, self.amount_tolerance)
            && word_similarity(&deposit.description, &payment.description) > self.similarity_threshold
    }
}

impl Default for ReconciliationMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Jaccard similarity over lower-cased whitespace tokens of the raw text
pub fn word_similarity(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let words_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let words_b: HashSet<&str> = b_lower.split_whitespace().collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }

    let common = words_a.intersection(&words_b).count();
    common as f64 / union as f64
}
