// 🏪 Vendor Grouping - Heuristic counterparty signatures
// Extraction is a pluggable strategy; downstream detectors only see the
// `VendorExtractor` trait and the resulting groups.

use crate::transaction::Transaction;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static LEADING_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(DEPOSIT|WITHDRAWAL|TRANSFER|PAYMENT|AUTOMATIC)\s+").expect("valid regex")
});
static TRAILING_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(DEPOSIT|WITHDRAWAL|TRANSFER|PAYMENT|AUTOMATIC)$").expect("valid regex")
});
static TRANSACTION_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+#\d+").expect("valid regex"));
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\d{4}-\d{2}-\d{2}").expect("valid regex"));

// ============================================================================
// EXTRACTION STRATEGY
// ============================================================================

/// Derives a vendor signature from a free-text description
pub trait VendorExtractor: Send + Sync {
    fn extract(&self, description: &str) -> String;
}

/// Default strategy: strip banking noise words, transaction numbers and ISO
/// dates, then keep the first `token_count` words.
#[derive(Debug, Clone)]
pub struct PrefixVendorExtractor {
    pub token_count: usize,
}

impl PrefixVendorExtractor {
    pub fn new() -> Self {
        PrefixVendorExtractor { token_count: 3 }
    }

    pub fn with_token_count(token_count: usize) -> Self {
        PrefixVendorExtractor { token_count }
    }
}

impl Default for PrefixVendorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorExtractor for PrefixVendorExtractor {
    fn extract(&self, description: &str) -> String {
        let stripped = LEADING_NOISE.replace(description, "");
        let stripped = TRAILING_NOISE.replace(&stripped, "");
        let stripped = TRANSACTION_NUMBER.replace_all(&stripped, "");
        let stripped = ISO_DATE.replace_all(&stripped, "");

        stripped
            .split_whitespace()
            .take(self.token_count)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Vendor signature using the default extractor
pub fn extract_vendor(description: &str) -> String {
    PrefixVendorExtractor::new().extract(description)
}

// ============================================================================
// GROUPING
// ============================================================================

#[derive(Debug, Clone)]
pub struct VendorGroup<'a> {
    pub vendor: String,
    pub transactions: Vec<&'a Transaction>,
}

/// Partition transactions by vendor signature.
///
/// Groups keep first-seen order and every transaction lands in exactly one group.
pub fn group_by_vendor<'a>(
    transactions: &'a [Transaction],
    extractor: &dyn VendorExtractor,
) -> Vec<VendorGroup<'a>> {
    let mut groups: Vec<VendorGroup<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tx in transactions {
        let vendor = extractor.extract(&tx.description);

        match index.get(&vendor) {
            Some(&i) => groups[i].transactions.push(tx),
            None => {
                index.insert(vendor.clone(), groups.len());
                groups.push(VendorGroup {
                    vendor,
                    transactions: vec![tx],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_test_transaction(id: &str, description: &str) -> Transaction {
        Transaction::new(
            id,
            -10.0,
            description,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_strips_leading_and_trailing_noise() {
        assert_eq!(extract_vendor("PAYMENT Comcast Cable Services Inc"), "Comcast Cable Services");
        assert_eq!(extract_vendor("Geico Insurance PAYMENT"), "Geico Insurance");
        assert_eq!(extract_vendor("automatic Gym Membership"), "Gym Membership");
        assert_eq!(extract_vendor("Payroll WITHDRAWAL"), "Payroll");
    }

    #[test]
    fn test_strips_numbers_and_dates() {
        assert_eq!(extract_vendor("STARBUCKS #4521 2024-01-05"), "STARBUCKS");
        assert_eq!(extract_vendor("Office Depot #889 Store Purchase"), "Office Depot Store");
    }

    #[test]
    fn test_takes_first_three_tokens() {
        assert_eq!(extract_vendor("Netflix Subscription"), "Netflix Subscription");
        assert_eq!(extract_vendor("City   Water  Utility Bill Jan"), "City Water Utility");
        assert_eq!(extract_vendor(""), "");
    }

    #[test]
    fn test_custom_token_count() {
        let extractor = PrefixVendorExtractor::with_token_count(1);
        assert_eq!(extractor.extract("DEPOSIT Acme Corp Payroll"), "Acme");
    }

    #[test]
    fn test_group_by_vendor_is_ordered_partition() {
        let transactions = vec![
            create_test_transaction("1", "STARBUCKS #1 Downtown"),
            create_test_transaction("2", "Adobe Creative Cloud"),
            create_test_transaction("3", "STARBUCKS #2 Downtown"),
            create_test_transaction("4", "PAYMENT Adobe Creative Cloud"),
        ];

        let groups = group_by_vendor(&transactions, &PrefixVendorExtractor::new());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].vendor, "STARBUCKS Downtown");
        assert_eq!(groups[1].vendor, "Adobe Creative Cloud");

        let ids: Vec<&str> = groups[0].transactions.iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        let total: usize = groups.iter().map(|g| g.transactions.len()).sum();
        assert_eq!(total, transactions.len());
    }

    #[test]
    fn test_custom_extractor_is_honoured() {
        struct FirstWord;
        impl VendorExtractor for FirstWord {
            fn extract(&self, description: &str) -> String {
                description.split_whitespace().next().unwrap_or("").to_lowercase()
            }
        }

        let transactions = vec![
            create_test_transaction("1", "Uber Trip"),
            create_test_transaction("2", "UBER Eats"),
        ];

        let groups = group_by_vendor(&transactions, &FirstWord);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].vendor, "uber");
    }
}
