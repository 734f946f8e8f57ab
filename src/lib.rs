// Statement Matcher - Core Library
// Single-file analysis: duplicates, recurring patterns, category hints and
// deposit/payment reconciliation over one list of transactions.

pub mod transaction;
pub mod matches;
pub mod config;
pub mod normalize;      // Description canonicalization
pub mod deduplication;  // Exact duplicate groups + fuzzy predicate
pub mod vendor;         // Vendor signatures and grouping
pub mod patterns;       // Recurring series
pub mod rules;          // Category keyword families
pub mod reconciliation; // Deposit/payment pairing
pub mod engine;         // Aggregator

// Re-export commonly used types
pub use transaction::{
    Transaction, TransactionKind, RawTransaction, ValidationError,
    load_transactions, validate_all, parse_date, to_cents, fits_in_cents,
};
pub use matches::{
    Match, MatchType, Frequency, MatchSummary, summarize,
};
pub use config::MatcherConfig;
pub use normalize::normalize;
pub use deduplication::DuplicateDetector;
pub use vendor::{
    VendorExtractor, PrefixVendorExtractor, VendorGroup,
    extract_vendor, group_by_vendor,
};
pub use patterns::PatternDetector;
pub use rules::{
    CategoryRuleSet, CategoryFamily, CategorySuggester, CategoryClassification,
    ConfidenceTier, Keyword,
};
pub use reconciliation::{ReconciliationMatcher, word_similarity};
pub use engine::SingleFileMatcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run every detector with default settings
pub fn find_matches(transactions: &[Transaction]) -> Vec<Match> {
    SingleFileMatcher::new().find_matches(transactions)
}
